use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use oddbet::config::LeagueConfig;
use oddbet::standings::{self, LeagueTableRow};
use oddbet::state::LeagueState;
use oddbet::win_prob::{self, HeadToHead, Prediction};
use oddbet::{export, fake_feed};

#[derive(Debug, clap::Parser)]
#[command(about = "Turn pasted football results into a league table, streaks and CSV")]
struct Args {
    /// text files to ingest, one paste each, in order (stdin when empty)
    files: Vec<PathBuf>,

    /// ingest a generated paste of N matches instead of reading input
    #[arg(long, conflicts_with = "files")]
    demo: Option<usize>,

    /// seed for --demo
    #[arg(long)]
    seed: Option<u64>,

    /// estimate the outcome of HOME vs AWAY
    #[arg(long, num_args = 2, value_names = ["HOME", "AWAY"])]
    predict: Option<Vec<String>>,

    /// write the match history to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// print the report as JSON
    #[arg(long)]
    json: bool,

    /// games per team before the season rolls over (0 disables)
    #[arg(long)]
    season_length: Option<u32>,

    /// detailed parse errors to keep per paste (0 keeps all)
    #[arg(long)]
    error_limit: Option<usize>,

    /// apply the flat home-advantage bonus to predictions
    #[arg(long)]
    home_advantage: bool,
}

#[derive(Debug, Serialize)]
struct Report {
    added: usize,
    errors: Vec<String>,
    season: u32,
    table: Vec<LeagueTableRow>,
    prediction: Option<Prediction>,
    head_to_head: Option<HeadToHead>,
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    debug!("args: {args:?}");
    let config = resolve_config(&args)?;

    if let Some([home, away]) = args.predict.as_deref() {
        if !config.teams.contains(home) {
            bail!("unknown team {home:?}");
        }
        if !config.teams.contains(away) {
            bail!("unknown team {away:?}");
        }
        if home == away {
            bail!("pick two different teams");
        }
    }

    let mut state = LeagueState::new(config);
    let mut added = 0usize;
    let mut errors = Vec::new();
    for paste in read_pastes(&args, &state)? {
        let report = state.ingest(&paste);
        added += report.added;
        errors.extend(report.errors.iter().map(ToString::to_string));
    }

    let (prediction, head_to_head) = match args.predict.as_deref() {
        Some([home, away]) => (
            Some(win_prob::predict(&state, home, away)),
            win_prob::head_to_head(state.history(), home, away),
        ),
        _ => (None, None),
    };

    if let Some(path) = &args.csv {
        let rows = export::export_history(path, state.history())
            .with_context(|| format!("export csv to {}", path.display()))?;
        state.push_log(format!("[INFO] Exported {rows} matches to {}", path.display()));
    }

    let report = Report {
        added,
        errors,
        season: state.season(),
        table: standings::rank(&state),
        prediction,
        head_to_head,
    };
    if args.json {
        let json = serde_json::to_string_pretty(&report).context("serialize report")?;
        println!("{json}");
    } else {
        print_report(&report, &state);
    }
    Ok(())
}

fn resolve_config(args: &Args) -> Result<LeagueConfig> {
    let mut config = LeagueConfig::from_env().context("invalid environment configuration")?;
    if let Some(n) = args.season_length {
        config.season_length = (n > 0).then_some(n);
    }
    if let Some(n) = args.error_limit {
        config.parse_error_limit = (n > 0).then_some(n);
    }
    if args.home_advantage {
        config.home_advantage = true;
    }
    Ok(config)
}

fn read_pastes(args: &Args, state: &LeagueState) -> Result<Vec<String>> {
    if let Some(n) = args.demo {
        let mut rng = match args.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let paste = fake_feed::generate_paste(&mut rng, state.vocabulary(), n);
        return Ok(vec![paste.text]);
    }
    if args.files.is_empty() {
        let mut raw = String::new();
        io::stdin()
            .read_to_string(&mut raw)
            .context("read paste from stdin")?;
        return Ok(vec![raw]);
    }
    args.files
        .iter()
        .map(|path| {
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))
        })
        .collect()
}

fn print_report(report: &Report, state: &LeagueState) {
    for err in &report.errors {
        println!("rejected: {err}");
    }
    println!("Added {} matches", report.added);
    println!("Season {}", report.season);
    println!();
    println!(
        "{:>3}  {:<16} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}  {}",
        "#", "Team", "P", "W", "D", "L", "GF", "GA", "GD", "Pts", "Form"
    );
    for row in &report.table {
        println!(
            "{:>3}  {:<16} {:>3} {:>3} {:>3} {:>3} {:>4} {:>4} {:>4} {:>4}  {}",
            row.rank,
            row.team,
            row.played,
            row.won,
            row.drawn,
            row.lost,
            row.goals_for,
            row.goals_against,
            row.goal_difference,
            row.points,
            row.form
        );
    }

    if let Some(last) = state.history().last() {
        println!();
        println!(
            "Last recorded: {} {}-{} {} ({}, Total-G {})",
            last.home,
            last.home_score,
            last.away_score,
            last.away,
            last.outcome.label(),
            last.total_g
        );
        println!("  since 4 goals: {}", last.four_goal_label());
        println!("  since 3 goals: {}", last.three_goal_label());
    }

    if let Some(p) = &report.prediction {
        println!();
        println!("{} vs {}", p.home.team, p.away.team);
        println!(
            "  home {:.1}%  draw {:.1}%  away {:.1}%",
            p.p_home, p.p_draw, p.p_away
        );
        println!(
            "  over 2.5 {:.1}%  over 3.5 {:.1}%  over 4.5 {:.1}%  btts {:.1}%",
            p.over_2_5, p.over_3_5, p.over_4_5, p.both_teams_score
        );
        println!("  predicted score {}", p.predicted_score);
        println!(
            "  form {} ({:.2} ppg) / {} ({:.2} ppg)",
            p.home.form, p.home.points_per_game, p.away.form, p.away.points_per_game
        );
    }
    match (&report.prediction, &report.head_to_head) {
        (Some(_), Some(h2h)) => {
            println!(
                "  head-to-head: {} meetings, {}-{}-{} (W-D-L), avg goals {:.2}, over 2.5 {:.0}%, over 3.5 {:.0}%, btts {:.0}%",
                h2h.matches,
                h2h.home_wins,
                h2h.draws,
                h2h.away_wins,
                h2h.avg_goals,
                h2h.over_2_5_pct,
                h2h.over_3_5_pct,
                h2h.btts_pct
            );
        }
        (Some(_), None) => println!("  head-to-head: no history"),
        _ => {}
    }

    for line in state.logs().iter().filter(|l| l.starts_with("[INFO] Season")) {
        println!("{line}");
    }
}
