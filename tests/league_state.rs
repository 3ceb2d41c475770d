use rand::SeedableRng;
use rand::rngs::StdRng;

use oddbet::config::LeagueConfig;
use oddbet::fake_feed::generate_paste;
use oddbet::parse::{ParseError, Side};
use oddbet::state::{DrySpells, LeagueState, Outcome, OverUnder, RawMatch, TotalGoalsMark};

fn raw(home: &str, hs: u32, aws: u32, away: &str) -> RawMatch {
    RawMatch {
        home: home.to_string(),
        home_score: hs,
        away_score: aws,
        away: away.to_string(),
    }
}

fn no_seasons() -> LeagueState {
    LeagueState::new(LeagueConfig {
        season_length: None,
        ..LeagueConfig::default()
    })
}

#[test]
fn single_home_win_updates_both_teams() {
    let mut state = LeagueState::default();
    let report = state.ingest("Leeds\n2\n1\nEverton\n");
    assert_eq!(report.added, 1);
    assert!(report.errors.is_empty());

    let leeds = state.team_stats("Leeds").expect("leeds tracked");
    let everton = state.team_stats("Everton").expect("everton tracked");
    assert_eq!(leeds.played, 1);
    assert_eq!(leeds.points, 3);
    assert_eq!(leeds.goal_difference, 1);
    assert_eq!(leeds.form_string(), "W");
    assert_eq!(everton.played, 1);
    assert_eq!(everton.points, 0);
    assert_eq!(everton.lost, 1);
    assert_eq!(everton.form_string(), "L");

    // Three goals: the 3-goal counter resets, the 4-goal counter advances.
    for team in ["Leeds", "Everton"] {
        let spells = state.dry_spells(team).expect("spells tracked");
        assert_eq!(spells.since_four, 1, "{team}");
        assert_eq!(spells.since_three, 0, "{team}");
    }

    let m = &state.history()[0];
    assert_eq!(m.id, 1);
    assert_eq!(m.season, 1);
    assert_eq!(m.total_goals, 3);
    assert_eq!(m.outcome, Outcome::HomeWin);
    assert_eq!(m.goal_difference, 1);
    assert!(m.both_teams_scored);
    assert_eq!(m.over_under, OverUnder::Over);
    assert_eq!(m.total_g, TotalGoalsMark::Three);
    assert_eq!(m.total_g.to_string(), "3 \u{2714}");
    assert_eq!(m.four_goal_label(), "Leeds: 1 | Everton: 1");
    assert_eq!(m.three_goal_label(), "Leeds: 0 | Everton: 0");
}

#[test]
fn consecutive_four_goal_games_keep_counter_at_zero() {
    let mut state = LeagueState::default();
    state.ingest("Leeds\n3\n1\nArsenal\nLeeds\n2\n2\nEverton\n");
    assert_eq!(state.history().len(), 2);
    for m in state.history() {
        assert_eq!(m.home, "Leeds");
        assert_eq!(m.total_g, TotalGoalsMark::Won);
        assert_eq!(m.home_spells.since_four, 0);
        assert_eq!(m.home_spells.since_four_home, 0);
        assert_eq!(m.away_spells.since_four, 0);
    }
    assert_eq!(state.dry_spells("Leeds").map(|s| s.since_four), Some(0));
}

#[test]
fn paste_is_applied_bottom_up() {
    let mut state = LeagueState::default();
    // Top group totals four goals; the two below do not.
    state.ingest(
        "Leeds\n2\n2\nEverton\n\
         Leeds\n1\n0\nArsenal\n\
         Leeds\n1\n0\nChelsea\n",
    );
    let history = state.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].away, "Chelsea");
    assert_eq!(history[1].away, "Arsenal");
    assert_eq!(history[2].away, "Everton");

    let leeds_since_four = history
        .iter()
        .map(|m| m.home_spells.since_four)
        .collect::<Vec<_>>();
    assert_eq!(leeds_since_four, vec![1, 2, 0]);

    // Role-only counters only move for the role actually played.
    assert_eq!(
        state.dry_spells("Arsenal"),
        Some(&DrySpells {
            since_four: 1,
            since_four_home: 0,
            since_four_away: 1,
            since_three: 1,
        })
    );
    assert_eq!(
        state.dry_spells("Everton"),
        Some(&DrySpells {
            since_four: 0,
            since_four_home: 0,
            since_four_away: 0,
            since_three: 1,
        })
    );
}

#[test]
fn rejected_group_leaves_stats_untouched() {
    let mut state = LeagueState::default();
    let report = state.ingest("Leeds\n2\n1\n3\n");
    assert_eq!(report.added, 0);
    assert_eq!(
        report.errors,
        vec![ParseError::UnknownTeam {
            group: 1,
            side: Side::Away,
            token: "3".to_string(),
        }]
    );
    assert_eq!(state.team_stats("Leeds").map(|s| s.played), Some(0));
    assert_eq!(state.dry_spells("Leeds"), Some(&DrySpells::default()));
    assert!(state.history().is_empty());
    assert!(state.logs().iter().any(|l| l.starts_with("[WARN] group 1")));
    assert_eq!(state.logs().back().map(String::as_str), Some("[INFO] Added 0 matches"));
}

#[test]
fn good_groups_survive_bad_neighbours() {
    let mut state = LeagueState::default();
    let report = state.ingest("Leeds\n1\n0\nEverton\nLeeds\nx1\n0\nWolves\nArsenal\n0\n0\nFulham\n");
    // "x1" is dropped by the cleaner, so the stream shifts and later groups fail.
    assert_eq!(report.added, 1);
    assert!(!report.errors.is_empty());
    assert_eq!(state.team_stats("Leeds").map(|s| s.won), Some(1));
}

#[test]
fn draws_and_goalless_games() {
    let mut state = LeagueState::default();
    let m = state.apply(raw("Burnley", 0, 0, "Wolves")).clone();
    assert_eq!(m.outcome, Outcome::Draw);
    assert_eq!(m.over_under, OverUnder::Under);
    assert!(!m.both_teams_scored);
    assert_eq!(m.total_g, TotalGoalsMark::Goals(0));
    assert_eq!(m.total_g.to_string(), "0");
    for team in ["Burnley", "Wolves"] {
        let s = state.team_stats(team).expect("tracked");
        assert_eq!((s.drawn, s.points), (1, 1));
        assert_eq!(s.form_string(), "D");
    }
}

#[test]
fn form_keeps_last_five() {
    let mut state = no_seasons();
    for opp in ["Arsenal", "Brighton", "Burnley", "Chelsea", "Everton", "Fulham"] {
        state.apply(raw("Leeds", 1, 0, opp));
    }
    state.apply(raw("Wolves", 2, 0, "Leeds"));
    let leeds = state.team_stats("Leeds").expect("tracked");
    assert_eq!(leeds.form.len(), 5);
    assert_eq!(leeds.form_string(), "WWWWL");
    assert_eq!(leeds.played, 7);
}

#[test]
fn generated_paste_round_trips_and_invariants_hold() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut state = no_seasons();
    let paste = generate_paste(&mut rng, state.vocabulary(), 60);

    let report = state.ingest(&paste.text);
    assert!(report.errors.is_empty(), "{:?}", report.errors);
    assert_eq!(report.added, 60);

    let history = state.history();
    for (m, expected) in history.iter().zip(paste.matches.iter().rev()) {
        assert_eq!(m.home, expected.home);
        assert_eq!(m.away, expected.away);
        assert_eq!(m.home_score, expected.home_score);
        assert_eq!(m.away_score, expected.away_score);
    }

    let teams = state.vocabulary().iter().map(str::to_string).collect::<Vec<_>>();
    for team in &teams {
        let s = state.team_stats(team).expect("tracked");
        assert_eq!(s.points, 3 * s.won + s.drawn, "{team}");
        assert_eq!(s.played, s.won + s.drawn + s.lost, "{team}");
        assert_eq!(s.goal_difference, i64::from(s.goals_for) - i64::from(s.goals_against));

        // Matches since the latest 4-goal game, or all of them if none.
        let played = history.iter().filter(|m| m.involves(team)).collect::<Vec<_>>();
        let expected_four = played
            .iter()
            .rev()
            .take_while(|m| m.total_goals != 4)
            .count() as u32;
        let expected_three = played
            .iter()
            .rev()
            .take_while(|m| m.total_goals != 3)
            .count() as u32;
        let spells = state.dry_spells(team).expect("tracked");
        assert_eq!(spells.since_four, expected_four, "{team}");
        assert_eq!(spells.since_three, expected_three, "{team}");
        assert_eq!(s.played as usize, played.len());
    }
}

#[test]
fn season_rolls_over_but_history_stays() {
    let mut state = LeagueState::new(LeagueConfig {
        season_length: Some(2),
        ..LeagueConfig::default()
    });
    // Applied bottom-up: Leeds v Arsenal, then Leeds v Everton closes the season.
    let report = state.ingest("Leeds\n2\n2\nEverton\nLeeds\n1\n0\nArsenal\n");
    assert_eq!(report.added, 2);
    assert_eq!(report.seasons_closed, 1);
    assert_eq!(report.season, 2);
    assert_eq!(state.season(), 2);

    assert!(state.history().iter().all(|m| m.season == 1));
    assert_eq!(state.team_stats("Leeds").map(|s| s.played), Some(0));
    assert_eq!(state.dry_spells("Leeds"), Some(&DrySpells::default()));
    assert!(
        state
            .logs()
            .iter()
            .any(|l| l == "[INFO] Season 1 complete, starting season 2")
    );

    let next = state.apply(raw("Chelsea", 1, 0, "Wolves"));
    assert_eq!(next.season, 2);
    assert_eq!(next.id, 3);
}

#[test]
fn clear_resets_everything() {
    let mut state = LeagueState::default();
    state.ingest("Leeds\n2\n1\nEverton\nArsenal\n0\n4\nChelsea\n");
    state.clear();
    assert!(state.history().is_empty());
    assert_eq!(state.season(), 1);
    assert_eq!(state.team_stats("Leeds").map(|s| s.played), Some(0));
    assert_eq!(state.dry_spells("Chelsea"), Some(&DrySpells::default()));

    let m = state.apply(raw("Leeds", 1, 1, "Wolves"));
    assert_eq!(m.id, 1);
}

#[test]
fn session_log_is_bounded() {
    let mut state = LeagueState::default();
    for i in 0..250 {
        state.push_log(format!("[INFO] line {i}"));
    }
    assert_eq!(state.logs().len(), 200);
    assert_eq!(state.logs().front().map(String::as_str), Some("[INFO] line 50"));
}
