use chrono::NaiveTime;
use rand::Rng;
use rand::seq::SliceRandom;

use crate::clean::LEAGUE_LITERAL;
use crate::state::RawMatch;
use crate::vocabulary::Vocabulary;

const MATCHES_PER_WEEK: usize = 10;

#[derive(Debug, Clone)]
pub struct FakePaste {
    pub text: String,
    /// Paste order, top to bottom.
    pub matches: Vec<RawMatch>,
}

/// A screenshot-style paste: week banners, kickoff times and ids around each result.
pub fn generate_paste<R: Rng + ?Sized>(rng: &mut R, vocab: &Vocabulary, n: usize) -> FakePaste {
    let teams = vocab.iter().collect::<Vec<_>>();
    let mut lines: Vec<String> = Vec::with_capacity(n * 6);
    let mut matches = Vec::with_capacity(n);
    if teams.len() < 2 {
        return FakePaste {
            text: String::new(),
            matches,
        };
    }

    let mut week = rng.gen_range(1..=30u32);
    for idx in 0..n {
        if idx % MATCHES_PER_WEEK == 0 {
            let id = rng.gen_range(10_000_000u64..99_999_999);
            lines.push(format!("{LEAGUE_LITERAL} WEEK {week} - #{id}"));
            week += 1;
        }
        lines.push(kickoff_line(rng));

        let pair = teams.choose_multiple(rng, 2).copied().collect::<Vec<_>>();
        let (home, away) = (pair[0], pair[1]);
        let m = RawMatch {
            home: home.to_string(),
            home_score: goals(rng),
            away_score: goals(rng),
            away: away.to_string(),
        };
        lines.push(m.home.clone());
        if rng.gen_bool(0.2) {
            lines.push(format!("{} - {}", m.home_score, m.away_score));
        } else {
            lines.push(m.home_score.to_string());
            lines.push(m.away_score.to_string());
        }
        lines.push(m.away.clone());
        if rng.gen_bool(0.1) {
            lines.push(rng.gen_range(10_000_000u64..99_999_999).to_string());
        }
        matches.push(m);
    }

    FakePaste {
        text: lines.join("\n"),
        matches,
    }
}

fn kickoff_line<R: Rng + ?Sized>(rng: &mut R) -> String {
    let hour = rng.gen_range(0..24);
    let minute = rng.gen_range(0..12) * 5;
    let Some(time) = NaiveTime::from_hms_opt(hour, minute, 0) else {
        return "12:00 pm".to_string();
    };
    if rng.gen_bool(0.5) {
        time.format("%-I:%M %P").to_string()
    } else {
        time.format("%H:%M").to_string()
    }
}

// Virtual-league scorelines rarely go past five.
fn goals<R: Rng + ?Sized>(rng: &mut R) -> u32 {
    const WEIGHTS: [(u32, u32); 6] = [(0, 24), (1, 32), (2, 24), (3, 12), (4, 6), (5, 2)];
    let total = WEIGHTS.iter().map(|(_, w)| w).sum::<u32>();
    let mut pick = rng.gen_range(0..total);
    for (goals, weight) in WEIGHTS {
        if pick < weight {
            return goals;
        }
        pick -= weight;
    }
    0
}
