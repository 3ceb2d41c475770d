use serde::Serialize;

use crate::state::{EnrichedMatch, LeagueState, TeamStats};

const HOME_ADV_BONUS: f64 = 15.0;
const AWAY_ADV_PENALTY: f64 = 7.5;
const EVEN_SPLIT: f64 = 33.3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamMetrics {
    pub team: String,
    pub played: u32,
    pub win_rate: f64,
    pub draw_rate: f64,
    pub loss_rate: f64,
    pub avg_goals_for: f64,
    pub avg_goals_against: f64,
    pub btts_rate: f64,
    pub form: String,
    pub points_per_game: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub home: TeamMetrics,
    pub away: TeamMetrics,
    pub p_home: f64,
    pub p_draw: f64,
    pub p_away: f64,
    pub expected_goals: f64,
    pub over_2_5: f64,
    pub over_3_5: f64,
    pub over_4_5: f64,
    pub both_teams_score: f64,
    pub predicted_score: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadToHead {
    pub matches: usize,
    pub home_wins: usize,
    pub away_wins: usize,
    pub draws: usize,
    pub avg_goals: f64,
    pub over_2_5_pct: f64,
    pub over_3_5_pct: f64,
    pub btts_pct: f64,
}

/// Heuristic outcome and goal-market estimates from current-season form.
///
/// All rates are percentages. A team with no games contributes zeros rather than
/// dividing by zero.
pub fn predict(state: &LeagueState, home: &str, away: &str) -> Prediction {
    let home = team_metrics(state, home);
    let away = team_metrics(state, away);

    let mut raw_home = home.win_rate * (1.0 - away.win_rate / 100.0);
    let mut raw_away = away.win_rate * (1.0 - home.win_rate / 100.0);
    let raw_draw = (home.draw_rate + away.draw_rate) / 2.0;
    if state.config.home_advantage {
        raw_home += HOME_ADV_BONUS;
        // The away penalty floors at zero.
        raw_away = (raw_away - AWAY_ADV_PENALTY).max(0.0);
    }
    let (p_home, p_draw, p_away) = normalize(raw_home, raw_draw, raw_away);

    let expected_goals = home.avg_goals_for + away.avg_goals_for;
    let both_teams_score = clamp((home.btts_rate + away.btts_rate) / 2.0, 0.0, 100.0);
    let predicted_score = format!("{:.1}-{:.1}", home.avg_goals_for, away.avg_goals_for);

    Prediction {
        p_home,
        p_draw,
        p_away,
        expected_goals,
        over_2_5: clamp((expected_goals - 1.5) * 30.0, 10.0, 90.0),
        over_3_5: clamp((expected_goals - 2.5) * 25.0, 5.0, 70.0),
        over_4_5: clamp((expected_goals - 3.5) * 20.0, 2.0, 50.0),
        both_teams_score,
        predicted_score,
        home,
        away,
    }
}

pub fn team_metrics(state: &LeagueState, team: &str) -> TeamMetrics {
    let empty = TeamStats::default();
    let s = state.team_stats(team).unwrap_or(&empty);
    let played = f64::from(s.played);

    let season = state.season();
    let mut seen = 0usize;
    let mut btts = 0usize;
    for m in state
        .history()
        .iter()
        .filter(|m| m.season == season && m.involves(team))
    {
        seen += 1;
        if m.both_teams_scored {
            btts += 1;
        }
    }

    TeamMetrics {
        team: team.to_string(),
        played: s.played,
        win_rate: pct(f64::from(s.won), played),
        draw_rate: pct(f64::from(s.drawn), played),
        loss_rate: pct(f64::from(s.lost), played),
        avg_goals_for: ratio(f64::from(s.goals_for), played),
        avg_goals_against: ratio(f64::from(s.goals_against), played),
        btts_rate: pct(btts as f64, seen as f64),
        form: s.form_string(),
        points_per_game: ratio(f64::from(s.points), played),
    }
}

/// Every recorded meeting of the pair in either venue, across all seasons.
///
/// Wins are credited by team, so a win by `home` while playing away still counts
/// towards `home_wins`.
pub fn head_to_head(history: &[EnrichedMatch], home: &str, away: &str) -> Option<HeadToHead> {
    let meetings = history
        .iter()
        .filter(|m| (m.home == home && m.away == away) || (m.home == away && m.away == home))
        .collect::<Vec<_>>();
    if meetings.is_empty() {
        return None;
    }

    let mut out = HeadToHead {
        matches: meetings.len(),
        home_wins: 0,
        away_wins: 0,
        draws: 0,
        avg_goals: 0.0,
        over_2_5_pct: 0.0,
        over_3_5_pct: 0.0,
        btts_pct: 0.0,
    };
    let (mut goals, mut over_25, mut over_35, mut btts) = (0u32, 0usize, 0usize, 0usize);
    for m in &meetings {
        match m.home_score.cmp(&m.away_score) {
            std::cmp::Ordering::Equal => out.draws += 1,
            std::cmp::Ordering::Greater if m.home == home => out.home_wins += 1,
            std::cmp::Ordering::Less if m.away == home => out.home_wins += 1,
            _ => out.away_wins += 1,
        }
        goals += m.total_goals;
        if m.total_goals > 2 {
            over_25 += 1;
        }
        if m.total_goals > 3 {
            over_35 += 1;
        }
        if m.both_teams_scored {
            btts += 1;
        }
    }

    let n = meetings.len() as f64;
    out.avg_goals = f64::from(goals) / n;
    out.over_2_5_pct = pct(over_25 as f64, n);
    out.over_3_5_pct = pct(over_35 as f64, n);
    out.btts_pct = pct(btts as f64, n);
    Some(out)
}

fn normalize(home: f64, draw: f64, away: f64) -> (f64, f64, f64) {
    let total = home + draw + away;
    if total <= 0.0 {
        return (EVEN_SPLIT, EVEN_SPLIT, EVEN_SPLIT);
    }
    let p_home = home / total * 100.0;
    let p_away = away / total * 100.0;
    // Rounding residue goes to the draw.
    let p_draw = 100.0 - p_home - p_away;
    (p_home, p_draw, p_away)
}

fn ratio(num: f64, den: f64) -> f64 {
    if den <= 0.0 { 0.0 } else { num / den }
}

fn pct(num: f64, den: f64) -> f64 {
    ratio(num, den) * 100.0
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}
