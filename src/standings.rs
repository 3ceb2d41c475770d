use serde::Serialize;

use crate::state::{LeagueState, TeamStats};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LeagueTableRow {
    pub rank: usize,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    pub form: String,
}

/// Current-season table, ordered by points, goal difference and goals for.
///
/// Teams level on all three keys keep vocabulary (alphabetical) order; no further
/// tie-break is applied.
pub fn rank(state: &LeagueState) -> Vec<LeagueTableRow> {
    let empty = TeamStats::default();
    let mut rows = state
        .vocabulary()
        .iter()
        .map(|team| (team, state.team_stats(team).unwrap_or(&empty)))
        .collect::<Vec<_>>();

    rows.sort_by(|(_, a), (_, b)| {
        b.points
            .cmp(&a.points)
            .then(b.goal_difference.cmp(&a.goal_difference))
            .then(b.goals_for.cmp(&a.goals_for))
    });

    rows.into_iter()
        .enumerate()
        .map(|(idx, (team, s))| LeagueTableRow {
            rank: idx + 1,
            team: team.to_string(),
            played: s.played,
            won: s.won,
            drawn: s.drawn,
            lost: s.lost,
            goals_for: s.goals_for,
            goals_against: s.goals_against,
            goal_difference: s.goal_difference,
            points: s.points,
            form: s.form_string(),
        })
        .collect()
}
