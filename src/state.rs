use std::collections::{HashMap, VecDeque};

use serde::{Serialize, Serializer};
use tracing::{debug, info};

use crate::config::LeagueConfig;
use crate::parse::{self, ParseError};
use crate::vocabulary::Vocabulary;

pub const FORM_LEN: usize = 5;
const MAX_LOGS: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawMatch {
    pub home: String,
    pub home_score: u32,
    pub away_score: u32,
    pub away: String,
}

impl RawMatch {
    pub fn total_goals(&self) -> u32 {
        self.home_score + self.away_score
    }

    pub fn outcome(&self) -> Outcome {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Outcome::HomeWin,
            std::cmp::Ordering::Less => Outcome::AwayWin,
            std::cmp::Ordering::Equal => Outcome::Draw,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    #[serde(rename = "Home Win")]
    HomeWin,
    #[serde(rename = "Away Win")]
    AwayWin,
    Draw,
}

impl Outcome {
    pub fn label(self) -> &'static str {
        match self {
            Outcome::HomeWin => "Home Win",
            Outcome::AwayWin => "Away Win",
            Outcome::Draw => "Draw",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FormResult {
    W,
    D,
    L,
}

impl FormResult {
    pub fn as_char(self) -> char {
        match self {
            FormResult::W => 'W',
            FormResult::D => 'D',
            FormResult::L => 'L',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum OverUnder {
    #[serde(rename = "Over 2.5")]
    Over,
    #[serde(rename = "Under 2.5")]
    Under,
}

impl OverUnder {
    pub fn from_total(total: u32) -> Self {
        if total > 2 {
            OverUnder::Over
        } else {
            OverUnder::Under
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            OverUnder::Over => "Over 2.5",
            OverUnder::Under => "Under 2.5",
        }
    }
}

/// The "Total-G" column: a 4-goal match is a hit, a 3-goal match a near miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalGoalsMark {
    Won,
    Three,
    Goals(u32),
}

impl TotalGoalsMark {
    pub fn from_total(total: u32) -> Self {
        match total {
            4 => TotalGoalsMark::Won,
            3 => TotalGoalsMark::Three,
            n => TotalGoalsMark::Goals(n),
        }
    }
}

impl std::fmt::Display for TotalGoalsMark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TotalGoalsMark::Won => f.write_str("Won"),
            TotalGoalsMark::Three => f.write_str("3 \u{2714}"),
            TotalGoalsMark::Goals(n) => write!(f, "{n}"),
        }
    }
}

impl Serialize for TotalGoalsMark {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TeamStats {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i64,
    pub points: u32,
    pub form: VecDeque<FormResult>,
}

impl TeamStats {
    fn record(&mut self, scored: u32, conceded: u32) -> FormResult {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        self.goal_difference = i64::from(self.goals_for) - i64::from(self.goals_against);

        let result = match scored.cmp(&conceded) {
            std::cmp::Ordering::Greater => {
                self.won += 1;
                FormResult::W
            }
            std::cmp::Ordering::Equal => {
                self.drawn += 1;
                FormResult::D
            }
            std::cmp::Ordering::Less => {
                self.lost += 1;
                FormResult::L
            }
        };
        self.points = 3 * self.won + self.drawn;

        self.form.push_back(result);
        while self.form.len() > FORM_LEN {
            self.form.pop_front();
        }
        result
    }

    /// Oldest first, e.g. "WWDLW".
    pub fn form_string(&self) -> String {
        self.form.iter().map(|r| r.as_char()).collect()
    }
}

/// Games since the team last featured in a match with exactly 4 (or 3) goals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DrySpells {
    pub since_four: u32,
    /// Only advances when the team plays at home.
    pub since_four_home: u32,
    /// Only advances when the team plays away.
    pub since_four_away: u32,
    pub since_three: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnrichedMatch {
    pub id: u64,
    pub season: u32,
    pub home: String,
    pub home_score: u32,
    pub away_score: u32,
    pub away: String,
    pub total_goals: u32,
    pub outcome: Outcome,
    pub goal_difference: i64,
    pub both_teams_scored: bool,
    pub over_under: OverUnder,
    pub total_g: TotalGoalsMark,
    pub home_spells: DrySpells,
    pub away_spells: DrySpells,
}

impl EnrichedMatch {
    pub fn four_goal_label(&self) -> String {
        format!(
            "{}: {} | {}: {}",
            self.home, self.home_spells.since_four, self.away, self.away_spells.since_four
        )
    }

    pub fn three_goal_label(&self) -> String {
        format!(
            "{}: {} | {}: {}",
            self.home, self.home_spells.since_three, self.away, self.away_spells.since_three
        )
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub added: usize,
    pub errors: Vec<ParseError>,
    pub seasons_closed: u32,
    pub season: u32,
}

#[derive(Debug, Clone)]
pub struct LeagueState {
    pub config: LeagueConfig,
    stats: HashMap<String, TeamStats>,
    spells: HashMap<String, DrySpells>,
    history: Vec<EnrichedMatch>,
    season: u32,
    next_id: u64,
    logs: VecDeque<String>,
}

impl Default for LeagueState {
    fn default() -> Self {
        Self::new(LeagueConfig::default())
    }
}

impl LeagueState {
    pub fn new(config: LeagueConfig) -> Self {
        let mut state = Self {
            config,
            stats: HashMap::new(),
            spells: HashMap::new(),
            history: Vec::with_capacity(64),
            season: 1,
            next_id: 1,
            logs: VecDeque::with_capacity(MAX_LOGS),
        };
        state.reset_tables();
        state
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.config.teams
    }

    pub fn team_stats(&self, team: &str) -> Option<&TeamStats> {
        self.stats.get(team)
    }

    pub fn dry_spells(&self, team: &str) -> Option<&DrySpells> {
        self.spells.get(team)
    }

    pub fn history(&self) -> &[EnrichedMatch] {
        &self.history
    }

    pub fn season(&self) -> u32 {
        self.season
    }

    pub fn logs(&self) -> &VecDeque<String> {
        &self.logs
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }

    /// Parse a paste and apply every valid group; bad groups never block good ones.
    pub fn ingest(&mut self, raw: &str) -> IngestReport {
        let outcome = parse::parse_text(raw, &self.config.teams, self.config.parse_error_limit);
        for err in &outcome.errors {
            self.push_log(format!("[WARN] {err}"));
        }

        let season_before = self.season;
        let added = outcome.matches.len();
        for m in outcome.matches {
            self.apply(m);
        }

        self.push_log(format!("[INFO] Added {added} matches"));
        info!(
            added,
            errors = outcome.errors.len(),
            season = self.season,
            "ingested paste"
        );
        IngestReport {
            added,
            errors: outcome.errors,
            seasons_closed: self.season - season_before,
            season: self.season,
        }
    }

    /// Record one validated match. Both names must belong to the vocabulary.
    pub fn apply(&mut self, m: RawMatch) -> &EnrichedMatch {
        debug_assert!(self.config.teams.contains(&m.home), "unknown home team");
        debug_assert!(self.config.teams.contains(&m.away), "unknown away team");

        let total = m.total_goals();

        {
            let home = self.spells.entry(m.home.clone()).or_default();
            home.since_four = bump_or_reset(home.since_four, total == 4);
            home.since_three = bump_or_reset(home.since_three, total == 3);
            home.since_four_home = bump_or_reset(home.since_four_home, total == 4);
        }
        {
            let away = self.spells.entry(m.away.clone()).or_default();
            away.since_four = bump_or_reset(away.since_four, total == 4);
            away.since_three = bump_or_reset(away.since_three, total == 3);
            away.since_four_away = bump_or_reset(away.since_four_away, total == 4);
        }

        self.stats
            .entry(m.home.clone())
            .or_default()
            .record(m.home_score, m.away_score);
        self.stats
            .entry(m.away.clone())
            .or_default()
            .record(m.away_score, m.home_score);

        let home_spells = self.spells.get(&m.home).copied().unwrap_or_default();
        let away_spells = self.spells.get(&m.away).copied().unwrap_or_default();

        let enriched = EnrichedMatch {
            id: self.next_id,
            season: self.season,
            total_goals: total,
            outcome: m.outcome(),
            goal_difference: i64::from(m.home_score) - i64::from(m.away_score),
            both_teams_scored: m.home_score > 0 && m.away_score > 0,
            over_under: OverUnder::from_total(total),
            total_g: TotalGoalsMark::from_total(total),
            home_spells,
            away_spells,
            home: m.home,
            home_score: m.home_score,
            away_score: m.away_score,
            away: m.away,
        };
        debug!(
            id = enriched.id,
            home = %enriched.home,
            away = %enriched.away,
            score = %format!("{}-{}", enriched.home_score, enriched.away_score),
            "applied match"
        );
        self.next_id += 1;
        self.history.push(enriched);

        self.maybe_close_season();
        &self.history[self.history.len() - 1]
    }

    /// Back to the initial empty session, history included.
    pub fn clear(&mut self) {
        self.history.clear();
        self.season = 1;
        self.next_id = 1;
        self.reset_tables();
        self.push_log("[INFO] Cleared all data");
        info!("league state cleared");
    }

    fn maybe_close_season(&mut self) {
        let Some(length) = self.config.season_length else {
            return;
        };
        if !self.stats.values().any(|s| s.played >= length) {
            return;
        }
        let closed = self.season;
        self.season += 1;
        self.reset_tables();
        self.push_log(format!(
            "[INFO] Season {closed} complete, starting season {}",
            self.season
        ));
        info!(closed, next = self.season, "season rollover");
    }

    fn reset_tables(&mut self) {
        self.stats = self
            .config
            .teams
            .iter()
            .map(|t| (t.to_string(), TeamStats::default()))
            .collect();
        self.spells = self
            .config
            .teams
            .iter()
            .map(|t| (t.to_string(), DrySpells::default()))
            .collect();
    }
}

fn bump_or_reset(counter: u32, reset: bool) -> u32 {
    if reset { 0 } else { counter + 1 }
}
