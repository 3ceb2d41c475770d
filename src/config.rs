use std::env;

use thiserror::Error;

use crate::vocabulary::{DEFAULT_TEAMS, Vocabulary};

pub const ENV_TEAMS: &str = "APP_TEAMS";
pub const ENV_PARSE_ERROR_LIMIT: &str = "APP_PARSE_ERROR_LIMIT";
pub const ENV_SEASON_LENGTH: &str = "APP_SEASON_LENGTH";
pub const ENV_HOME_ADVANTAGE: &str = "APP_HOME_ADVANTAGE";

pub const DEFAULT_PARSE_ERROR_LIMIT: usize = 5;
pub const DEFAULT_SEASON_LENGTH: u32 = 38;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{key} must be a non-negative integer, got {value:?}")]
    NotANumber { key: &'static str, value: String },
    #[error("{key} must be a boolean flag, got {value:?}")]
    NotAFlag { key: &'static str, value: String },
    #[error("{key} must name at least two distinct teams")]
    TooFewTeams { key: &'static str },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LeagueConfig {
    pub teams: Vocabulary,
    /// `None` keeps every parse error.
    pub parse_error_limit: Option<usize>,
    /// `None` disables the season boundary.
    pub season_length: Option<u32>,
    pub home_advantage: bool,
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self {
            teams: Vocabulary::new(DEFAULT_TEAMS),
            parse_error_limit: Some(DEFAULT_PARSE_ERROR_LIMIT),
            season_length: Some(DEFAULT_SEASON_LENGTH),
            home_advantage: false,
        }
    }
}

impl LeagueConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Missing keys fall back to defaults; present but malformed keys are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut cfg = Self::default();

        if let Some(raw) = lookup(ENV_TEAMS)
            && !raw.trim().is_empty()
        {
            let teams = Vocabulary::new(raw.split([',', ';']));
            if teams.len() < 2 {
                return Err(ConfigError::TooFewTeams { key: ENV_TEAMS });
            }
            cfg.teams = teams;
        }
        if let Some(raw) = lookup(ENV_PARSE_ERROR_LIMIT) {
            cfg.parse_error_limit = zero_disables(parse_count(ENV_PARSE_ERROR_LIMIT, &raw)?);
        }
        if let Some(raw) = lookup(ENV_SEASON_LENGTH) {
            let n = parse_count(ENV_SEASON_LENGTH, &raw)?;
            cfg.season_length = zero_disables(n).map(|n| n.min(u32::MAX as usize) as u32);
        }
        if let Some(raw) = lookup(ENV_HOME_ADVANTAGE) {
            cfg.home_advantage = parse_flag(ENV_HOME_ADVANTAGE, &raw)?;
        }
        Ok(cfg)
    }
}

fn parse_count(key: &'static str, raw: &str) -> Result<usize, ConfigError> {
    raw.trim()
        .parse::<usize>()
        .map_err(|_| ConfigError::NotANumber {
            key,
            value: raw.to_string(),
        })
}

fn zero_disables(n: usize) -> Option<usize> {
    (n > 0).then_some(n)
}

fn parse_flag(key: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::NotAFlag {
            key,
            value: raw.to_string(),
        }),
    }
}
