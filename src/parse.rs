use serde::Serialize;
use thiserror::Error;

use crate::clean::{self, is_digits};
use crate::state::RawMatch;
use crate::vocabulary::Vocabulary;

pub const GROUP_SIZE: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    Home,
    Away,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Home => f.write_str("home"),
            Side::Away => f.write_str("away"),
        }
    }
}

/// Groups are numbered from 1 in paste order.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
pub enum ParseError {
    #[error("group {group}: incomplete, only {remaining} of 4 lines left")]
    IncompleteGroup { group: usize, remaining: usize },
    #[error("group {group}: unknown {side} team {token:?}")]
    UnknownTeam {
        group: usize,
        side: Side,
        token: String,
    },
    #[error("group {group}: {side} score {token:?} is not a score from 0 to {max}", max = clean::MAX_SCORE)]
    InvalidScore {
        group: usize,
        side: Side,
        token: String,
    },
    #[error("group {group}: {team} cannot play itself")]
    SameTeam { group: usize, team: String },
    #[error("... and {suppressed} more errors")]
    Truncated { suppressed: usize },
}

impl ParseError {
    pub fn group(&self) -> Option<usize> {
        match self {
            ParseError::IncompleteGroup { group, .. }
            | ParseError::UnknownTeam { group, .. }
            | ParseError::InvalidScore { group, .. }
            | ParseError::SameTeam { group, .. } => Some(*group),
            ParseError::Truncated { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutcome {
    /// Processing order: the last pasted group comes first.
    pub matches: Vec<RawMatch>,
    pub errors: Vec<ParseError>,
}

impl ParseOutcome {
    pub fn error_messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

pub fn parse_text(raw: &str, vocab: &Vocabulary, error_limit: Option<usize>) -> ParseOutcome {
    let tokens = clean::clean_lines(raw, vocab);
    parse_tokens(&tokens, vocab, error_limit)
}

/// Walk the tokens four at a time without resynchronising on bad groups.
pub fn parse_tokens<S: AsRef<str>>(
    tokens: &[S],
    vocab: &Vocabulary,
    error_limit: Option<usize>,
) -> ParseOutcome {
    let mut matches = Vec::with_capacity(tokens.len() / GROUP_SIZE);
    let mut errors = ErrorSink::new(error_limit);

    for (idx, chunk) in tokens.chunks(GROUP_SIZE).enumerate() {
        let group = idx + 1;
        let [home, hs, away_score, away] = chunk else {
            errors.push(ParseError::IncompleteGroup {
                group,
                remaining: chunk.len(),
            });
            break;
        };
        let (home, hs, away_score, away) =
            (home.as_ref(), hs.as_ref(), away_score.as_ref(), away.as_ref());

        let mut ok = true;
        if !vocab.contains(home) {
            ok = false;
            errors.push(ParseError::UnknownTeam {
                group,
                side: Side::Home,
                token: home.to_string(),
            });
        }
        if !vocab.contains(away) {
            ok = false;
            errors.push(ParseError::UnknownTeam {
                group,
                side: Side::Away,
                token: away.to_string(),
            });
        }
        let home_score = score(hs);
        if home_score.is_none() {
            ok = false;
            errors.push(ParseError::InvalidScore {
                group,
                side: Side::Home,
                token: hs.to_string(),
            });
        }
        let away_goals = score(away_score);
        if away_goals.is_none() {
            ok = false;
            errors.push(ParseError::InvalidScore {
                group,
                side: Side::Away,
                token: away_score.to_string(),
            });
        }
        if ok && home == away {
            ok = false;
            errors.push(ParseError::SameTeam {
                group,
                team: home.to_string(),
            });
        }

        if let (true, Some(home_score), Some(away_score)) = (ok, home_score, away_goals) {
            matches.push(RawMatch {
                home: home.to_string(),
                home_score,
                away_score,
                away: away.to_string(),
            });
        }
    }

    matches.reverse();
    ParseOutcome {
        matches,
        errors: errors.finish(),
    }
}

fn score(token: &str) -> Option<u32> {
    if !is_digits(token) {
        return None;
    }
    token
        .parse::<u32>()
        .ok()
        .filter(|v| *v <= clean::MAX_SCORE)
}

struct ErrorSink {
    limit: Option<usize>,
    kept: Vec<ParseError>,
    suppressed: usize,
}

impl ErrorSink {
    fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            kept: Vec::new(),
            suppressed: 0,
        }
    }

    fn push(&mut self, err: ParseError) {
        match self.limit {
            Some(limit) if self.kept.len() >= limit => self.suppressed += 1,
            _ => self.kept.push(err),
        }
    }

    fn finish(mut self) -> Vec<ParseError> {
        if self.suppressed > 0 {
            self.kept.push(ParseError::Truncated {
                suppressed: self.suppressed,
            });
        }
        self.kept
    }
}
