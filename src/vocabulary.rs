use std::collections::HashSet;

use serde::Serialize;

pub const DEFAULT_TEAMS: [&str; 20] = [
    "Arsenal",
    "Aston Villa",
    "Bournemouth",
    "Brentford",
    "Brighton",
    "Burnley",
    "Chelsea",
    "Crystal Palace",
    "Everton",
    "Fulham",
    "Leeds",
    "Leicester",
    "Liverpool",
    "Manchester Blue",
    "Manchester Red",
    "Newcastle",
    "Nottingham",
    "Southampton",
    "Tottenham",
    "Wolves",
];

/// The fixed, case-sensitive set of team names a paste may mention.
///
/// Names are kept sorted so that every scan over the vocabulary (substring
/// fallback in the cleaner, table order before ranking) is deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    names: Vec<String>,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(DEFAULT_TEAMS)
    }
}

impl Vocabulary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let mut names = names
            .into_iter()
            .map(Into::into)
            .map(|name: String| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .filter(|name| seen.insert(name.clone()))
            .collect::<Vec<_>>();
        names.sort();
        Self { names }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.binary_search_by(|n| n.as_str().cmp(name)).is_ok()
    }

    /// First team (in sorted order) whose name occurs inside `line`.
    pub fn find_in(&self, line: &str) -> Option<&str> {
        self.names
            .iter()
            .map(String::as_str)
            .find(|name| line.contains(name))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
