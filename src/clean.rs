use once_cell::sync::Lazy;
use regex::Regex;

use crate::vocabulary::Vocabulary;

pub const MAX_SCORE: u32 = 20;
pub const LEAGUE_LITERAL: &str = "English League";

static WEEK_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bweek\s*\d+").expect("week label pattern"));
static TIME_OF_DAY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\d{1,2}:\d{2}(:\d{2})?\s*([ap]\.?\s?m\.?)?$").expect("time pattern")
});
static HASH_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"#\d+").expect("hash id pattern"));
static BARE_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{8,}$").expect("bare id pattern"));
static DASH_SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{1,3})\s*[-\u{2013}\u{2014}]\s*(\d{1,3})$").expect("dash score pattern")
});

/// Reduce a raw paste to team names and plausible score strings, in line order.
pub fn clean_lines(raw: &str, vocab: &Vocabulary) -> Vec<String> {
    let mut out = Vec::new();
    for line in raw.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if vocab.contains(line) || plausible_score(line).is_some() {
            out.push(line.to_string());
            continue;
        }
        if let Some((home, away)) = dash_score(line) {
            out.push(home.to_string());
            out.push(away.to_string());
            continue;
        }
        if is_noise(line) {
            continue;
        }
        if let Some(team) = vocab.find_in(line) {
            out.push(team.to_string());
        }
    }
    out
}

pub fn is_noise(line: &str) -> bool {
    WEEK_LABEL.is_match(line)
        || line.contains(LEAGUE_LITERAL)
        || TIME_OF_DAY.is_match(line)
        || HASH_ID.is_match(line)
        || BARE_ID.is_match(line)
}

pub fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

fn plausible_score(line: &str) -> Option<u32> {
    if !is_digits(line) {
        return None;
    }
    line.parse::<u32>().ok().filter(|v| *v <= MAX_SCORE)
}

// "2 - 1" as one line; both halves must be plausible.
fn dash_score(line: &str) -> Option<(&str, &str)> {
    let caps = DASH_SCORE.captures(line)?;
    let home = caps.get(1)?.as_str();
    let away = caps.get(2)?.as_str();
    plausible_score(home)?;
    plausible_score(away)?;
    Some((home, away))
}
