use std::fs::File;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use crate::state::EnrichedMatch;

pub const HISTORY_COLUMNS: [&str; 18] = [
    "id",
    "season",
    "home_team",
    "home_score",
    "away_score",
    "away_team",
    "total_goals",
    "outcome",
    "goal_difference",
    "both_teams_scored",
    "over_under",
    "total_g",
    "home_since_four",
    "away_since_four",
    "home_since_four_home_only",
    "away_since_four_away_only",
    "home_since_three",
    "away_since_three",
];

/// Header row first, then one row per match in history order.
pub fn history_rows(history: &[EnrichedMatch]) -> Vec<Vec<String>> {
    let mut rows = Vec::with_capacity(history.len() + 1);
    rows.push(HISTORY_COLUMNS.iter().map(|c| c.to_string()).collect());
    for m in history {
        rows.push(vec![
            m.id.to_string(),
            m.season.to_string(),
            m.home.clone(),
            m.home_score.to_string(),
            m.away_score.to_string(),
            m.away.clone(),
            m.total_goals.to_string(),
            m.outcome.label().to_string(),
            m.goal_difference.to_string(),
            if m.both_teams_scored { "Yes" } else { "No" }.to_string(),
            m.over_under.label().to_string(),
            m.total_g.to_string(),
            m.home_spells.since_four.to_string(),
            m.away_spells.since_four.to_string(),
            m.home_spells.since_four_home.to_string(),
            m.away_spells.since_four_away.to_string(),
            m.home_spells.since_three.to_string(),
            m.away_spells.since_three.to_string(),
        ]);
    }
    rows
}

pub fn write_history_csv<W: Write>(history: &[EnrichedMatch], out: W) -> Result<usize> {
    let mut writer = csv::Writer::from_writer(out);
    for row in history_rows(history) {
        writer.write_record(&row).context("write csv row")?;
    }
    writer.flush().context("flush csv")?;
    Ok(history.len())
}

pub fn history_csv_string(history: &[EnrichedMatch]) -> Result<String> {
    let mut buf = Vec::new();
    write_history_csv(history, &mut buf)?;
    String::from_utf8(buf).context("csv is not utf-8")
}

pub fn export_history(path: &Path, history: &[EnrichedMatch]) -> Result<usize> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create export dir {}", parent.display()))?;
    }
    let tmp = path.with_extension("csv.tmp");
    let file = File::create(&tmp).with_context(|| format!("create {}", tmp.display()))?;
    let written = write_history_csv(history, file).and_then(|rows| {
        std::fs::rename(&tmp, path).with_context(|| format!("swap {}", path.display()))?;
        Ok(rows)
    });
    if written.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    written
}
