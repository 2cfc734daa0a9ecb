use anyhow::{Context, Result};
use std::fs;
use crate::data::types::GameFeedEntry;

/// Read the games snapshot written by the score/box-score collectors.
pub fn load_snapshot(path: &str) -> Result<Vec<GameFeedEntry>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot file: {}", path))?;

    parse_snapshot(&contents).with_context(|| format!("Failed to parse snapshot file: {}", path))
}

pub fn parse_snapshot(contents: &str) -> Result<Vec<GameFeedEntry>> {
    let games: Vec<GameFeedEntry> = serde_json::from_str(contents)?;
    Ok(games)
}
