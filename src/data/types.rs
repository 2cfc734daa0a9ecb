use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use crate::model::types::{BoxScoreSnapshot, Matchup, SpreadInfo, TeamBoxScore};

/// One in-progress game as the score and box-score feeds report it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameFeedEntry {
    pub id: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub period: u32,
    /// Time remaining in the period, "MM:SS"
    pub clock: String,
    #[serde(default)]
    pub box_score: Option<BoxScoreFeed>,
    #[serde(default)]
    pub spread: Option<SpreadInfo>,
    /// Over/under carried by the feed itself, if any
    #[serde(default)]
    pub total: Option<f64>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoxScoreFeed {
    pub home: TeamBoxScore,
    pub away: TeamBoxScore,
}

impl GameFeedEntry {
    pub fn matchup(&self) -> Matchup {
        Matchup {
            home: self.home_team.clone(),
            away: self.away_team.clone(),
        }
    }

    pub fn box_score(&self) -> BoxScoreSnapshot {
        match &self.box_score {
            Some(feed) => BoxScoreSnapshot::combine(self.home_score, self.away_score, &feed.home, &feed.away),
            None => BoxScoreSnapshot::scores_only(self.home_score, self.away_score),
        }
    }
}

/// A game total from the odds feed, keyed by the feed's home team name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OddsLine {
    pub home_team: String,
    pub away_team: Option<String>,
    pub total: f64,
}
