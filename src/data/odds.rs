use anyhow::{Context, Result};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use crate::config::OddsConfig;
use crate::data::types::OddsLine;

/// Sportsbook totals through an Apify odds-scraper actor.
pub struct OddsClient {
    client: Client,
    base_url: String,
    token: String,
    actor: String,
    sportsbook: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OddsItem {
    #[serde(default)]
    home_team: Option<String>,
    #[serde(default)]
    away_team: Option<String>,
    #[serde(default)]
    odds: Vec<OddsEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct OddsEntry {
    /// Number or numeric string depending on the book
    #[serde(default)]
    over_under: Option<serde_json::Value>,
}

impl OddsClient {
    pub fn new(config: &OddsConfig, base_url: String, token: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
            actor: config.actor.clone(),
            sportsbook: config.sportsbook.clone(),
        })
    }

    /// Run the actor for one league and collect the game totals it returns.
    pub async fn fetch_totals(&self, feed_key: &str) -> Result<Vec<OddsLine>> {
        let url = format!(
            "{}/acts/{}/run-sync-get-dataset-items",
            self.base_url, self.actor
        );

        let items: Vec<OddsItem> = self.client
            .post(&url)
            .query(&[("token", self.token.as_str())])
            .json(&serde_json::json!({
                "league": feed_key,
                "sportsbook": self.sportsbook,
            }))
            .send()
            .await
            .context("Failed to reach odds feed")?
            .error_for_status()
            .context("Odds feed returned an error status")?
            .json()
            .await
            .context("Failed to parse odds response")?;

        Ok(extract_lines(items))
    }
}

/// First listed over/under per game; games without odds are skipped.
fn extract_lines(items: Vec<OddsItem>) -> Vec<OddsLine> {
    items
        .into_iter()
        .filter_map(|item| {
            let home_team = item.home_team?;
            let total = item
                .odds
                .first()
                .and_then(|entry| entry.over_under.as_ref())
                .and_then(parse_total)?;

            Some(OddsLine {
                home_team,
                away_team: item.away_team,
                total,
            })
        })
        .collect()
}

fn parse_total(value: &serde_json::Value) -> Option<f64> {
    let total = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;

    (total.is_finite() && total > 0.0).then_some(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_lines() {
        let json = r#"[
            {"homeTeam": "Boston Celtics", "awayTeam": "Miami Heat", "odds": [{"overUnder": 221.5}, {"overUnder": 222.0}]},
            {"homeTeam": "Real Madrid", "odds": [{"overUnder": "158.5"}]},
            {"homeTeam": "Denver Nuggets", "odds": []},
            {"homeTeam": "Utah Jazz", "odds": [{"overUnder": null}]},
            {"homeTeam": "Phoenix Suns", "odds": [{"overUnder": 0}]},
            {"awayTeam": "Nobody", "odds": [{"overUnder": 200.5}]}
        ]"#;

        let items: Vec<OddsItem> = serde_json::from_str(json).unwrap();
        let lines = extract_lines(items);

        assert_eq!(
            lines,
            vec![
                OddsLine {
                    home_team: "Boston Celtics".to_string(),
                    away_team: Some("Miami Heat".to_string()),
                    total: 221.5,
                },
                OddsLine {
                    home_team: "Real Madrid".to_string(),
                    away_team: None,
                    total: 158.5,
                },
            ]
        );
    }

    #[test]
    fn test_client_trims_base_url() {
        let client = OddsClient::new(
            &OddsConfig::default(),
            "https://api.apify.com/v2/".to_string(),
            "token".to_string(),
        )
        .unwrap();
        assert_eq!(client.base_url, "https://api.apify.com/v2");
        assert_eq!(client.actor, "harvest~sportsbook-odds-scraper");
    }
}
