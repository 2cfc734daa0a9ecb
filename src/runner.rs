use anyhow::Result;
use std::collections::BTreeSet;
use std::time::Duration;
use crate::config::{Config, EnvConfig};
use crate::data::cache::{LineStore, ResolvedLine};
use crate::data::matching::TeamMatcher;
use crate::data::odds::OddsClient;
use crate::data::types::{GameFeedEntry, OddsLine};
use crate::model::edge::{compute_edge, EdgeResult};
use crate::model::projection::ProjectionEngine;
use crate::model::types::{GameClockState, Lean, ProjectionError, ProjectionResult};
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct GameReport {
    pub game_id: String,
    pub league: String,
    pub home_team: String,
    pub away_team: String,
    pub home_score: u32,
    pub away_score: u32,
    pub period: u32,
    pub clock: String,
    pub outcome: ReportOutcome,
}

#[derive(Debug, Clone)]
pub enum ReportOutcome {
    Projected {
        projection: ProjectionResult,
        line: Option<ResolvedLine>,
        edge: EdgeResult,
        lean: Option<Lean>,
    },
    InsufficientSample {
        elapsed_minutes: f64,
    },
    UnknownLeague,
}

/// One dashboard: config, the caller-owned line store, and the odds feed.
pub struct Dashboard {
    config: Config,
    lines: LineStore,
    matcher: TeamMatcher,
    odds: Option<OddsClient>,
}

impl Dashboard {
    pub fn new(config: Config, env: &EnvConfig) -> Result<Self> {
        let odds = match (&env.apify_token, config.odds.enabled) {
            (Some(token), true) => Some(OddsClient::new(
                &config.odds,
                env.apify_base_url.clone(),
                token.clone(),
            )?),
            (None, true) => {
                warn!("APIFY_TOKEN not set, odds automation disabled");
                None
            }
            _ => None,
        };

        Ok(Self::with_odds_client(config, odds))
    }

    pub fn with_odds_client(config: Config, odds: Option<OddsClient>) -> Self {
        let lines = LineStore::new(Duration::from_secs(config.odds.ttl_secs));
        for (game_id, total) in &config.lines {
            if !lines.set_manual(game_id, *total) {
                warn!("Ignoring manual line {} for {}: not a positive total", total, game_id);
            }
        }

        let matcher = TeamMatcher::new(config.odds.match_threshold).with_aliases(&config.odds.aliases);

        Self {
            config,
            lines,
            matcher,
            odds,
        }
    }

    pub fn lines(&self) -> &LineStore {
        &self.lines
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Pull totals for every auto-odds league present in the snapshot.
    pub async fn refresh_odds(&self, games: &[GameFeedEntry]) -> usize {
        let Some(client) = &self.odds else {
            return 0;
        };

        let feed_keys: BTreeSet<String> = games
            .iter()
            .filter_map(|game| {
                let league = self.config.league(&game.league)?;
                league
                    .auto_odds
                    .then(|| league.feed_key.clone().unwrap_or_else(|| game.league.to_uppercase()))
            })
            .collect();

        let mut stored = 0;
        for feed_key in feed_keys {
            match client.fetch_totals(&feed_key).await {
                Ok(odds_lines) => {
                    info!("Odds feed {}: {} totals", feed_key, odds_lines.len());
                    let league_games: Vec<&GameFeedEntry> = games
                        .iter()
                        .filter(|game| self.feed_key_for(game).as_deref() == Some(feed_key.as_str()))
                        .collect();
                    stored += self.apply_odds_lines(&league_games, &odds_lines);
                }
                Err(e) => warn!("Odds feed {} failed: {:#}", feed_key, e),
            }
        }

        stored
    }

    fn feed_key_for(&self, game: &GameFeedEntry) -> Option<String> {
        let league = self.config.league(&game.league)?;
        Some(league.feed_key.clone().unwrap_or_else(|| game.league.to_uppercase()))
    }

    /// Match feed totals onto snapshot games by home team and store them.
    pub fn apply_odds_lines(&self, games: &[&GameFeedEntry], odds_lines: &[OddsLine]) -> usize {
        let mut stored = 0;
        for game in games {
            let found = self.matcher.match_team(
                &game.home_team,
                odds_lines.iter().map(|line| line.home_team.as_str()),
            );

            match found {
                Some(found) => {
                    if let Some(line) = odds_lines.iter().find(|line| line.home_team == found.candidate) {
                        debug!(
                            "{} matched {:?} ({:?}), total {}",
                            game.home_team, found.candidate, found.confidence, line.total
                        );
                        if self.lines.insert_feed(&game.id, line.total) {
                            stored += 1;
                        }
                    }
                }
                None => debug!("No odds line for {}", game.home_team),
            }
        }
        stored
    }

    /// Project every game in the snapshot.
    ///
    /// Snapshot totals are reloaded from `games` and rank below fresh odds
    /// feed lines; expired feed lines are swept first.
    pub fn evaluate(&self, games: &[GameFeedEntry]) -> Vec<GameReport> {
        let swept = self.lines.sweep_expired();
        if swept > 0 {
            debug!("Evicted {} expired feed lines", swept);
        }

        self.lines.clear_snapshot();
        for game in games {
            if let Some(total) = game.total {
                if !self.lines.set_snapshot(&game.id, total) {
                    warn!("Ignoring snapshot total {} for {}: not a positive total", total, game.id);
                }
            }
        }

        games.iter().map(|game| self.evaluate_game(game)).collect()
    }

    fn evaluate_game(&self, game: &GameFeedEntry) -> GameReport {
        let outcome = match self.config.league(&game.league) {
            None => {
                warn!("Unknown league {:?} for game {}, skipping", game.league, game.id);
                ReportOutcome::UnknownLeague
            }
            Some(league) => {
                let engine = ProjectionEngine::for_league(self.config.projection.clone(), league);
                let clock = GameClockState::from_clock_str(game.period, &game.clock, league.structure());

                match engine.project(&clock, &game.box_score(), &game.matchup(), game.spread.as_ref()) {
                    Ok(projection) => {
                        let line = self.lines.resolve(&game.id);
                        let edge = compute_edge(projection.projected_total, line.map(|l| l.total));
                        let lean = edge.lean(self.config.signal.min_edge);

                        if let Some(lean) = lean {
                            info!(
                                "🚨 SIGNAL {}: {} @ {} proj {:.1} vs {} (edge {})",
                                lean,
                                game.away_team,
                                game.home_team,
                                projection.projected_total,
                                line.map(|l| format!("{:.1}", l.total)).unwrap_or_default(),
                                edge
                            );
                        }

                        ReportOutcome::Projected {
                            projection,
                            line,
                            edge,
                            lean,
                        }
                    }
                    Err(ProjectionError::InsufficientSample { elapsed_minutes, .. }) => {
                        debug!("{}: only {:.1} min played", game.id, elapsed_minutes);
                        ReportOutcome::InsufficientSample { elapsed_minutes }
                    }
                }
            }
        };

        GameReport {
            game_id: game.id.clone(),
            league: game.league.clone(),
            home_team: game.home_team.clone(),
            away_team: game.away_team.clone(),
            home_score: game.home_score,
            away_score: game.away_score,
            period: game.period,
            clock: game.clock.clone(),
            outcome,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::cache::LineSource;
    use crate::data::snapshot::parse_snapshot;

    fn dashboard() -> Dashboard {
        let config = Config::from_toml_str(
            r#"
            [lines]
            "nbb-123" = 165.5
            "#,
        )
        .unwrap();
        Dashboard::with_odds_client(config, None)
    }

    fn games() -> Vec<GameFeedEntry> {
        parse_snapshot(
            r#"[
                {"id": "nbb-123", "league": "NBB", "home_team": "Flamengo", "away_team": "Franca",
                 "home_score": 65, "away_score": 58, "period": 4, "clock": "05:00"},
                {"id": "nba-1", "league": "NBA", "home_team": "Boston Celtics", "away_team": "Miami Heat",
                 "home_score": 4, "away_score": 2, "period": 1, "clock": "10:30"},
                {"id": "nba-2", "league": "NBA", "home_team": "Los Angeles Lakers", "away_team": "Phoenix Suns",
                 "home_score": 60, "away_score": 50, "period": 2, "clock": "00:00"},
                {"id": "x-1", "league": "XYZ", "home_team": "A", "away_team": "B",
                 "home_score": 1, "away_score": 1, "period": 1, "clock": "01:00"}
            ]"#,
        )
        .unwrap()
    }

    #[test]
    fn test_manual_line_projection() {
        let reports = dashboard().evaluate(&games());

        // 123 points in 35 minutes of a 40 minute game, coefficient 1.02
        match &reports[0].outcome {
            ReportOutcome::Projected {
                projection,
                line,
                edge,
                lean,
            } => {
                let expected_base = 123.0 + (123.0 / 35.0) * 5.0 * 1.02;
                assert!((projection.components.base - expected_base).abs() < 1e-9);
                assert_eq!(projection.components.close_game_adjustment, 0.0);
                assert!(projection.low_confidence);
                assert_eq!(line.unwrap().source, LineSource::Manual);
                assert_eq!(edge.value(), Some(crate::model::edge::round_tenth(projection.projected_total - 165.5)));
                assert_eq!(*lean, Some(Lean::Under));
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_insufficient_sample_and_unknown_league() {
        let reports = dashboard().evaluate(&games());

        match reports[1].outcome {
            ReportOutcome::InsufficientSample { elapsed_minutes } => {
                assert!((elapsed_minutes - 1.5).abs() < 1e-9)
            }
            ref other => panic!("unexpected outcome {:?}", other),
        }
        assert!(matches!(reports[3].outcome, ReportOutcome::UnknownLeague));
    }

    #[test]
    fn test_no_line_is_reported_as_such() {
        let reports = dashboard().evaluate(&games());

        match &reports[2].outcome {
            ReportOutcome::Projected { line, edge, lean, .. } => {
                assert!(line.is_none());
                assert_eq!(*edge, EdgeResult::NoLine);
                assert!(lean.is_none());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_apply_odds_lines() {
        let dashboard = dashboard();
        let games = games();
        let nba: Vec<&GameFeedEntry> = games.iter().filter(|g| g.league == "NBA").collect();

        let odds = vec![
            OddsLine {
                home_team: "LA Lakers".to_string(),
                away_team: Some("Phoenix Suns".to_string()),
                total: 229.5,
            },
            OddsLine {
                home_team: "Denver Nuggets".to_string(),
                away_team: None,
                total: 230.0,
            },
        ];

        assert_eq!(dashboard.apply_odds_lines(&nba, &odds), 1);
        assert_eq!(dashboard.lines().resolve("nba-2").unwrap().total, 229.5);
        assert!(dashboard.lines().resolve("nba-1").is_none());

        let reports = dashboard.evaluate(&games);
        match &reports[2].outcome {
            ReportOutcome::Projected { edge, .. } => assert!(edge.value().is_some()),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_feed_total_from_snapshot() {
        let dashboard = dashboard();
        let mut games = games();
        games[2].total = Some(225.0);

        let reports = dashboard.evaluate(&games);
        match &reports[2].outcome {
            ReportOutcome::Projected { line, .. } => {
                assert_eq!(line.unwrap().source, LineSource::Snapshot);
                assert_eq!(line.unwrap().total, 225.0);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refresh_without_client_is_noop() {
        assert_eq!(dashboard().refresh_odds(&games()).await, 0);
    }

    #[test]
    fn test_fetched_odds_line_beats_snapshot_total() {
        let dashboard = dashboard();
        let mut games = games();
        games[2].total = Some(219.5);

        let odds = vec![OddsLine {
            home_team: "Los Angeles Lakers".to_string(),
            away_team: None,
            total: 231.5,
        }];
        let nba: Vec<&GameFeedEntry> = games.iter().filter(|g| g.league == "NBA").collect();
        assert_eq!(dashboard.apply_odds_lines(&nba, &odds), 1);

        let reports = dashboard.evaluate(&games);
        match &reports[2].outcome {
            ReportOutcome::Projected { line, .. } => {
                assert_eq!(line.unwrap().source, LineSource::Feed);
                assert_eq!(line.unwrap().total, 231.5);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        // A second pass keeps the fetched line too
        let reports = dashboard.evaluate(&games);
        match &reports[2].outcome {
            ReportOutcome::Projected { line, .. } => assert_eq!(line.unwrap().total, 231.5),
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_zero_totals_are_no_line() {
        let config = Config::from_toml_str(
            r#"
            [lines]
            "nba-2" = 0.0
            "#,
        )
        .unwrap();
        let dashboard = Dashboard::with_odds_client(config, None);
        let mut games = games();
        games[2].total = Some(0.0);

        let reports = dashboard.evaluate(&games);
        match &reports[2].outcome {
            ReportOutcome::Projected { line, edge, .. } => {
                assert!(line.is_none());
                assert_eq!(*edge, EdgeResult::NoLine);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
    }

    #[test]
    fn test_snapshot_total_dropped_when_snapshot_no_longer_carries_it() {
        let dashboard = dashboard();
        let mut games = games();
        games[2].total = Some(225.0);
        dashboard.evaluate(&games);

        games[2].total = None;
        let reports = dashboard.evaluate(&games);
        match &reports[2].outcome {
            ReportOutcome::Projected { line, .. } => assert!(line.is_none()),
            other => panic!("unexpected outcome {:?}", other),
        }
    }
}
