use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use crate::model::types::{BaseMode, PeriodStructure};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub projection: ProjectionConfig,
    #[serde(default)]
    pub signal: SignalConfig,
    #[serde(default)]
    pub odds: OddsConfig,
    #[serde(default)]
    pub monitoring: MonitoringConfig,
    /// League overrides, merged over the built-in presets on load
    #[serde(default)]
    pub leagues: HashMap<String, LeagueConfig>,
    /// Manually entered totals keyed by game id
    #[serde(default)]
    pub lines: HashMap<String, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_snapshot_path")]
    pub snapshot_path: String,
    /// 0 runs a single pass
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            snapshot_path: default_snapshot_path(),
            poll_interval_secs: default_poll_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub regulation_periods: u32,
    pub period_length_minutes: f64,
    #[serde(default = "default_overtime_length")]
    pub overtime_length_minutes: f64,
    /// Defaults to the regulation length
    #[serde(default)]
    pub full_game_minutes: Option<f64>,
    /// Scales the not-yet-played part of the projection
    #[serde(default = "default_pace_coefficient")]
    pub pace_coefficient: f64,
    #[serde(default)]
    pub auto_odds: bool,
    /// League value the odds feed expects; defaults to the league key
    #[serde(default)]
    pub feed_key: Option<String>,
}

impl LeagueConfig {
    fn preset(
        name: &str,
        structure: PeriodStructure,
        pace_coefficient: f64,
        auto_odds: bool,
        feed_key: &str,
    ) -> Self {
        Self {
            name: name.to_string(),
            regulation_periods: structure.regulation_periods,
            period_length_minutes: structure.period_length_minutes,
            overtime_length_minutes: structure.overtime_length_minutes,
            full_game_minutes: None,
            pace_coefficient,
            auto_odds,
            feed_key: Some(feed_key.to_string()),
        }
    }

    /// Built-in leagues, keyed by the value snapshot entries carry.
    pub fn presets() -> HashMap<String, LeagueConfig> {
        [
            ("NBB", Self::preset("Brazil NBB", PeriodStructure::quarters(10.0), 1.02, false, "BRAZIL")),
            ("CBA", Self::preset("CBA (China)", PeriodStructure::quarters(10.0), 1.05, false, "CHINA")),
            ("NBA", Self::preset("NBA", PeriodStructure::quarters(12.0), 1.12, true, "NBA")),
            ("EURO", Self::preset("EuroLeague", PeriodStructure::quarters(10.0), 0.94, true, "UCL")),
            ("NCAAB", Self::preset("NCAA Men's", PeriodStructure::halves(20.0), 1.00, false, "NCAAB")),
        ]
        .into_iter()
        .map(|(key, league)| (key.to_string(), league))
        .collect()
    }

    pub fn structure(&self) -> PeriodStructure {
        PeriodStructure {
            regulation_periods: self.regulation_periods,
            period_length_minutes: self.period_length_minutes,
            overtime_length_minutes: self.overtime_length_minutes,
        }
    }

    pub fn full_game_minutes(&self) -> f64 {
        self.full_game_minutes
            .unwrap_or_else(|| self.structure().regulation_minutes())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectionConfig {
    #[serde(default)]
    pub mode: BaseMode,
    /// No projection at or below this much game time
    #[serde(default = "default_min_elapsed")]
    pub min_elapsed_minutes: f64,
    /// Use the linear base when the possession estimate is degenerate
    #[serde(default = "default_true")]
    pub fallback_to_linear: bool,
    #[serde(default)]
    pub referee: RefereeConfig,
    #[serde(default)]
    pub comeback: ComebackConfig,
    #[serde(default)]
    pub close_game: CloseGameConfig,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            mode: BaseMode::default(),
            min_elapsed_minutes: default_min_elapsed(),
            fallback_to_linear: true,
            referee: RefereeConfig::default(),
            comeback: ComebackConfig::default(),
            close_game: CloseGameConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoulBasis {
    /// Both teams' fouls together
    #[default]
    Combined,
    /// Average per team
    PerTeam,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RefereeConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Fouls per minute above which the whistle counts as tight
    #[serde(default = "default_tightness_threshold")]
    pub tightness_threshold: f64,
    #[serde(default = "default_points_per_excess_foul")]
    pub points_per_excess_foul_minute: f64,
    #[serde(default)]
    pub foul_basis: FoulBasis,
}

impl Default for RefereeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tightness_threshold: default_tightness_threshold(),
            points_per_excess_foul_minute: default_points_per_excess_foul(),
            foul_basis: FoulBasis::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ComebackConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Signed bookmaker spread; the favorite must be laying at least this much
    #[serde(default = "default_heavy_favorite_spread")]
    pub heavy_favorite_spread: f64,
    #[serde(default = "default_deficit_multiplier")]
    pub deficit_multiplier: f64,
}

impl Default for ComebackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            heavy_favorite_spread: default_heavy_favorite_spread(),
            deficit_multiplier: default_deficit_multiplier(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CloseGameConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_close_game_differential")]
    pub max_differential: f64,
    #[serde(default = "default_close_game_bonus")]
    pub bonus: f64,
}

impl Default for CloseGameConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_differential: default_close_game_differential(),
            bonus: default_close_game_bonus(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignalConfig {
    #[serde(default = "default_min_edge")]
    pub min_edge: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self { min_edge: default_min_edge() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OddsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_sportsbook")]
    pub sportsbook: String,
    #[serde(default = "default_actor")]
    pub actor: String,
    #[serde(default = "default_odds_ttl")]
    pub ttl_secs: u64,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Minimum Jaro-Winkler similarity for a fuzzy team match
    #[serde(default = "default_match_threshold")]
    pub match_threshold: f64,
    /// Extra alias -> canonical team name entries
    #[serde(default)]
    pub aliases: HashMap<String, String>,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sportsbook: default_sportsbook(),
            actor: default_actor(),
            ttl_secs: default_odds_ttl(),
            request_timeout_secs: default_request_timeout(),
            match_threshold: default_match_threshold(),
            aliases: HashMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub csv_logging: bool,
    #[serde(default = "default_csv_log_path")]
    pub csv_log_path: String,
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            csv_logging: false,
            csv_log_path: default_csv_log_path(),
        }
    }
}

fn default_true() -> bool { true }
fn default_snapshot_path() -> String { "games.json".to_string() }
fn default_poll_interval() -> u64 { 30 }
fn default_overtime_length() -> f64 { 5.0 }
fn default_pace_coefficient() -> f64 { 1.0 }
fn default_min_elapsed() -> f64 { 2.0 }
fn default_tightness_threshold() -> f64 { 1.1 }
fn default_points_per_excess_foul() -> f64 { 8.0 }
fn default_heavy_favorite_spread() -> f64 { -6.5 }
fn default_deficit_multiplier() -> f64 { 0.5 }
fn default_close_game_differential() -> f64 { 6.0 }
fn default_close_game_bonus() -> f64 { 4.0 }
fn default_min_edge() -> f64 { 4.0 }
fn default_sportsbook() -> String { "FanDuel".to_string() }
fn default_actor() -> String { "harvest~sportsbook-odds-scraper".to_string() }
fn default_odds_ttl() -> u64 { 300 }
fn default_request_timeout() -> u64 { 120 }
fn default_match_threshold() -> f64 { 0.88 }
fn default_csv_log_path() -> String { "projections.csv".to_string() }

#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub apify_token: Option<String>,
    pub apify_base_url: String,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path))
    }

    /// Parse, merge league overrides over the presets, and validate.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(contents)?;

        let mut leagues = LeagueConfig::presets();
        for (key, league) in config.leagues.drain() {
            leagues.insert(key.to_uppercase(), league);
        }
        config.leagues = leagues;

        config.validate()?;
        Ok(config)
    }

    pub fn league(&self, key: &str) -> Option<&LeagueConfig> {
        self.leagues.get(&key.to_uppercase())
    }

    /// Every numeric field must be finite; NaN would slip past the range checks.
    pub fn validate(&self) -> Result<()> {
        for (key, league) in &self.leagues {
            if league.regulation_periods == 0 {
                anyhow::bail!("League {}: regulation_periods must be positive", key);
            }
            ensure_positive(&format!("leagues.{}.period_length_minutes", key), league.period_length_minutes)?;
            ensure_positive(&format!("leagues.{}.overtime_length_minutes", key), league.overtime_length_minutes)?;
            ensure_positive(&format!("leagues.{}.full_game_minutes", key), league.full_game_minutes())?;
            ensure_positive(&format!("leagues.{}.pace_coefficient", key), league.pace_coefficient)?;
        }

        let projection = &self.projection;
        ensure_non_negative("projection.min_elapsed_minutes", projection.min_elapsed_minutes)?;
        ensure_non_negative("projection.referee.tightness_threshold", projection.referee.tightness_threshold)?;
        ensure_non_negative(
            "projection.referee.points_per_excess_foul_minute",
            projection.referee.points_per_excess_foul_minute,
        )?;
        ensure_non_negative("projection.comeback.deficit_multiplier", projection.comeback.deficit_multiplier)?;
        ensure_finite("projection.comeback.heavy_favorite_spread", projection.comeback.heavy_favorite_spread)?;
        // Signed bookmaker spread: a favorite's number is never positive.
        if projection.comeback.heavy_favorite_spread > 0.0 {
            anyhow::bail!(
                "projection.comeback.heavy_favorite_spread must be <= 0 (e.g. -6.5), got {}",
                projection.comeback.heavy_favorite_spread
            );
        }
        ensure_non_negative("projection.close_game.max_differential", projection.close_game.max_differential)?;
        ensure_non_negative("projection.close_game.bonus", projection.close_game.bonus)?;
        ensure_non_negative("signal.min_edge", self.signal.min_edge)?;

        ensure_finite("odds.match_threshold", self.odds.match_threshold)?;
        if !(self.odds.match_threshold > 0.0 && self.odds.match_threshold <= 1.0) {
            anyhow::bail!("odds.match_threshold must be in (0, 1]");
        }

        for (game_id, total) in &self.lines {
            ensure_finite(&format!("lines.{}", game_id), *total)?;
        }

        Ok(())
    }
}

fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        anyhow::bail!("{} must be a finite number, got {}", field, value);
    }
    Ok(())
}

fn ensure_non_negative(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value < 0.0 {
        anyhow::bail!("{} must not be negative", field);
    }
    Ok(())
}

fn ensure_positive(field: &str, value: f64) -> Result<()> {
    ensure_finite(field, value)?;
    if value <= 0.0 {
        anyhow::bail!("{} must be positive", field);
    }
    Ok(())
}

impl EnvConfig {
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();

        Ok(Self {
            apify_token: std::env::var("APIFY_TOKEN")
                .ok()
                .filter(|token| !token.trim().is_empty()),
            apify_base_url: std::env::var("APIFY_BASE_URL")
                .unwrap_or_else(|_| "https://api.apify.com/v2".to_string()),
        })
    }
}
