use serde::{Deserialize, Serialize};

/// How a league divides regulation time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodStructure {
    /// 4 for quarters, 2 for halves
    pub regulation_periods: u32,
    pub period_length_minutes: f64,
    pub overtime_length_minutes: f64,
}

impl PeriodStructure {
    pub const fn quarters(period_length_minutes: f64) -> Self {
        Self {
            regulation_periods: 4,
            period_length_minutes,
            overtime_length_minutes: 5.0,
        }
    }

    pub const fn halves(period_length_minutes: f64) -> Self {
        Self {
            regulation_periods: 2,
            period_length_minutes,
            overtime_length_minutes: 5.0,
        }
    }

    pub fn regulation_minutes(&self) -> f64 {
        self.regulation_periods as f64 * self.period_length_minutes
    }
}

/// Game clock as reported by one feed poll.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameClockState {
    pub period: u32,
    pub seconds_remaining_in_period: f64,
    pub structure: PeriodStructure,
}

/// Combined (home + away) counting stats from one poll.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoxScoreSnapshot {
    pub home_score: u32,
    pub away_score: u32,
    pub field_goal_attempts: f64,
    pub free_throw_attempts: f64,
    pub offensive_rebounds: f64,
    pub turnovers: f64,
    pub personal_fouls: f64,
}

impl BoxScoreSnapshot {
    /// Sum two per-team rows into a combined snapshot.
    pub fn combine(home_score: u32, away_score: u32, home: &TeamBoxScore, away: &TeamBoxScore) -> Self {
        Self {
            home_score,
            away_score,
            field_goal_attempts: home.field_goal_attempts + away.field_goal_attempts,
            free_throw_attempts: home.free_throw_attempts + away.free_throw_attempts,
            offensive_rebounds: home.offensive_rebounds + away.offensive_rebounds,
            turnovers: home.turnovers + away.turnovers,
            personal_fouls: home.personal_fouls + away.personal_fouls,
        }
    }

    /// Score-only snapshot, used when the box-score feed has nothing for a game.
    pub fn scores_only(home_score: u32, away_score: u32) -> Self {
        Self {
            home_score,
            away_score,
            ..Self::default()
        }
    }

    pub fn combined_score(&self) -> u32 {
        self.home_score + self.away_score
    }

    pub fn score_differential(&self) -> u32 {
        self.home_score.abs_diff(self.away_score)
    }
}

/// One team's counting stats as the box-score feed delivers them.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamBoxScore {
    #[serde(default, alias = "fga")]
    pub field_goal_attempts: f64,
    #[serde(default, alias = "fta")]
    pub free_throw_attempts: f64,
    #[serde(default, alias = "orb")]
    pub offensive_rebounds: f64,
    #[serde(default, alias = "tov")]
    pub turnovers: f64,
    #[serde(default, alias = "fouls")]
    pub personal_fouls: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matchup {
    pub home: String,
    pub away: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadInfo {
    pub favorite: String,
    /// Points the favorite is laying, always non-negative
    pub magnitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseMode {
    /// Pace times points per possession
    #[default]
    Possession,
    /// Points per minute times game length
    Linear,
}

impl std::fmt::Display for BaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BaseMode::Possession => write!(f, "possession"),
            BaseMode::Linear => write!(f, "linear"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ProjectionComponents {
    /// Extrapolated total with the league pace coefficient already applied
    pub base: f64,
    pub referee_adjustment: f64,
    pub comeback_adjustment: f64,
    pub close_game_adjustment: f64,
}

impl ProjectionComponents {
    pub fn total(&self) -> f64 {
        self.base + self.referee_adjustment + self.comeback_adjustment + self.close_game_adjustment
    }
}

/// `components.base` includes the league pace coefficient, so it equals
/// `derived_pace * derived_efficiency` only when the coefficient is 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionResult {
    pub projected_total: f64,
    pub components: ProjectionComponents,
    /// Uncorrected by the pace coefficient
    pub derived_pace: f64,
    pub derived_efficiency: f64,
    pub possessions: f64,
    pub elapsed_minutes: f64,
    pub game_length_minutes: f64,
    /// Base mode actually used for this result
    pub mode: BaseMode,
    /// Set when the possession estimate had to be clamped
    pub low_confidence: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lean {
    Over,
    Under,
}

impl std::fmt::Display for Lean {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Lean::Over => write!(f, "OVER"),
            Lean::Under => write!(f, "UNDER"),
        }
    }
}

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum ProjectionError {
    #[error("Insufficient sample: {elapsed_minutes:.1} min elapsed, need more than {minimum:.1}")]
    InsufficientSample { elapsed_minutes: f64, minimum: f64 },
}
