use crate::config::{
    CloseGameConfig, ComebackConfig, FoulBasis, LeagueConfig, ProjectionConfig, RefereeConfig,
};
use crate::model::pace::{efficiency, estimate_possessions, projected_pace};
use crate::model::types::{
    BaseMode, BoxScoreSnapshot, GameClockState, Matchup, ProjectionComponents, ProjectionError,
    ProjectionResult, SpreadInfo,
};
use tracing::debug;

/// Live total projection: pace times efficiency plus situational adjustments.
///
/// Holds configuration only. Every call is a pure function of its inputs,
/// so one engine can be shared across threads.
#[derive(Debug, Clone)]
pub struct ProjectionEngine {
    config: ProjectionConfig,
    full_game_minutes: f64,
    pace_coefficient: f64,
}

impl ProjectionEngine {
    pub fn new(config: ProjectionConfig, full_game_minutes: f64) -> Self {
        Self {
            config,
            full_game_minutes,
            pace_coefficient: 1.0,
        }
    }

    pub fn for_league(config: ProjectionConfig, league: &LeagueConfig) -> Self {
        Self::new(config, league.full_game_minutes()).with_pace_coefficient(league.pace_coefficient)
    }

    pub fn with_pace_coefficient(mut self, pace_coefficient: f64) -> Self {
        self.pace_coefficient = pace_coefficient;
        self
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Project the final combined score from one feed snapshot.
    pub fn project(
        &self,
        clock: &GameClockState,
        box_score: &BoxScoreSnapshot,
        matchup: &Matchup,
        spread: Option<&SpreadInfo>,
    ) -> Result<ProjectionResult, ProjectionError> {
        let elapsed_minutes = clock.elapsed_minutes();
        if elapsed_minutes <= self.config.min_elapsed_minutes {
            return Err(ProjectionError::InsufficientSample {
                elapsed_minutes,
                minimum: self.config.min_elapsed_minutes,
            });
        }

        let game_length_minutes = clock.game_length_minutes(self.full_game_minutes);
        let estimate = estimate_possessions(box_score);
        let derived_pace = projected_pace(estimate.possessions, elapsed_minutes, game_length_minutes);
        let derived_efficiency = efficiency(box_score, estimate.possessions);

        let mode = if estimate.clamped && self.config.fallback_to_linear {
            BaseMode::Linear
        } else {
            self.config.mode
        };

        let raw_base = match mode {
            BaseMode::Possession => derived_pace * derived_efficiency,
            BaseMode::Linear => {
                linear_projection(box_score.combined_score(), elapsed_minutes, game_length_minutes)
            }
        };

        // Coefficient applies to the unplayed part only.
        let current = box_score.combined_score() as f64;
        let base = raw_base * self.pace_coefficient + current * (1.0 - self.pace_coefficient);

        let components = ProjectionComponents {
            base,
            referee_adjustment: referee_adjustment(
                &self.config.referee,
                box_score.personal_fouls,
                elapsed_minutes,
            ),
            comeback_adjustment: comeback_adjustment(
                &self.config.comeback,
                clock,
                box_score,
                matchup,
                spread,
            ),
            close_game_adjustment: close_game_adjustment(&self.config.close_game, clock, box_score),
        };

        debug!(
            "{} @ {}: base={:.1} ({}) ref={:.1} comeback={:.1} close={:.1} pace={:.1} ppp={:.3}",
            matchup.away,
            matchup.home,
            components.base,
            mode,
            components.referee_adjustment,
            components.comeback_adjustment,
            components.close_game_adjustment,
            derived_pace,
            derived_efficiency
        );

        Ok(ProjectionResult {
            projected_total: components.total(),
            components,
            derived_pace,
            derived_efficiency,
            possessions: estimate.possessions,
            elapsed_minutes,
            game_length_minutes,
            mode,
            low_confidence: estimate.clamped,
        })
    }
}

/// Points per minute so far, carried to the end of the game.
pub fn linear_projection(combined_score: u32, elapsed_minutes: f64, game_length_minutes: f64) -> f64 {
    combined_score as f64 * (game_length_minutes / elapsed_minutes)
}

/// Extra points for a tight whistle: fouls per minute above the threshold
/// mean more free throws than the possession count implies.
pub fn referee_adjustment(config: &RefereeConfig, personal_fouls: f64, elapsed_minutes: f64) -> f64 {
    if !config.enabled || elapsed_minutes <= 0.0 {
        return 0.0;
    }

    let fouls = match config.foul_basis {
        FoulBasis::Combined => personal_fouls,
        FoulBasis::PerTeam => personal_fouls / 2.0,
    };
    let fouls_per_minute = fouls / elapsed_minutes;

    if fouls_per_minute > config.tightness_threshold {
        (fouls_per_minute - config.tightness_threshold) * config.points_per_excess_foul_minute
    } else {
        0.0
    }
}

/// A heavy favorite trailing in the second half is expected to speed up
/// while the underdog's offense regresses; half the deficit is added by
/// default. This is a modeling assumption, not a fitted constant.
pub fn comeback_adjustment(
    config: &ComebackConfig,
    clock: &GameClockState,
    box_score: &BoxScoreSnapshot,
    matchup: &Matchup,
    spread: Option<&SpreadInfo>,
) -> f64 {
    if !config.enabled || !clock.is_second_half() {
        return 0.0;
    }

    let Some(spread) = spread else {
        return 0.0;
    };

    // Bookmaker convention: the favorite's spread is negative.
    if -spread.magnitude.abs() > config.heavy_favorite_spread {
        return 0.0;
    }

    let (favorite_score, underdog_score) = if same_team(&spread.favorite, &matchup.home) {
        (box_score.home_score, box_score.away_score)
    } else if same_team(&spread.favorite, &matchup.away) {
        (box_score.away_score, box_score.home_score)
    } else {
        debug!(
            "Favorite {:?} is neither {:?} nor {:?}",
            spread.favorite, matchup.home, matchup.away
        );
        return 0.0;
    };

    let deficit = underdog_score as f64 - favorite_score as f64;
    if deficit <= 0.0 {
        return 0.0;
    }

    deficit * config.deficit_multiplier
}

/// Close games late draw intentional fouls and extra free throws.
pub fn close_game_adjustment(
    config: &CloseGameConfig,
    clock: &GameClockState,
    box_score: &BoxScoreSnapshot,
) -> f64 {
    if config.enabled
        && clock.is_second_half()
        && box_score.score_differential() as f64 <= config.max_differential
    {
        config.bonus
    } else {
        0.0
    }
}

fn same_team(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}
