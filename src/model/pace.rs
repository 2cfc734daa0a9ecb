use crate::model::types::BoxScoreSnapshot;

/// Free throws per possession-ending trip to the line
pub const FREE_THROW_POSSESSION_FACTOR: f64 = 0.44;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PossessionEstimate {
    /// Always >= 1
    pub possessions: f64,
    /// The raw estimate was <= 0 and had to be clamped
    pub clamped: bool,
}

/// Possessions played so far: FGA - ORB + TOV + 0.44 * FTA.
///
/// Zeroed or incomplete stat feeds can push the raw estimate to 0 or below;
/// it is then clamped to 1 and flagged.
pub fn estimate_possessions(box_score: &BoxScoreSnapshot) -> PossessionEstimate {
    let raw = box_score.field_goal_attempts - box_score.offensive_rebounds
        + box_score.turnovers
        + FREE_THROW_POSSESSION_FACTOR * box_score.free_throw_attempts;

    if raw > 0.0 {
        PossessionEstimate {
            possessions: raw,
            clamped: false,
        }
    } else {
        PossessionEstimate {
            possessions: 1.0,
            clamped: true,
        }
    }
}

/// Possessions extrapolated to a full game.
pub fn projected_pace(possessions: f64, elapsed_minutes: f64, game_length_minutes: f64) -> f64 {
    // Ratio first so a finished game (elapsed == length) is an exact identity.
    possessions * (game_length_minutes / elapsed_minutes)
}

/// Points per possession.
pub fn efficiency(box_score: &BoxScoreSnapshot, possessions: f64) -> f64 {
    box_score.combined_score() as f64 / possessions
}
