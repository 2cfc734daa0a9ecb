pub mod clock;
pub mod edge;
pub mod pace;
pub mod projection;
pub mod types;

pub use edge::{compute_edge, EdgeResult};
pub use projection::ProjectionEngine;
pub use types::{
    BaseMode, BoxScoreSnapshot, GameClockState, Lean, Matchup, PeriodStructure, ProjectionComponents,
    ProjectionError, ProjectionResult, SpreadInfo, TeamBoxScore,
};
