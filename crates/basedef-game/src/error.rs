use basedef_core::GridError;
use basedef_paths::PathError;

use crate::session::Phase;

/// Errors raised while building or playing a level.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error(transparent)]
    Grid(#[from] GridError),
    /// Level setup ran out of interior cells.
    #[error("no free cell left to place {what}")]
    NoFreeCell { what: &'static str },
    #[error("invalid game configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("{action} is not allowed during {phase:?}")]
    OutOfTurn { action: &'static str, phase: Phase },
}
