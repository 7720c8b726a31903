use basedef_core::{GridError, Point};

/// Errors returned by [`Pathfinder`](crate::Pathfinder) operations.
///
/// An unreachable goal is not an error: searches report it as `Ok(None)`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum PathError {
    /// The start or the end of a search lies outside the grid.
    #[error("invalid search request from {start} to {end}: coordinates outside the grid")]
    InvalidSearchRequest { start: Point, end: Point },
    #[error(transparent)]
    Grid(#[from] GridError),
}
