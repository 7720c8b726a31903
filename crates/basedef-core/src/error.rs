//! Errors raised by [`Grid`](crate::Grid) access.

use crate::geom::Point;

/// Errors that can occur when building or indexing a grid.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum GridError {
    /// A cell coordinate lies outside `0..width` × `0..height`.
    #[error("cell {pos} is outside the {width}x{height} grid")]
    OutOfBounds { pos: Point, width: i32, height: i32 },
    /// Width and height must both be positive and the cell size finite and > 0.
    #[error("invalid grid dimensions {width}x{height} (cell size {cell_size})")]
    InvalidDimensions {
        width: i32,
        height: i32,
        cell_size: f32,
    },
}
