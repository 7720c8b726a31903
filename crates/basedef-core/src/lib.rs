//! **basedef-core**: foundational types for the base defense board.
//!
//! This crate provides the geometry primitives, the generic [`Grid`]
//! container holding one value per board cell, the [`GridError`] taxonomy
//! and the [`Color`] type used by debug overlays.

pub mod error;
pub mod geom;
pub mod grid;
pub mod style;

pub use error::GridError;
pub use geom::{Point, Range, RangeIter, Vec2};
pub use grid::{Grid, GridLayout};
pub use style::Color;
