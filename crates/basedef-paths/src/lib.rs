//! Pathfinding for the base defense board.
//!
//! A [`Pathfinder`] owns a [`Grid`](basedef_core::Grid) of [`PathNode`]s and
//! answers shortest-path queries between cells with a caller-selected
//! [`Algorithm`]:
//!
//! - **A\*** expands the open node with the lowest total cost.
//! - **Dijkstra** expands open nodes in the order they were discovered.
//!
//! Both share the same cost bookkeeping ([`distance_cost`]) and return the
//! path from the start (exclusive) to the goal (inclusive).
//!
//! Every state change of a search can be captured as an immutable [`Frame`]
//! by passing a [`SearchRecorder`] to [`Pathfinder::find_path_traced`]. The
//! frames are plain data and can be replayed later, at any pace, without
//! touching the pathfinder again.

mod cost;
mod engine;
mod error;
mod node;
mod trace;

pub use cost::{MOVE_STRAIGHT_COST, distance_cost, path_cost};
pub use engine::{Algorithm, Pathfinder};
pub use error::PathError;
pub use node::{PathNode, UNVISITED};
pub use trace::{CellMark, CellSnapshot, Frame, FrameKind, FrameLog, NoTrace, SearchRecorder};
