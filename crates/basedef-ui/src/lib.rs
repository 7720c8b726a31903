//! Debug visualisation for pathfinding searches.
//!
//! - [`SnapshotPlayer`] queues the [`Frame`](basedef_paths::Frame)s of a
//!   search (it is itself a [`SearchRecorder`](basedef_paths::SearchRecorder))
//!   and replays them one per tick, independent of when the search ran.
//! - [`DebugOverlay`] is a [`FrameSink`] keeping one coloured layer per
//!   playback session, the way each agent's path is shown on its own layer.

mod overlay;
mod player;

pub use overlay::{DebugOverlay, OverlayCell};
pub use player::{FrameSink, PlaybackConfig, SessionId, SnapshotPlayer};
