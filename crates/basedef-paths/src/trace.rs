//! Search traces: immutable [`Frame`]s and the [`SearchRecorder`] that
//! collects them.
//!
//! A frame is a complete, pre-computed picture of the board at one instant
//! of a search. It carries no references back into the pathfinder, so it
//! can be queued and shown long after the search has returned.

use basedef_core::{Color, Point};

/// How a cell is shown in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellMark {
    /// Not touched by the search yet.
    #[default]
    Idle,
    /// Finalized, or excluded as unwalkable.
    Closed,
    /// Discovered, waiting in the open set.
    Open,
    /// The node being expanded.
    Current,
    /// Part of the final path (final-path frames only).
    Path,
    /// Not on the final path (final-path frames only).
    Hidden,
}

/// State of one cell in a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellSnapshot {
    pub mark: CellMark,
    pub g: i32,
    pub h: i32,
    pub f: i32,
}

/// What a frame shows.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FrameKind {
    /// Open/closed/current state while searching.
    Search { current: Point },
    /// The found path, painted with `tint`.
    FinalPath { path: Vec<Point>, tint: Color },
}

/// One recorded instant of a search.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Frame {
    pub kind: FrameKind,
    pub width: i32,
    pub height: i32,
    /// Row-major, `width * height` entries.
    pub cells: Vec<CellSnapshot>,
}

impl Frame {
    /// The snapshot of cell `p`, or `None` outside the frame.
    pub fn cell(&self, p: Point) -> Option<&CellSnapshot> {
        if p.x < 0 || p.y < 0 || p.x >= self.width || p.y >= self.height {
            return None;
        }
        self.cells.get((p.y * self.width + p.x) as usize)
    }

    /// Row-major iterator over `(Point, &CellSnapshot)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &CellSnapshot)> + '_ {
        let w = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, c)| (Point::new(i as i32 % w, i as i32 / w), c))
    }

    /// Number of cells carrying `mark`.
    pub fn count(&self, mark: CellMark) -> usize {
        self.cells.iter().filter(|c| c.mark == mark).count()
    }

    pub fn is_final_path(&self) -> bool {
        matches!(self.kind, FrameKind::FinalPath { .. })
    }
}

// ---------------------------------------------------------------------------
// Recorders
// ---------------------------------------------------------------------------

/// Receives the frames of a search, in the order they are produced.
pub trait SearchRecorder {
    /// Whether frames should be built at all. Building a frame costs one
    /// pass over the grid, so a recorder that drops them should say so.
    fn is_recording(&self) -> bool {
        true
    }

    /// Drop any frames still queued from a previous search.
    fn clear_frames(&mut self);

    /// Append one frame.
    fn take_snapshot(&mut self, frame: Frame);

    /// Colour used to paint the final path.
    fn path_tint(&self) -> Color {
        Color::WHITE
    }
}

/// A recorder that records nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrace;

impl SearchRecorder for NoTrace {
    fn is_recording(&self) -> bool {
        false
    }

    fn clear_frames(&mut self) {}

    fn take_snapshot(&mut self, _frame: Frame) {}
}

/// Collects frames into a `Vec`.
#[derive(Debug, Clone)]
pub struct FrameLog {
    frames: Vec<Frame>,
    tint: Color,
}

impl Default for FrameLog {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameLog {
    pub fn new() -> Self {
        Self::with_tint(Color::WHITE)
    }

    /// A log whose final-path frames are painted `tint`.
    pub fn with_tint(tint: Color) -> Self {
        Self {
            frames: Vec::new(),
            tint,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Take the recorded frames, leaving the log empty.
    pub fn take(&mut self) -> Vec<Frame> {
        std::mem::take(&mut self.frames)
    }
}

impl SearchRecorder for FrameLog {
    fn clear_frames(&mut self) {
        self.frames.clear();
    }

    fn take_snapshot(&mut self, frame: Frame) {
        self.frames.push(frame);
    }

    fn path_tint(&self) -> Color {
        self.tint
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(marks: &[CellMark], width: i32) -> Frame {
        Frame {
            kind: FrameKind::Search {
                current: Point::ZERO,
            },
            width,
            height: marks.len() as i32 / width,
            cells: marks
                .iter()
                .map(|&mark| CellSnapshot {
                    mark,
                    g: 0,
                    h: 0,
                    f: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn frame_cell_lookup_is_row_major() {
        use CellMark::*;
        let f = frame(&[Current, Open, Idle, Closed, Idle, Idle], 3);
        assert_eq!(f.cell(Point::new(1, 0)).map(|c| c.mark), Some(Open));
        assert_eq!(f.cell(Point::new(0, 1)).map(|c| c.mark), Some(Closed));
        assert!(f.cell(Point::new(3, 0)).is_none());
        assert_eq!(f.count(Idle), 3);
        let (p, c) = f.iter().nth(3).unwrap();
        assert_eq!((p, c.mark), (Point::new(0, 1), Closed));
        assert!(!f.is_final_path());
    }

    #[test]
    fn frame_log_keeps_order_and_clears() {
        let mut log = FrameLog::with_tint(Color::RED);
        assert!(log.is_recording());
        assert_eq!(log.path_tint(), Color::RED);
        log.take_snapshot(frame(&[CellMark::Idle], 1));
        log.take_snapshot(frame(&[CellMark::Open], 1));
        assert_eq!(log.frames()[1].cells[0].mark, CellMark::Open);
        log.clear_frames();
        assert!(log.is_empty());
    }

    #[test]
    fn no_trace_declines_frames() {
        assert!(!NoTrace.is_recording());
    }
}
