//! Per-session debug layers painted from played-back frames.

use basedef_core::{Color, Grid, GridError, GridLayout, Point, Vec2};
use basedef_paths::{CellMark, Frame, FrameKind};

use crate::player::{FrameSink, SessionId};

/// One overlay cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OverlayCell {
    pub visible: bool,
    pub color: Color,
    /// Set by a final-path frame for the cells the path runs through.
    pub on_final_path: bool,
}

// ---------------------------------------------------------------------------
// DebugOverlay
// ---------------------------------------------------------------------------

/// Keeps one layer of [`OverlayCell`]s per playback session, so several
/// agents' searches can be shown side by side.
///
/// Search frames paint closed cells red, open cells grey and the current
/// cell green; cells the search has not touched keep whatever they had.
/// A final-path frame keeps only the path visible and tints the whole layer.
#[derive(Debug, Clone)]
pub struct DebugOverlay {
    layout: GridLayout,
    layers: Vec<Grid<OverlayCell>>,
}

impl DebugOverlay {
    /// An overlay for a `width × height` board, with no layers yet.
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        Ok(Self {
            layout: GridLayout::new(width, height, 1.0, Vec2::ZERO)?,
            layers: Vec::new(),
        })
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// The layer painted by `session`, if it has received any frame.
    pub fn layer(&self, session: SessionId) -> Option<&Grid<OverlayCell>> {
        self.layers.get(session.0)
    }

    /// All layers, indexed by session number.
    pub fn layers(&self) -> &[Grid<OverlayCell>] {
        &self.layers
    }

    /// Cell `p` of `session`'s layer.
    pub fn cell(&self, session: SessionId, p: Point) -> Option<&OverlayCell> {
        self.layer(session)?.get(p).ok()
    }

    /// Hide every cell that is not on a final path, leaving only the paths.
    /// Searches that never reached their goal disappear entirely.
    pub fn discard_search_layers(&mut self) {
        for layer in &mut self.layers {
            for cell in layer.cells_mut() {
                if !cell.on_final_path {
                    cell.visible = false;
                }
            }
        }
    }

    fn ensure_layer(&mut self, session: SessionId) -> &mut Grid<OverlayCell> {
        while self.layers.len() <= session.0 {
            self.layers
                .push(Grid::with_layout(self.layout, |_, _| OverlayCell::default()));
        }
        &mut self.layers[session.0]
    }
}

impl FrameSink for DebugOverlay {
    fn apply(&mut self, session: SessionId, frame: &Frame) {
        assert!(
            frame.width == self.layout.width() && frame.height == self.layout.height(),
            "{session}: {}x{} frame does not fit a {}x{} overlay",
            frame.width,
            frame.height,
            self.layout.width(),
            self.layout.height()
        );
        let layer = self.ensure_layer(session);
        let cells = layer.cells_mut().iter_mut().zip(&frame.cells);
        match &frame.kind {
            FrameKind::Search { .. } => {
                for (cell, snap) in cells {
                    let color = match snap.mark {
                        CellMark::Closed => Color::RED,
                        CellMark::Open => Color::GREY,
                        CellMark::Current => Color::GREEN,
                        _ => continue,
                    };
                    cell.visible = true;
                    cell.color = color;
                }
            }
            FrameKind::FinalPath { tint, .. } => {
                for (cell, snap) in cells {
                    cell.on_final_path = snap.mark == CellMark::Path;
                    cell.visible = cell.on_final_path;
                    cell.color = *tint;
                }
            }
        }
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn overlay_cell_round_trip() {
        let cell = OverlayCell {
            visible: true,
            color: Color::GREY,
            on_final_path: false,
        };
        let json = serde_json::to_string(&cell).unwrap();
        let back: OverlayCell = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cell);
    }
}
