use std::fmt;

use basedef_core::{Color, Grid, GridError, GridLayout, Point, Vec2};

use crate::cost::distance_cost;
use crate::error::PathError;
use crate::node::PathNode;
use crate::trace::{CellMark, CellSnapshot, Frame, FrameKind, NoTrace, SearchRecorder};

/// Rule used to pick the next node to expand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Algorithm {
    /// Lowest `f` cost first; ties go to the node that entered the open set
    /// earliest.
    AStar,
    /// Discovery order (FIFO), ignoring the heuristic.
    Dijkstra,
}

impl Algorithm {
    pub const ALL: [Algorithm; 2] = [Algorithm::AStar, Algorithm::Dijkstra];
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AStar => f.write_str("A*"),
            Self::Dijkstra => f.write_str("Dijkstra"),
        }
    }
}

// ---------------------------------------------------------------------------
// Pathfinder
// ---------------------------------------------------------------------------

/// Owns the board's node grid and runs searches over it.
///
/// Open and closed sets are kept as scratch buffers indexed by the node's
/// flat grid index, so membership is by cell identity and repeated searches
/// do not allocate after the first one.
pub struct Pathfinder {
    grid: Grid<PathNode>,
    /// Open set in insertion order.
    open: Vec<usize>,
    in_open: Vec<bool>,
    closed: Vec<bool>,
}

impl Pathfinder {
    /// A `width × height` board of walkable nodes with unit cells at the
    /// world origin.
    pub fn new(width: i32, height: i32) -> Result<Self, PathError> {
        Self::with_cell_size(width, height, 1.0, Vec2::ZERO)
    }

    /// Like [`new`](Self::new) with an explicit world mapping.
    pub fn with_cell_size(
        width: i32,
        height: i32,
        cell_size: f32,
        origin: Vec2,
    ) -> Result<Self, PathError> {
        let grid = Grid::new(width, height, cell_size, origin, |_, p| PathNode::new(p))?;
        let len = grid.cells().len();
        Ok(Self {
            grid,
            open: Vec::new(),
            in_open: vec![false; len],
            closed: vec![false; len],
        })
    }

    /// The node grid.
    #[inline]
    pub fn grid(&self) -> &Grid<PathNode> {
        &self.grid
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        self.grid.layout()
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.grid.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.grid.height()
    }

    pub fn node(&self, p: Point) -> Result<&PathNode, GridError> {
        self.grid.get(p)
    }

    pub fn is_walkable(&self, p: Point) -> Result<bool, GridError> {
        Ok(self.grid.get(p)?.is_walkable())
    }

    /// Mark `p` as walkable or blocked. This is the only way to change a
    /// node from outside a search, and it persists across searches.
    pub fn set_walkable(&mut self, p: Point, walkable: bool) -> Result<(), GridError> {
        self.grid.get_mut(p)?.set_walkable(walkable);
        Ok(())
    }

    /// Flip the walkability of `p`, returning the new value.
    pub fn toggle_walkable(&mut self, p: Point) -> Result<bool, GridError> {
        let node = self.grid.get_mut(p)?;
        let walkable = !node.is_walkable();
        node.set_walkable(walkable);
        Ok(walkable)
    }

    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> Point {
        self.grid.world_to_cell(pos)
    }

    #[inline]
    pub fn cell_to_world(&self, p: Point) -> Vec2 {
        self.grid.cell_to_world(p)
    }

    /// Shortest path from `start` to `end`, without recording a trace.
    ///
    /// See [`find_path_traced`](Self::find_path_traced).
    pub fn find_path(
        &mut self,
        start: Point,
        end: Point,
        algorithm: Algorithm,
    ) -> Result<Option<Vec<Point>>, PathError> {
        self.find_path_traced(start, end, algorithm, &mut NoTrace)
    }

    /// Shortest path from `start` to `end`.
    ///
    /// Returns the cells from `start` (exclusive) to `end` (inclusive),
    /// `Ok(Some(vec![]))` when `start == end`, and `Ok(None)` when the goal
    /// cannot be reached. Out-of-grid endpoints are an
    /// [`InvalidSearchRequest`](PathError::InvalidSearchRequest).
    ///
    /// When `recorder` is recording, its old frames are cleared first and it
    /// then receives, in order: the initial state, one frame per walkable
    /// neighbour relaxed, and on success a frame with the goal as current
    /// node followed by the final-path frame.
    pub fn find_path_traced<R>(
        &mut self,
        start: Point,
        end: Point,
        algorithm: Algorithm,
        recorder: &mut R,
    ) -> Result<Option<Vec<Point>>, PathError>
    where
        R: SearchRecorder + ?Sized,
    {
        let layout = *self.grid.layout();
        let (Some(start_idx), Some(goal_idx)) = (layout.index(start), layout.index(end)) else {
            return Err(PathError::InvalidSearchRequest { start, end });
        };
        let tracing = recorder.is_recording();

        self.reset();
        self.grid.cells_mut()[start_idx].set_costs(0, distance_cost(start, end), None);
        self.push_open(start_idx);

        if tracing {
            recorder.clear_frames();
            recorder.take_snapshot(self.snapshot(start_idx));
        }

        let mut frames = usize::from(tracing);
        while !self.open.is_empty() {
            let slot = self.select(algorithm);
            let ci = self.open[slot];

            if ci == goal_idx {
                let path = self.reconstruct(goal_idx);
                if tracing {
                    let tint = recorder.path_tint();
                    recorder.take_snapshot(self.snapshot(ci));
                    recorder.take_snapshot(self.final_path_frame(&path, tint));
                    frames += 2;
                }
                log::debug!(
                    "{algorithm} path {start} -> {end}: {} steps, {frames} frames",
                    path.len()
                );
                return Ok(Some(path));
            }

            self.open.remove(slot);
            self.in_open[ci] = false;
            self.closed[ci] = true;

            let current = layout.point(ci);
            let current_g = self.grid.cells()[ci].g_cost();
            for np in current.neighbors_4() {
                let Some(ni) = layout.index(np) else {
                    continue;
                };
                if self.closed[ni] {
                    continue;
                }
                if !self.grid.cells()[ni].is_walkable() {
                    self.closed[ni] = true;
                    continue;
                }

                let tentative = current_g + distance_cost(current, np);
                if tentative < self.grid.cells()[ni].g_cost() {
                    self.grid.cells_mut()[ni].set_costs(
                        tentative,
                        distance_cost(np, end),
                        Some(current),
                    );
                    if !self.in_open[ni] {
                        self.push_open(ni);
                    }
                }

                if tracing {
                    recorder.take_snapshot(self.snapshot(ci));
                    frames += 1;
                }
            }
        }

        log::debug!("{algorithm} search {start} -> {end}: unreachable, {frames} frames");
        Ok(None)
    }

    fn reset(&mut self) {
        for node in self.grid.cells_mut() {
            node.reset();
        }
        self.open.clear();
        self.in_open.fill(false);
        self.closed.fill(false);
    }

    fn push_open(&mut self, idx: usize) {
        self.open.push(idx);
        self.in_open[idx] = true;
    }

    /// Position in `self.open` of the node to expand next.
    fn select(&self, algorithm: Algorithm) -> usize {
        match algorithm {
            Algorithm::Dijkstra => 0,
            Algorithm::AStar => {
                let cells = self.grid.cells();
                let mut best = 0;
                for (slot, &idx) in self.open.iter().enumerate().skip(1) {
                    // Strict comparison keeps the earliest entry on ties.
                    if cells[idx].f_cost() < cells[self.open[best]].f_cost() {
                        best = slot;
                    }
                }
                best
            }
        }
    }

    /// Walk back-pointers from the goal; the start cell is dropped.
    fn reconstruct(&self, goal_idx: usize) -> Vec<Point> {
        let layout = self.grid.layout();
        let mut path = vec![layout.point(goal_idx)];
        let mut cur = &self.grid.cells()[goal_idx];
        while let Some(prev) = cur.came_from() {
            let Some(idx) = layout.index(prev) else {
                break;
            };
            path.push(prev);
            cur = &self.grid.cells()[idx];
        }
        path.reverse();
        path.remove(0);
        path
    }

    fn snapshot(&self, current: usize) -> Frame {
        let cells = self
            .grid
            .cells()
            .iter()
            .enumerate()
            .map(|(i, node)| {
                let mark = if i == current {
                    CellMark::Current
                } else if self.in_open[i] {
                    CellMark::Open
                } else if self.closed[i] {
                    CellMark::Closed
                } else {
                    CellMark::Idle
                };
                cell_snapshot(node, mark)
            })
            .collect();
        Frame {
            kind: FrameKind::Search {
                current: self.grid.layout().point(current),
            },
            width: self.width(),
            height: self.height(),
            cells,
        }
    }

    fn final_path_frame(&self, path: &[Point], tint: Color) -> Frame {
        let cells = self
            .grid
            .iter()
            .map(|(p, node)| {
                let mark = if path.contains(&p) {
                    CellMark::Path
                } else {
                    CellMark::Hidden
                };
                cell_snapshot(node, mark)
            })
            .collect();
        Frame {
            kind: FrameKind::FinalPath {
                path: path.to_vec(),
                tint,
            },
            width: self.width(),
            height: self.height(),
            cells,
        }
    }
}

fn cell_snapshot(node: &PathNode, mark: CellMark) -> CellSnapshot {
    CellSnapshot {
        mark,
        g: node.g_cost(),
        h: node.h_cost(),
        f: node.f_cost(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost::{MOVE_STRAIGHT_COST, path_cost};
    use crate::node::UNVISITED;
    use crate::trace::FrameLog;

    fn p(x: i32, y: i32) -> Point {
        Point::new(x, y)
    }

    fn assert_contiguous(start: Point, path: &[Point]) {
        let mut prev = start;
        for &step in path {
            assert_eq!(prev.manhattan(step), 1, "{prev} -> {step} is not a single step");
            prev = step;
        }
    }

    #[test]
    fn open_grid_paths_have_manhattan_length() {
        let mut pf = Pathfinder::new(6, 5).unwrap();
        let cells: Vec<Point> = pf.grid().bounds().iter().collect();
        for &a in &cells {
            for &b in cells.iter().step_by(7) {
                for algorithm in Algorithm::ALL {
                    let path = pf.find_path(a, b, algorithm).unwrap().unwrap();
                    assert_eq!(path.len() as i32, a.manhattan(b), "{algorithm} {a} -> {b}");
                    assert_contiguous(a, &path);
                    if let Some(&last) = path.last() {
                        assert_eq!(last, b);
                    }
                }
            }
        }
    }

    #[test]
    fn five_by_five_corner_to_corner() {
        let mut pf = Pathfinder::new(5, 5).unwrap();
        let path = pf.find_path(p(0, 0), p(4, 4), Algorithm::AStar).unwrap().unwrap();
        assert_eq!(path.len(), 8);
        assert_eq!(path.last(), Some(&p(4, 4)));

        let mut prev_g = 0;
        for &step in &path {
            let g = pf.node(step).unwrap().g_cost();
            assert!(g >= prev_g);
            prev_g = g;
        }
        let goal = pf.node(p(4, 4)).unwrap();
        assert_eq!(goal.h_cost(), 0);
        assert_eq!(goal.f_cost(), goal.g_cost());
        assert_eq!(goal.g_cost(), 8 * MOVE_STRAIGHT_COST);
    }

    #[test]
    fn blocked_center_forces_detour() {
        let mut pf = Pathfinder::new(3, 3).unwrap();
        pf.set_walkable(p(1, 1), false).unwrap();
        for algorithm in Algorithm::ALL {
            let path = pf.find_path(p(0, 1), p(2, 1), algorithm).unwrap().unwrap();
            assert_eq!(path.len(), 4);
            assert!(!path.contains(&p(1, 1)));
            assert_contiguous(p(0, 1), &path);
        }
    }

    #[test]
    fn start_equals_goal_is_an_empty_path() {
        let mut pf = Pathfinder::new(4, 4).unwrap();
        assert_eq!(pf.find_path(p(2, 2), p(2, 2), Algorithm::AStar).unwrap(), Some(vec![]));
        assert_eq!(pf.find_path(p(0, 3), p(0, 3), Algorithm::Dijkstra).unwrap(), Some(vec![]));
    }

    #[test]
    fn enclosed_goal_is_unreachable() {
        let mut pf = Pathfinder::new(5, 5).unwrap();
        for n in p(2, 2).neighbors_4() {
            pf.set_walkable(n, false).unwrap();
        }
        for algorithm in Algorithm::ALL {
            assert_eq!(pf.find_path(p(0, 0), p(2, 2), algorithm).unwrap(), None);
        }
    }

    #[test]
    fn unwalkable_goal_is_unreachable() {
        let mut pf = Pathfinder::new(4, 1).unwrap();
        pf.set_walkable(p(3, 0), false).unwrap();
        assert_eq!(pf.find_path(p(0, 0), p(3, 0), Algorithm::AStar).unwrap(), None);
    }

    #[test]
    fn out_of_bounds_endpoints_are_rejected() {
        let mut pf = Pathfinder::new(3, 3).unwrap();
        assert_eq!(
            pf.find_path(p(-1, 0), p(2, 2), Algorithm::AStar),
            Err(PathError::InvalidSearchRequest {
                start: p(-1, 0),
                end: p(2, 2)
            })
        );
        assert!(matches!(
            pf.find_path(p(0, 0), p(3, 0), Algorithm::Dijkstra),
            Err(PathError::InvalidSearchRequest { .. })
        ));
        assert!(matches!(
            pf.set_walkable(p(9, 9), false),
            Err(GridError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn astar_and_dijkstra_agree_on_cost() {
        let mut pf = Pathfinder::new(8, 6).unwrap();
        for wall in [p(2, 0), p(2, 1), p(2, 2), p(2, 3), p(5, 5), p(5, 4), p(5, 3), p(5, 2)] {
            pf.set_walkable(wall, false).unwrap();
        }
        let (start, goal) = (p(0, 0), p(7, 0));
        let a = pf.find_path(start, goal, Algorithm::AStar).unwrap().unwrap();
        let d = pf.find_path(start, goal, Algorithm::Dijkstra).unwrap().unwrap();
        assert_eq!(path_cost(start, &a), path_cost(start, &d));
        assert_eq!(a.len(), d.len());
    }

    #[test]
    fn repeated_searches_are_identical() {
        let mut pf = Pathfinder::new(7, 7).unwrap();
        pf.set_walkable(p(3, 3), false).unwrap();
        pf.set_walkable(p(3, 4), false).unwrap();
        for algorithm in Algorithm::ALL {
            let first = pf.find_path(p(0, 3), p(6, 3), algorithm).unwrap();
            let second = pf.find_path(p(0, 3), p(6, 3), algorithm).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn toggling_a_cell_back_restores_the_first_path() {
        let mut pf = Pathfinder::new(6, 6).unwrap();
        let before = pf.find_path(p(0, 0), p(5, 5), Algorithm::AStar).unwrap();
        let blocker = before.as_ref().unwrap()[2];
        assert!(!pf.toggle_walkable(blocker).unwrap());
        let detour = pf.find_path(p(0, 0), p(5, 5), Algorithm::AStar).unwrap().unwrap();
        assert!(!detour.contains(&blocker));
        assert!(pf.toggle_walkable(blocker).unwrap());
        assert_eq!(pf.find_path(p(0, 0), p(5, 5), Algorithm::AStar).unwrap(), before);
    }

    #[test]
    fn new_search_discards_previous_costs() {
        let mut pf = Pathfinder::new(5, 5).unwrap();
        pf.find_path(p(0, 0), p(4, 4), Algorithm::Dijkstra).unwrap();
        pf.find_path(p(0, 0), p(1, 0), Algorithm::AStar).unwrap();
        assert_eq!(pf.node(p(4, 4)).unwrap().g_cost(), UNVISITED);
        assert_eq!(pf.node(p(4, 4)).unwrap().came_from(), None);
        assert_eq!(pf.node(p(1, 0)).unwrap().came_from(), Some(p(0, 0)));
    }

    #[test]
    fn astar_ties_go_to_the_earliest_open_node() {
        // From (1,1) toward (1,3) on an open board, left and right neighbours
        // tie; the left one entered the open set first.
        let mut pf = Pathfinder::new(3, 4).unwrap();
        pf.set_walkable(p(1, 2), false).unwrap();
        let path = pf.find_path(p(1, 1), p(1, 3), Algorithm::AStar).unwrap().unwrap();
        assert_eq!(path, vec![p(0, 1), p(0, 2), p(0, 3), p(1, 3)]);
    }

    #[test]
    fn trace_starts_with_initial_frame_and_ends_with_final_path() {
        let mut pf = Pathfinder::new(4, 3).unwrap();
        let mut log = FrameLog::with_tint(Color::RED);
        let path = pf
            .find_path_traced(p(0, 0), p(3, 2), Algorithm::AStar, &mut log)
            .unwrap()
            .unwrap();

        let frames = log.frames();
        assert!(frames.len() >= 3);
        let first = &frames[0];
        assert_eq!(first.kind, FrameKind::Search { current: p(0, 0) });
        assert_eq!(first.count(CellMark::Current), 1);
        assert_eq!(first.count(CellMark::Idle), 11);
        assert_eq!(first.cell(p(0, 0)).unwrap().g, 0);

        let goal_frame = &frames[frames.len() - 2];
        assert_eq!(goal_frame.kind, FrameKind::Search { current: p(3, 2) });

        let last = frames.last().unwrap();
        assert_eq!(
            last.kind,
            FrameKind::FinalPath {
                path: path.clone(),
                tint: Color::RED
            }
        );
        assert_eq!(last.count(CellMark::Path), path.len());
        assert_eq!(last.count(CellMark::Hidden), 12 - path.len());
        assert!(frames.iter().all(|f| f.cells.len() == 12));
    }

    #[test]
    fn trace_records_one_frame_per_relaxed_neighbour() {
        // 3x1 corridor: expanding (0,0) relaxes (1,0); expanding (1,0) relaxes
        // (2,0) and skips the closed (0,0). Then the goal is popped.
        let mut pf = Pathfinder::new(3, 1).unwrap();
        let mut log = FrameLog::new();
        pf.find_path_traced(p(0, 0), p(2, 0), Algorithm::Dijkstra, &mut log)
            .unwrap()
            .unwrap();
        assert_eq!(log.len(), 1 + 1 + 1 + 2);
        let after_first = &log.frames()[1];
        assert_eq!(after_first.cell(p(0, 0)).unwrap().mark, CellMark::Current);
        assert_eq!(after_first.cell(p(1, 0)).unwrap().mark, CellMark::Open);
        let after_second = &log.frames()[2];
        assert_eq!(after_second.cell(p(0, 0)).unwrap().mark, CellMark::Closed);
        assert_eq!(after_second.cell(p(2, 0)).unwrap().mark, CellMark::Open);
    }

    #[test]
    fn traced_search_clears_previous_frames() {
        let mut pf = Pathfinder::new(3, 3).unwrap();
        let mut log = FrameLog::new();
        pf.find_path_traced(p(0, 0), p(2, 2), Algorithm::AStar, &mut log)
            .unwrap();
        let first_len = log.len();
        pf.find_path_traced(p(0, 0), p(2, 2), Algorithm::AStar, &mut log)
            .unwrap();
        assert_eq!(log.len(), first_len);
    }

    #[test]
    fn unreachable_trace_has_no_final_path_frame() {
        let mut pf = Pathfinder::new(3, 3).unwrap();
        pf.set_walkable(p(1, 0), false).unwrap();
        pf.set_walkable(p(0, 1), false).unwrap();
        let mut log = FrameLog::new();
        let res = pf
            .find_path_traced(p(0, 0), p(2, 2), Algorithm::AStar, &mut log)
            .unwrap();
        assert_eq!(res, None);
        assert_eq!(log.len(), 1);
        assert!(!log.frames().iter().any(Frame::is_final_path));
    }

    #[test]
    fn world_mapping_is_forwarded() {
        let pf = Pathfinder::with_cell_size(4, 4, 2.0, Vec2::new(10.0, 0.0)).unwrap();
        assert_eq!(pf.world_to_cell(Vec2::new(13.0, 5.0)), p(1, 2));
        assert_eq!(pf.cell_to_world(p(1, 2)), Vec2::new(12.0, 4.0));
    }
}
