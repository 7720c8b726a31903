use basedef_core::Point;

/// Cost assigned to every node at the start of a search, before it has been
/// reached.
pub const UNVISITED: i32 = i32::MAX;

/// Per-cell pathfinding metadata.
///
/// Nodes live in the [`Pathfinder`](crate::Pathfinder)'s grid and are only
/// mutated by searches and by the walkability setter. The walkable flag is
/// the only field that survives from one search to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PathNode {
    pos: Point,
    walkable: bool,
    g: i32,
    h: i32,
    f: i32,
    came_from: Option<Point>,
}

impl PathNode {
    /// A fresh, walkable node at `pos`.
    pub fn new(pos: Point) -> Self {
        let mut node = Self {
            pos,
            walkable: true,
            g: UNVISITED,
            h: 0,
            f: 0,
            came_from: None,
        };
        node.update_f();
        node
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn is_walkable(&self) -> bool {
        self.walkable
    }

    /// Accumulated cost from the search start ([`UNVISITED`] if not reached).
    #[inline]
    pub fn g_cost(&self) -> i32 {
        self.g
    }

    /// Heuristic estimate to the search goal.
    #[inline]
    pub fn h_cost(&self) -> i32 {
        self.h
    }

    /// `g + h`, saturating at [`UNVISITED`].
    #[inline]
    pub fn f_cost(&self) -> i32 {
        self.f
    }

    /// Predecessor on the best path found so far.
    #[inline]
    pub fn came_from(&self) -> Option<Point> {
        self.came_from
    }

    pub(crate) fn set_walkable(&mut self, walkable: bool) {
        self.walkable = walkable;
    }

    /// Forget everything the previous search left behind.
    pub(crate) fn reset(&mut self) {
        self.g = UNVISITED;
        self.h = 0;
        self.came_from = None;
        self.update_f();
    }

    pub(crate) fn set_costs(&mut self, g: i32, h: i32, came_from: Option<Point>) {
        self.g = g;
        self.h = h;
        self.came_from = came_from;
        self.update_f();
    }

    #[inline]
    fn update_f(&mut self) {
        self.f = self.g.saturating_add(self.h);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_is_walkable_and_unvisited() {
        let n = PathNode::new(Point::new(2, 3));
        assert_eq!(n.pos(), Point::new(2, 3));
        assert!(n.is_walkable());
        assert_eq!(n.g_cost(), UNVISITED);
        assert_eq!(n.f_cost(), UNVISITED);
        assert_eq!(n.came_from(), None);
    }

    #[test]
    fn f_tracks_g_and_h() {
        let mut n = PathNode::new(Point::ZERO);
        n.set_costs(20, 14, Some(Point::new(1, 0)));
        assert_eq!(n.f_cost(), 34);
        n.reset();
        assert_eq!(n.g_cost(), UNVISITED);
        assert_eq!(n.h_cost(), 0);
        assert_eq!(n.came_from(), None);
    }

    #[test]
    fn reset_keeps_walkability() {
        let mut n = PathNode::new(Point::ZERO);
        n.set_walkable(false);
        n.reset();
        assert!(!n.is_walkable());
    }
}
