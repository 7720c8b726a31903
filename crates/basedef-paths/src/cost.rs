use basedef_core::Point;

/// Cost of one axis-aligned step.
pub const MOVE_STRAIGHT_COST: i32 = 10;

/// Movement cost between two cells, also used as the search heuristic.
///
/// `min(|dx|, |dy|) + MOVE_STRAIGHT_COST * ||dx| - |dy||`. For two adjacent
/// cells this is exactly [`MOVE_STRAIGHT_COST`]. Between arbitrary cells it
/// never overestimates the 4-connected walking cost and changes by at most
/// one step cost per move, so A\* stays optimal with it.
#[inline]
pub fn distance_cost(a: Point, b: Point) -> i32 {
    let dx = (a.x - b.x).abs();
    let dy = (a.y - b.y).abs();
    let remaining = (dx - dy).abs();
    dx.min(dy) + MOVE_STRAIGHT_COST * remaining
}

/// Total step cost of walking `path` starting from `start`.
///
/// `path` excludes `start`, as returned by
/// [`Pathfinder::find_path`](crate::Pathfinder::find_path).
pub fn path_cost(start: Point, path: &[Point]) -> i32 {
    let mut prev = start;
    let mut total = 0;
    for &p in path {
        total += distance_cost(prev, p);
        prev = p;
    }
    total
}
