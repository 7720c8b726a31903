//! Enemies walk a path computed once, at spawn, toward the player's base.

use std::collections::VecDeque;

use basedef_core::Point;
use basedef_paths::{Algorithm, PathError, Pathfinder, SearchRecorder};

use crate::occupant::EnemyId;

#[derive(Debug, Clone)]
pub struct Enemy {
    id: EnemyId,
    pos: Point,
    hp: i32,
    algorithm: Algorithm,
    path: VecDeque<Point>,
    frozen_turns: u32,
}

impl Enemy {
    /// Spawn an enemy at `pos` and plan its route to `target`.
    ///
    /// The search is handed to `recorder`, so its trace can be replayed
    /// later. An unreachable target leaves the enemy with an empty path; it
    /// then never moves.
    pub fn spawn<R>(
        id: EnemyId,
        pos: Point,
        hp: i32,
        target: Point,
        algorithm: Algorithm,
        pathfinder: &mut Pathfinder,
        recorder: &mut R,
    ) -> Result<Self, PathError>
    where
        R: SearchRecorder + ?Sized,
    {
        let path = pathfinder.find_path_traced(pos, target, algorithm, recorder)?;
        if path.is_none() {
            log::warn!("{id} at {pos} has no path to {target}");
        }
        Ok(Self {
            id,
            pos,
            hp,
            algorithm,
            path: path.unwrap_or_default().into(),
            frozen_turns: 0,
        })
    }

    #[inline]
    pub fn id(&self) -> EnemyId {
        self.id
    }

    #[inline]
    pub fn pos(&self) -> Point {
        self.pos
    }

    #[inline]
    pub fn hp(&self) -> i32 {
        self.hp
    }

    #[inline]
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    /// Remaining path, next step first.
    pub fn path(&self) -> impl ExactSizeIterator<Item = Point> + '_ {
        self.path.iter().copied()
    }

    /// The cell this enemy tries to enter on its next turn.
    pub fn next_step(&self) -> Option<Point> {
        self.path.front().copied()
    }

    /// Record a successful step onto `p`.
    ///
    /// The last path node is never consumed: it is the target cell itself,
    /// which the enemy keeps attacking once it stands next to it.
    pub fn moved_to(&mut self, p: Point) {
        self.pos = p;
        if self.path.len() > 1 && self.path.front() == Some(&p) {
            self.path.pop_front();
        }
    }

    /// Take `amount` damage. Returns whether the enemy died.
    pub fn damage(&mut self, amount: i32) -> bool {
        self.hp -= amount;
        self.hp <= 0
    }

    pub fn freeze(&mut self, turns: u32) {
        self.frozen_turns = self.frozen_turns.max(turns);
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.frozen_turns > 0
    }

    /// Spend one frozen turn. Returns whether the turn was skipped.
    pub(crate) fn skip_turn(&mut self) -> bool {
        if self.frozen_turns == 0 {
            return false;
        }
        self.frozen_turns -= 1;
        true
    }
}
