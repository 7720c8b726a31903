//! What can stand on a board cell, and what happens when something walks
//! into it.

use std::fmt;

/// Stable identifier of an enemy for the duration of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub usize);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy #{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Restores base hit points.
    Food,
    /// Freezes every enemy for a few turns.
    Soda,
}

/// The single object occupying a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Occupant {
    Wall { hp: i32 },
    Enemy(EnemyId),
    Base,
    Player,
    Item(ItemKind),
}

impl Occupant {
    /// ASCII glyph used by text renderers.
    pub fn glyph(&self) -> char {
        match self {
            Self::Wall { .. } => '#',
            Self::Enemy(_) => 'E',
            Self::Base => 'B',
            Self::Player => '@',
            Self::Item(ItemKind::Food) => 'f',
            Self::Item(ItemKind::Soda) => 's',
        }
    }
}

/// Result of an attempted one-cell move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The target is empty; the mover steps into it.
    Move,
    /// The player hits a wall.
    ChopWall,
    /// The player hits an enemy.
    HitEnemy(EnemyId),
    /// An enemy attacks the base.
    DamageBase,
    /// The player steps onto an item and consumes it.
    PickUp(ItemKind),
    /// Nothing happens.
    Blocked,
}

/// Decide what `mover` does to the cell holding `target`.
pub fn resolve_move(mover: &Occupant, target: Option<&Occupant>) -> MoveOutcome {
    use Occupant::*;
    match (mover, target) {
        (Player | Enemy(_), None) => MoveOutcome::Move,
        (Player, Some(Wall { .. })) => MoveOutcome::ChopWall,
        (Player, Some(Enemy(id))) => MoveOutcome::HitEnemy(*id),
        (Player, Some(Item(kind))) => MoveOutcome::PickUp(*kind),
        (Enemy(_), Some(Base)) => MoveOutcome::DamageBase,
        _ => MoveOutcome::Blocked,
    }
}
