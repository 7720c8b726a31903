//! Base defense rules built on the instrumented pathfinder.
//!
//! A [`GameSession`] owns one level: a [`Board`] generated from a
//! [`GameConfig`], the [`Enemy`] agents walking toward the player's base,
//! and the debug replay of every enemy's search. Moves are resolved by a
//! single dispatch over the [`Occupant`] of the target cell
//! ([`resolve_move`]); outcomes are announced on an [`EventBus`].
//!
//! All randomness comes from the caller's [`rand::Rng`], so a seeded
//! generator reproduces a level exactly.

mod board;
mod config;
mod enemy;
mod error;
mod events;
mod occupant;
mod session;

pub use board::Board;
pub use config::{AlgorithmChoice, GameConfig};
pub use enemy::Enemy;
pub use error::GameError;
pub use events::{EventBus, GameEvent, SubscriptionId};
pub use occupant::{EnemyId, ItemKind, MoveOutcome, Occupant, resolve_move};
pub use session::{Direction, GameSession, Phase};
