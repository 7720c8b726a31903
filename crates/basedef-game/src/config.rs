//! Game configuration.

use basedef_paths::Algorithm;
use basedef_ui::PlaybackConfig;
use rand::Rng;

use crate::error::GameError;

/// How enemies choose their search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AlgorithmChoice {
    /// Every enemy uses the same algorithm.
    Fixed(Algorithm),
    /// Each enemy flips a coin between A* and Dijkstra.
    Random,
}

impl Default for AlgorithmChoice {
    fn default() -> Self {
        Self::Fixed(Algorithm::AStar)
    }
}

impl AlgorithmChoice {
    pub fn pick(self, rng: &mut impl Rng) -> Algorithm {
        match self {
            Self::Fixed(algorithm) => algorithm,
            Self::Random => Algorithm::ALL[rng.random_range(0..Algorithm::ALL.len())],
        }
    }
}

/// Tunables for level generation and turn resolution.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    pub min_columns: i32,
    pub min_rows: i32,
    pub max_columns: i32,
    pub max_rows: i32,
    /// Starting hit points of the player's base.
    pub base_hp: i32,
    pub min_obstacles: usize,
    pub max_obstacles: usize,
    pub min_items: usize,
    pub max_items: usize,
    /// Base hit points restored by one food item.
    pub points_per_food: i32,
    /// Damage the player deals to walls and enemies.
    pub player_damage: i32,
    /// Damage an enemy deals to the base per attack.
    pub enemy_base_damage: i32,
    pub enemy_hp: i32,
    pub wall_hp: i32,
    /// Enemy turns skipped after the player drinks a soda.
    pub freeze_turns: u32,
    /// Record every enemy's search and replay it before the first turn.
    pub show_debug: bool,
    pub algorithm: AlgorithmChoice,
    pub playback: PlaybackConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            min_columns: 8,
            min_rows: 8,
            max_columns: 16,
            max_rows: 16,
            base_hp: 20,
            min_obstacles: 5,
            max_obstacles: 9,
            min_items: 1,
            max_items: 5,
            points_per_food: 10,
            player_damage: 1,
            enemy_base_damage: 1,
            enemy_hp: 1,
            wall_hp: 3,
            freeze_turns: 1,
            show_debug: true,
            algorithm: AlgorithmChoice::default(),
            playback: PlaybackConfig::default(),
        }
    }
}

impl GameConfig {
    /// Check the configuration for values no level can be built from.
    pub fn validate(&self) -> Result<(), GameError> {
        if self.min_columns < 3 || self.min_rows < 3 {
            return Err(GameError::InvalidConfig(
                "boards need at least 3 columns and 3 rows",
            ));
        }
        if self.min_columns > self.max_columns || self.min_rows > self.max_rows {
            return Err(GameError::InvalidConfig("minimum board size exceeds maximum"));
        }
        if self.min_obstacles > self.max_obstacles {
            return Err(GameError::InvalidConfig("min_obstacles exceeds max_obstacles"));
        }
        if self.min_items > self.max_items {
            return Err(GameError::InvalidConfig("min_items exceeds max_items"));
        }
        if self.base_hp <= 0 || self.wall_hp <= 0 || self.enemy_hp <= 0 {
            return Err(GameError::InvalidConfig("hit points must be positive"));
        }
        if self.player_damage <= 0 || self.enemy_base_damage < 0 {
            return Err(GameError::InvalidConfig(
                "player damage must be positive, enemy damage non-negative",
            ));
        }
        Ok(())
    }

    /// A random board size within the configured bounds.
    pub fn random_size(&self, rng: &mut impl Rng) -> (i32, i32) {
        (
            rng.random_range(self.min_columns..=self.max_columns),
            rng.random_range(self.min_rows..=self.max_rows),
        )
    }
}
