//! Turn sequencing for one level.

use std::time::Duration;

use basedef_core::{Color, Point};
use basedef_paths::{Frame, FrameLog, NoTrace};
use basedef_ui::{DebugOverlay, SnapshotPlayer};
use rand::Rng;

use crate::board::Board;
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::error::GameError;
use crate::events::{EventBus, GameEvent};
use crate::occupant::{EnemyId, ItemKind, MoveOutcome, Occupant, resolve_move};

/// Where a level currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Replaying the search of enemy `index` before the first turn.
    ShowingPaths { index: usize },
    PlayerTurn,
    EnemyTurn,
    GameOver,
    LevelComplete,
}

/// One-cell player move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
    Down,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Left, Self::Right, Self::Down, Self::Up];

    pub fn delta(self) -> Point {
        match self {
            Self::Left => Point::new(-1, 0),
            Self::Right => Point::new(1, 0),
            Self::Down => Point::new(0, -1),
            Self::Up => Point::new(0, 1),
        }
    }
}

/// A level in play.
///
/// Enemies plan their route to the base once, when the session is created.
/// With `show_debug` on, each of those searches is replayed on its own
/// overlay layer, one enemy after the other, before the player gets the
/// first turn. After that the player and the enemies alternate.
pub struct GameSession {
    cfg: GameConfig,
    board: Board,
    enemies: Vec<Enemy>,
    /// Recorded searches, indexed like the spawn points.
    traces: Vec<Vec<Frame>>,
    base_hp: i32,
    phase: Phase,
    playback: SnapshotPlayer,
    overlay: DebugOverlay,
    events: EventBus<GameEvent>,
}

impl GameSession {
    /// Start level `level` on a board of random size.
    pub fn new(cfg: GameConfig, level: usize, rng: &mut impl Rng) -> Result<Self, GameError> {
        cfg.validate()?;
        let (columns, rows) = cfg.random_size(rng);
        Self::with_size(cfg, level, columns, rows, rng)
    }

    /// Start level `level` on a `columns × rows` board.
    pub fn with_size(
        cfg: GameConfig,
        level: usize,
        columns: i32,
        rows: i32,
        rng: &mut impl Rng,
    ) -> Result<Self, GameError> {
        let board = Board::setup(level, columns, rows, &cfg, rng)?;
        Self::from_board(cfg, board, rng)
    }

    /// Start a level on a prepared board, spawning one enemy per spawn
    /// point.
    pub fn from_board(
        cfg: GameConfig,
        mut board: Board,
        rng: &mut impl Rng,
    ) -> Result<Self, GameError> {
        let target = board.base();
        let spawns = board.spawns().to_vec();
        let mut enemies = Vec::with_capacity(spawns.len());
        let mut traces = Vec::new();
        for (i, pos) in spawns.into_iter().enumerate() {
            let id = EnemyId(i);
            let algorithm = cfg.algorithm.pick(rng);
            let pathfinder = board.pathfinder_mut();
            let enemy = if cfg.show_debug {
                let mut log = FrameLog::with_tint(random_tint(rng));
                let enemy =
                    Enemy::spawn(id, pos, cfg.enemy_hp, target, algorithm, pathfinder, &mut log)?;
                traces.push(log.take());
                enemy
            } else {
                Enemy::spawn(id, pos, cfg.enemy_hp, target, algorithm, pathfinder, &mut NoTrace)?
            };
            log::debug!("{id} spawned at {pos}, {algorithm} path of {}", enemy.path().len());
            board.place(pos, Occupant::Enemy(id))?;
            enemies.push(enemy);
        }

        let mut session = Self {
            base_hp: cfg.base_hp,
            playback: SnapshotPlayer::new(cfg.playback),
            overlay: DebugOverlay::new(board.width(), board.height())?,
            events: EventBus::new(),
            phase: Phase::PlayerTurn,
            cfg,
            board,
            enemies,
            traces,
        };
        if !session.traces.is_empty() {
            session.show_path(0);
        }
        Ok(session)
    }

    // -------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------

    pub fn config(&self) -> &GameConfig {
        &self.cfg
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.board.level()
    }

    #[inline]
    pub fn base_hp(&self) -> i32 {
        self.base_hp
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Living enemies, in spawn order.
    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn enemy(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id() == id)
    }

    /// Debug layers, one per replayed enemy search.
    pub fn overlay(&self) -> &DebugOverlay {
        &self.overlay
    }

    pub fn playback(&self) -> &SnapshotPlayer {
        &self.playback
    }

    /// How many enemy searches have been shown so far.
    pub fn debug_sessions(&self) -> usize {
        self.playback.sessions_started()
    }

    pub fn events_mut(&mut self) -> &mut EventBus<GameEvent> {
        &mut self.events
    }

    // -------------------------------------------------------------------
    // Driving the level
    // -------------------------------------------------------------------

    /// Advance time by `dt`.
    ///
    /// While enemy searches are being shown this plays their frames at the
    /// configured cadence, moving on to the next enemy once the current
    /// replay is over. During the enemy turn every enemy acts once.
    pub fn update(&mut self, dt: Duration) -> Result<(), GameError> {
        match self.phase {
            Phase::ShowingPaths { index } => {
                self.playback.update(dt, &mut self.overlay);
                if !self.playback.is_playing() {
                    self.next_path(index);
                }
            }
            Phase::EnemyTurn => self.move_enemies()?,
            Phase::PlayerTurn | Phase::GameOver | Phase::LevelComplete => {}
        }
        Ok(())
    }

    /// Play every remaining search frame at once.
    pub fn finish_path_display(&mut self) {
        while let Phase::ShowingPaths { index } = self.phase {
            while self.playback.tick(&mut self.overlay) {}
            self.next_path(index);
        }
    }

    /// Try to move the player one cell. The player's turn ends whatever the
    /// outcome.
    pub fn player_move(&mut self, dir: Direction) -> Result<MoveOutcome, GameError> {
        if self.phase != Phase::PlayerTurn {
            return Err(GameError::OutOfTurn {
                action: "player move",
                phase: self.phase,
            });
        }
        let from = self.board.player();
        let to = from + dir.delta();
        let outcome = if self.board.contains(to) {
            resolve_move(&Occupant::Player, self.board.occupant(to))
        } else {
            MoveOutcome::Blocked
        };

        match outcome {
            MoveOutcome::Move => self.board.relocate(from, to)?,
            MoveOutcome::PickUp(kind) => {
                self.board.relocate(from, to)?;
                self.consume(kind);
            }
            MoveOutcome::ChopWall => self.chop_wall(to)?,
            MoveOutcome::HitEnemy(id) => self.hit_enemy(id, to)?,
            MoveOutcome::DamageBase | MoveOutcome::Blocked => {
                log::warn!("player move {dir:?} from {from} refused");
            }
        }

        if self.phase == Phase::PlayerTurn {
            self.phase = Phase::EnemyTurn;
        }
        Ok(outcome)
    }

    /// Replace a cleared level with level `level + 1` on a fresh board.
    ///
    /// Event subscriptions are kept; base health starts over from the
    /// configured value.
    pub fn next_level(&mut self, rng: &mut impl Rng) -> Result<(), GameError> {
        if self.phase != Phase::LevelComplete {
            return Err(GameError::OutOfTurn {
                action: "next level",
                phase: self.phase,
            });
        }
        let mut next = Self::new(self.cfg.clone(), self.level() + 1, rng)?;
        next.events = std::mem::take(&mut self.events);
        log::info!("advancing to level {}", next.level());
        *self = next;
        Ok(())
    }

    // -------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------

    fn show_path(&mut self, index: usize) {
        let frames = std::mem::take(&mut self.traces[index]);
        self.playback.enqueue(frames);
        let session = self.playback.start_playback();
        log::debug!("showing search of enemy #{index} in {session}");
        self.phase = Phase::ShowingPaths { index };
    }

    fn next_path(&mut self, index: usize) {
        if index + 1 < self.traces.len() {
            self.show_path(index + 1);
        } else {
            self.overlay.discard_search_layers();
            self.phase = Phase::PlayerTurn;
        }
    }

    fn consume(&mut self, kind: ItemKind) {
        match kind {
            ItemKind::Food => {
                self.base_hp += self.cfg.points_per_food;
                self.events
                    .publish(&GameEvent::BaseHealthChanged(self.cfg.points_per_food));
                self.events.publish(&GameEvent::BaseHealthTextUpdate);
            }
            ItemKind::Soda => {
                for enemy in &mut self.enemies {
                    enemy.freeze(self.cfg.freeze_turns);
                }
                self.events.publish(&GameEvent::FreezeEnemies);
            }
        }
    }

    fn chop_wall(&mut self, p: Point) -> Result<(), GameError> {
        let damage = self.cfg.player_damage;
        let destroyed = match self.board.occupant_mut(p) {
            Some(Occupant::Wall { hp }) => {
                *hp -= damage;
                *hp <= 0
            }
            _ => false,
        };
        if destroyed {
            log::debug!("wall at {p} destroyed");
            self.board.clear_wall(p)?;
        }
        Ok(())
    }

    fn hit_enemy(&mut self, id: EnemyId, p: Point) -> Result<(), GameError> {
        let Some(idx) = self.enemies.iter().position(|e| e.id() == id) else {
            return Ok(());
        };
        if !self.enemies[idx].damage(self.cfg.player_damage) {
            return Ok(());
        }
        self.enemies.remove(idx);
        self.board.remove(p)?;
        log::debug!("{id} killed, {} left", self.enemies.len());
        if self.enemies.is_empty() {
            log::info!("level {} cleared", self.level());
            self.events.publish(&GameEvent::LevelEnd);
            self.phase = Phase::LevelComplete;
        }
        Ok(())
    }

    fn move_enemies(&mut self) -> Result<(), GameError> {
        for i in 0..self.enemies.len() {
            if self.enemies[i].skip_turn() {
                continue;
            }
            let Some(next) = self.enemies[i].next_step() else {
                continue;
            };
            let from = self.enemies[i].pos();
            let id = self.enemies[i].id();
            match resolve_move(&Occupant::Enemy(id), self.board.occupant(next)) {
                MoveOutcome::Move => {
                    self.board.relocate(from, next)?;
                    self.enemies[i].moved_to(next);
                }
                MoveOutcome::DamageBase => {
                    self.damage_base(self.cfg.enemy_base_damage);
                    if self.phase == Phase::GameOver {
                        return Ok(());
                    }
                }
                _ => log::trace!("{id} blocked at {from}"),
            }
        }
        self.phase = Phase::PlayerTurn;
        Ok(())
    }

    fn damage_base(&mut self, amount: i32) {
        self.base_hp -= amount;
        self.events.publish(&GameEvent::BaseHealthChanged(-amount));
        self.events.publish(&GameEvent::BaseHealthTextUpdate);
        if self.base_hp <= 0 {
            log::info!("base overrun on level {}", self.level());
            self.events.publish(&GameEvent::GameOver);
            self.phase = Phase::GameOver;
        }
    }
}

/// A bright random colour for one enemy's final path.
fn random_tint(rng: &mut impl Rng) -> Color {
    Color::from_hsv(
        rng.random::<f32>(),
        rng.random_range(0.5..=1.0),
        rng.random_range(0.75..=1.0),
    )
}
