//! Level layout: the pathfinding grid plus what stands on each cell.

use basedef_core::{Grid, Point, Vec2};
use basedef_paths::Pathfinder;
use rand::Rng;

use crate::config::GameConfig;
use crate::error::GameError;
use crate::occupant::{ItemKind, Occupant};

/// A generated level.
///
/// The base sits in the bottom-left corner `(0, 0)` and the player starts in
/// the opposite corner. Walls, items and enemy spawn points are scattered
/// over the interior cells, never more than one object per cell.
pub struct Board {
    level: usize,
    pathfinder: Pathfinder,
    occupants: Grid<Option<Occupant>>,
    base: Point,
    player: Point,
    spawns: Vec<Point>,
}

impl Board {
    /// Build level `level` on a `columns × rows` board.
    ///
    /// Walls are placed first (each one blocks its cell for pathfinding),
    /// then items, then `level` enemy spawn points.
    pub fn setup(
        level: usize,
        columns: i32,
        rows: i32,
        cfg: &GameConfig,
        rng: &mut impl Rng,
    ) -> Result<Self, GameError> {
        cfg.validate()?;
        let mut board = Self::empty(level, columns, rows)?;
        let mut free: Vec<Point> = (1..columns - 1)
            .flat_map(|x| (1..rows - 1).map(move |y| Point::new(x, y)))
            .collect();

        let walls = rng.random_range(cfg.min_obstacles..=cfg.max_obstacles);
        for _ in 0..walls {
            let p = take_free(&mut free, rng, "a wall")?;
            board.add_wall(p, cfg.wall_hp)?;
        }

        let items = rng.random_range(cfg.min_items..=cfg.max_items);
        for _ in 0..items {
            let p = take_free(&mut free, rng, "an item")?;
            let kind = if rng.random_bool(0.5) {
                ItemKind::Food
            } else {
                ItemKind::Soda
            };
            board.place(p, Occupant::Item(kind))?;
        }

        for _ in 0..level {
            let p = take_free(&mut free, rng, "an enemy")?;
            board.add_spawn(p);
        }

        log::info!(
            "level {level}: {columns}x{rows} board, {walls} walls, {items} items, {level} enemies"
        );
        Ok(board)
    }

    /// A board holding only the base and the player.
    pub fn empty(level: usize, columns: i32, rows: i32) -> Result<Self, GameError> {
        if columns < 3 || rows < 3 {
            return Err(GameError::InvalidConfig(
                "boards need at least 3 columns and 3 rows",
            ));
        }
        let mut board = Self {
            level,
            pathfinder: Pathfinder::new(columns, rows)?,
            occupants: Grid::new(columns, rows, 1.0, Vec2::ZERO, |_, _| None)?,
            base: Point::ZERO,
            player: Point::new(columns - 1, rows - 1),
            spawns: Vec::new(),
        };
        board.occupants.set(board.base, Some(Occupant::Base))?;
        board.occupants.set(board.player, Some(Occupant::Player))?;
        Ok(board)
    }

    /// Put a wall on `p` and block the cell for searches. Adding a wall
    /// where one already stands replaces it.
    pub fn add_wall(&mut self, p: Point, hp: i32) -> Result<(), GameError> {
        self.occupants.set(p, Some(Occupant::Wall { hp }))?;
        self.pathfinder.set_walkable(p, false)?;
        Ok(())
    }

    /// Reserve `p` as an enemy spawn point.
    pub fn add_spawn(&mut self, p: Point) {
        self.spawns.push(p);
    }

    #[inline]
    pub fn level(&self) -> usize {
        self.level
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.pathfinder.width()
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.pathfinder.height()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.occupants.contains(p)
    }

    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    pub fn pathfinder_mut(&mut self) -> &mut Pathfinder {
        &mut self.pathfinder
    }

    /// Position of the player's base.
    #[inline]
    pub fn base(&self) -> Point {
        self.base
    }

    /// Current player position.
    #[inline]
    pub fn player(&self) -> Point {
        self.player
    }

    /// Cells where this level's enemies start, in placement order.
    pub fn spawns(&self) -> &[Point] {
        &self.spawns
    }

    /// What stands on `p`, if anything. Cells outside the board are empty.
    pub fn occupant(&self, p: Point) -> Option<&Occupant> {
        self.occupants.get(p).ok()?.as_ref()
    }

    pub fn occupant_mut(&mut self, p: Point) -> Option<&mut Occupant> {
        self.occupants.get_mut(p).ok()?.as_mut()
    }

    /// Put `occupant` on `p`, returning what was there.
    pub fn place(&mut self, p: Point, occupant: Occupant) -> Result<Option<Occupant>, GameError> {
        Ok(self.occupants.set(p, Some(occupant))?)
    }

    /// Empty cell `p`, returning what was there.
    pub fn remove(&mut self, p: Point) -> Result<Option<Occupant>, GameError> {
        Ok(self.occupants.set(p, None)?)
    }

    /// Move whatever stands on `from` to `to`, replacing what was there.
    pub(crate) fn relocate(&mut self, from: Point, to: Point) -> Result<(), GameError> {
        let occupant = self.occupants.set(from, None)?;
        self.occupants.set(to, occupant)?;
        if occupant == Some(Occupant::Player) {
            self.player = to;
        }
        Ok(())
    }

    /// Remove a destroyed wall and let searches through its cell again.
    pub(crate) fn clear_wall(&mut self, p: Point) -> Result<(), GameError> {
        self.occupants.set(p, None)?;
        self.pathfinder.set_walkable(p, true)?;
        Ok(())
    }

    /// Row-major ASCII picture of the board, top row first.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for y in (0..self.height()).rev() {
            for x in 0..self.width() {
                let glyph = self.occupant(Point::new(x, y)).map_or('.', Occupant::glyph);
                out.push(glyph);
            }
            out.push('\n');
        }
        out
    }
}

/// Remove and return a random free interior cell.
fn take_free(
    free: &mut Vec<Point>,
    rng: &mut impl Rng,
    what: &'static str,
) -> Result<Point, GameError> {
    if free.is_empty() {
        return Err(GameError::NoFreeCell { what });
    }
    let idx = rng.random_range(0..free.len());
    Ok(free.remove(idx))
}
