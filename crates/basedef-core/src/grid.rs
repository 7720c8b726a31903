//! The [`Grid`] type: a fixed-size 2D array with one value per board cell.
//!
//! A grid is created once per board. Every cell is populated at
//! construction by a factory callback; afterwards the cell *contents* may
//! change but the shape never does. Cells are stored row-major in a single
//! dense `Vec`, so a cell's flat index is `y * width + x`.

use crate::error::GridError;
use crate::geom::{Point, Range, Vec2};

// ---------------------------------------------------------------------------
// GridLayout
// ---------------------------------------------------------------------------

/// Shape of a grid: its dimensions and how cells map onto world space.
///
/// This is what a cell factory gets to see while the grid is being built:
/// the grid's geometry, but none of its (not yet existing) cells.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridLayout {
    width: i32,
    height: i32,
    cell_size: f32,
    origin: Vec2,
}

impl GridLayout {
    /// Validate and build a layout.
    pub fn new(width: i32, height: i32, cell_size: f32, origin: Vec2) -> Result<Self, GridError> {
        if width <= 0 || height <= 0 || !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(GridError::InvalidDimensions {
                width,
                height,
                cell_size,
            });
        }
        Ok(Self {
            width,
            height,
            cell_size,
            origin,
        })
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[inline]
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// The cell rectangle `[0, width) × [0, height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(Point::ZERO, Point::new(self.width, self.height))
    }

    /// Number of cells.
    #[inline]
    pub fn len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Always false: a layout has at least one cell.
    #[inline]
    pub fn is_empty(&self) -> bool {
        false
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Flat row-major index of `p`, or `None` when `p` is outside the grid.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        if !self.contains(p) {
            return None;
        }
        Some((p.y as usize) * (self.width as usize) + (p.x as usize))
    }

    /// Flat index of `p`, failing with [`GridError::OutOfBounds`].
    #[inline]
    pub fn checked_index(&self, p: Point) -> Result<usize, GridError> {
        self.index(p).ok_or(GridError::OutOfBounds {
            pos: p,
            width: self.width,
            height: self.height,
        })
    }

    /// Inverse of [`index`](Self::index).
    #[inline]
    pub fn point(&self, idx: usize) -> Point {
        let w = self.width as usize;
        Point::new((idx % w) as i32, (idx / w) as i32)
    }

    /// Cell whose integer coordinates are `floor((pos - origin) / cell_size)`.
    ///
    /// The result is not bounds-checked; see
    /// [`world_to_cell_checked`](Self::world_to_cell_checked).
    pub fn world_to_cell(&self, pos: Vec2) -> Point {
        let rel = pos - self.origin;
        Point::new(
            (rel.x / self.cell_size).floor() as i32,
            (rel.y / self.cell_size).floor() as i32,
        )
    }

    /// Like [`world_to_cell`](Self::world_to_cell) but fails when the
    /// position falls outside the grid.
    pub fn world_to_cell_checked(&self, pos: Vec2) -> Result<Point, GridError> {
        let p = self.world_to_cell(pos);
        self.checked_index(p).map(|_| p)
    }

    /// Anchor (lower-left corner) of cell `p` in world space.
    pub fn cell_to_world(&self, p: Point) -> Vec2 {
        Vec2::new(
            p.x as f32 * self.cell_size + self.origin.x,
            p.y as f32 * self.cell_size + self.origin.y,
        )
    }
}

// ---------------------------------------------------------------------------
// Grid
// ---------------------------------------------------------------------------

/// A fixed-size 2D grid holding one `T` per cell.
#[derive(Debug, Clone)]
pub struct Grid<T> {
    layout: GridLayout,
    cells: Vec<T>,
}

impl<T> Grid<T> {
    /// Build a `width × height` grid, calling `factory` exactly once per
    /// cell in row-major order (y outer, x inner).
    pub fn new<F>(
        width: i32,
        height: i32,
        cell_size: f32,
        origin: Vec2,
        factory: F,
    ) -> Result<Self, GridError>
    where
        F: FnMut(&GridLayout, Point) -> T,
    {
        let layout = GridLayout::new(width, height, cell_size, origin)?;
        Ok(Self::with_layout(layout, factory))
    }

    /// Build a grid from an already validated layout.
    pub fn with_layout<F>(layout: GridLayout, mut factory: F) -> Self
    where
        F: FnMut(&GridLayout, Point) -> T,
    {
        let cells = layout.bounds().iter().map(|p| factory(&layout, p)).collect();
        Self { layout, cells }
    }

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    pub fn width(&self) -> i32 {
        self.layout.width
    }

    #[inline]
    pub fn height(&self) -> i32 {
        self.layout.height
    }

    #[inline]
    pub fn bounds(&self) -> Range {
        self.layout.bounds()
    }

    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.layout.contains(p)
    }

    /// Read the cell at `p`.
    pub fn get(&self, p: Point) -> Result<&T, GridError> {
        let i = self.layout.checked_index(p)?;
        Ok(&self.cells[i])
    }

    /// Mutable access to the cell at `p`.
    pub fn get_mut(&mut self, p: Point) -> Result<&mut T, GridError> {
        let i = self.layout.checked_index(p)?;
        Ok(&mut self.cells[i])
    }

    /// Replace the cell at `p`, returning the previous value.
    pub fn set(&mut self, p: Point, value: T) -> Result<T, GridError> {
        let cell = self.get_mut(p)?;
        Ok(std::mem::replace(cell, value))
    }

    /// All cells as a row-major slice.
    #[inline]
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// All cells as a mutable row-major slice.
    #[inline]
    pub fn cells_mut(&mut self) -> &mut [T] {
        &mut self.cells
    }

    /// Row-major iterator over `(Point, &T)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &T)> + '_ {
        self.layout.bounds().iter().zip(self.cells.iter())
    }

    #[inline]
    pub fn world_to_cell(&self, pos: Vec2) -> Point {
        self.layout.world_to_cell(pos)
    }

    #[inline]
    pub fn world_to_cell_checked(&self, pos: Vec2) -> Result<Point, GridError> {
        self.layout.world_to_cell_checked(pos)
    }

    #[inline]
    pub fn cell_to_world(&self, p: Point) -> Vec2 {
        self.layout.cell_to_world(p)
    }
}
