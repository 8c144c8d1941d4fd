use crate::cell::{Cell, CellCounts};
use crate::grid::{neighbor_counts, transition, TimedPromotions};
use anyhow::Result;
use neori_common::{GameParams, Vec2i};
use rand::Rng;

/// Radius and thickness of the rings stamped by [`WorldGrid::infect`].
const SEED_RING_RADIUS: i32 = 8;
const SEED_RING_THICKNESS: i32 = 2;

/// The automaton grid, held in two row-major buffers.
#[derive(Debug, Clone)]
pub struct WorldGrid {
    pub cols: usize,
    pub rows: usize,
    /// Pixel size of one cell, kept for presentation.
    pub resolution: u32,

    // --- Ping-Pong Buffers ---
    // Committed state of the previous step; every read during a step comes from here.
    current: Vec<Cell>,
    // Output of the step in progress.
    next: Vec<Cell>,
}

impl WorldGrid {
    /// Creates an all-dead grid for a `width x height` canvas.
    pub fn new(width_px: u32, height_px: u32, resolution_px: u32) -> Result<Self> {
        let (cols, rows) = GameParams::grid_dims(width_px, height_px, resolution_px)?;
        Ok(Self::with_dims(cols, rows, resolution_px))
    }

    /// Creates an all-dead grid with explicit dimensions.
    pub fn with_dims(cols: usize, rows: usize, resolution: u32) -> Self {
        Self {
            cols,
            rows,
            resolution,
            current: vec![Cell::Dead; cols * rows],
            next: vec![Cell::Dead; cols * rows],
        }
    }

    /// Sets each cell `Healthy` with probability `density`, `Dead` otherwise.
    pub fn populate<R: Rng>(&mut self, rng: &mut R, density: f32) {
        let density = f64::from(density).clamp(0.0, 1.0);
        for cell in self.current.iter_mut() {
            *cell = if rng.random_bool(density) { Cell::Healthy } else { Cell::Dead };
        }
        self.next.copy_from_slice(&self.current);
    }

    #[inline]
    pub fn size(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    #[inline]
    fn index(&self, pos: Vec2i) -> Option<usize> {
        pos.in_bounds(self.cols, self.rows)
            .then(|| pos.y as usize * self.cols + pos.x as usize)
    }

    #[inline]
    pub fn in_bounds(&self, pos: Vec2i) -> bool {
        pos.in_bounds(self.cols, self.rows)
    }

    /// Committed state at `pos`, or `None` off the map.
    #[inline]
    pub fn get(&self, pos: Vec2i) -> Option<Cell> {
        self.index(pos).map(|idx| self.current[idx])
    }

    /// Iterates the committed buffer as `(coordinate, cell)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Vec2i, Cell)> + '_ {
        let cols = self.cols;
        self.current
            .iter()
            .enumerate()
            .map(move |(idx, &cell)| (Vec2i::new((idx % cols) as i32, (idx / cols) as i32), cell))
    }

    pub fn cells(&self) -> &[Cell] {
        &self.current
    }

    pub fn cell_counts(&self) -> CellCounts {
        CellCounts::tally(&self.current)
    }

    pub fn infections(&self) -> usize {
        self.cell_counts().infected()
    }

    /// A uniformly random in-bounds coordinate.
    pub fn random_cell<R: Rng>(&self, rng: &mut R) -> Vec2i {
        Vec2i::new(
            rng.random_range(0..self.cols) as i32,
            rng.random_range(0..self.rows) as i32,
        )
    }

    /// Computes the next state of every cell from the committed buffer, then swaps.
    /// `promotions` takes precedence over the automaton rule.
    /// Returns the census of the new committed buffer.
    pub fn step(&mut self, promotions: TimedPromotions) -> CellCounts {
        let (cols, rows) = (self.cols, self.rows);
        for y in 0..rows {
            for x in 0..cols {
                let idx = y * cols + x;
                let cell = self.current[idx];
                self.next[idx] = match promotions.apply(cell) {
                    Some(promoted) => promoted,
                    None => transition(cell, &neighbor_counts(&self.current, cols, rows, x, y)),
                };
            }
        }
        self.swap_buffers();
        self.cell_counts()
    }

    /// Swaps the input and output buffers.
    fn swap_buffers(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    // --- Region stamping ---
    // Stamps write straight into both buffers and bypass the rule.
    // Anything outside the grid is clipped.

    pub fn set_cell(&mut self, pos: Vec2i, kind: Cell) {
        if let Some(idx) = self.index(pos) {
            self.current[idx] = kind;
            self.next[idx] = kind;
        }
    }

    /// Clipped column and row ranges of the box of half-width `size` around `center`.
    fn window(&self, center: Vec2i, size: i32) -> (std::ops::Range<i32>, std::ops::Range<i32>) {
        let size = size.max(0);
        let xs = center.x.saturating_sub(size).max(0)..center.x.saturating_add(size).saturating_add(1).min(self.cols as i32);
        let ys = center.y.saturating_sub(size).max(0)..center.y.saturating_add(size).saturating_add(1).min(self.rows as i32);
        (xs, ys)
    }

    /// Stamps every cell whose squared distance to `center` lies within `min_sq..=max_sq`.
    fn stamp_where(&mut self, center: Vec2i, size: i32, kind: Cell, min_sq: i32, max_sq: i32) {
        let (xs, ys) = self.window(center, size);
        for x in xs {
            for y in ys.clone() {
                let pos = Vec2i::new(x, y);
                let d2 = pos.distance_squared(center);
                if (min_sq..=max_sq).contains(&d2) {
                    self.set_cell(pos, kind);
                }
            }
        }
    }

    /// Axis-aligned box of half-width `size`.
    pub fn set_square_region(&mut self, center: Vec2i, kind: Cell, size: i32) {
        let (xs, ys) = self.window(center, size);
        for x in xs {
            for y in ys.clone() {
                self.set_cell(Vec2i::new(x, y), kind);
            }
        }
    }

    /// Disc of radius `size`.
    pub fn set_circular_region(&mut self, center: Vec2i, kind: Cell, size: i32) {
        self.stamp_where(center, size, kind, 0, size.saturating_mul(size));
    }

    /// Annulus between radii `size - thickness` and `size`, both inclusive.
    pub fn set_circular_ring(&mut self, center: Vec2i, kind: Cell, size: i32, thickness: i32) {
        let inner = (size - thickness).max(0);
        self.stamp_where(center, size, kind, inner.saturating_mul(inner), size.saturating_mul(size));
    }

    /// Stamps an infected ring at `at`, or at a random spot away from the edges.
    /// Returns the ring center.
    pub fn infect<R: Rng>(&mut self, rng: &mut R, at: Option<Vec2i>) -> Vec2i {
        let center = at.unwrap_or_else(|| {
            let (cols, rows) = (self.cols as i32, self.rows as i32);
            if cols - 3 >= 4 && rows - 3 >= 4 {
                Vec2i::new(rng.random_range(4..=cols - 3), rng.random_range(4..=rows - 3))
            } else {
                self.random_cell(rng)
            }
        });
        self.set_circular_ring(center, Cell::Infected, SEED_RING_RADIUS, SEED_RING_THICKNESS);
        center
    }
}
