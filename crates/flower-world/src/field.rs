//! The flower field simulation: seeding, spread, respawn and removal.

use crate::grid::Grid;
use crate::stats::FieldStats;
use flower_core::{Flower, GameConfig, GridPosition};
use rand::Rng;
use tracing::{debug, trace};

/// Owns the grid and applies the update rules.
///
/// Every operation takes the configuration snapshot and random source to use,
/// so the field never reads shared state. A new field is uninitialized (0x0)
/// until [`FlowerField::initialize`] runs.
#[derive(Debug, Clone, Default)]
pub struct FlowerField {
    grid: Grid,
    generation: u64,
}

/// Bernoulli trial. Probabilities outside [0, 1] saturate instead of panicking.
fn chance<R: Rng + ?Sized>(rng: &mut R, probability: f64) -> bool {
    rng.gen::<f64>() < probability
}

impl FlowerField {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing grid
    pub fn from_grid(grid: Grid) -> Self {
        Self { grid, generation: 0 }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn is_initialized(&self) -> bool {
        !self.grid.is_degenerate()
    }

    /// Spread ticks applied since the last (re)initialization
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn stats(&self) -> FieldStats {
        FieldStats::from_grid(&self.grid)
    }

    /// Replace the grid with an empty `rows x cols` one seeded at its center.
    ///
    /// Missing dimensions fall back to the configured grid size; both are
    /// coerced to at least 1.
    pub fn initialize<R: Rng + ?Sized>(
        &mut self,
        cols: Option<usize>,
        rows: Option<usize>,
        config: &GameConfig,
        rng: &mut R,
    ) {
        let default_size = config.grid_size as usize;
        let cols = cols.unwrap_or(default_size).max(1);
        let rows = rows.unwrap_or(default_size).max(1);

        let mut grid = Grid::new(rows, cols);
        let start_row = (rows / 2).min(rows - 1);
        let start_col = (cols / 2).min(cols - 1);
        let color = config.flower_colors.random_color(rng);
        grid.set(start_row, start_col, Some(Flower::new(color)));

        debug!(rows, cols, start_row, start_col, "Initialized field");

        self.grid = grid;
        self.generation = 0;
    }

    /// In-bounds orthogonal neighbors, ordered up, down, left, right
    pub fn adjacent_positions(&self, row: usize, col: usize) -> Vec<GridPosition> {
        self.grid.adjacent_positions(row, col)
    }

    /// Empty a cell, returning the flower that was there.
    /// Out-of-bounds positions are ignored.
    pub fn remove(&mut self, row: usize, col: usize) -> Option<Flower> {
        let removed = self.grid.set(row, col, None);
        if removed.is_some() {
            trace!(row, col, "Removed flower");
        }
        removed
    }

    /// Reseed one random cell, but only when the whole grid is empty and the
    /// respawn roll succeeds. Returns where the flower was placed.
    pub fn try_spawn_random_flower<R: Rng + ?Sized>(
        &mut self,
        config: &GameConfig,
        rng: &mut R,
    ) -> Option<GridPosition> {
        if self.grid.is_degenerate() || self.grid.has_any_flower() {
            return None;
        }

        if !chance(rng, config.respawn_chance_when_empty) {
            return None;
        }

        let row = rng.gen_range(0..self.grid.rows());
        let col = rng.gen_range(0..self.grid.cols());
        let color = config.flower_colors.random_color(rng);
        self.grid.set(row, col, Some(Flower::new(color)));

        debug!(row, col, "Respawned flower on empty field");
        Some(GridPosition::new(row, col))
    }

    /// Advance one spread tick. Returns the number of cells newly populated.
    ///
    /// Decisions read the pre-tick grid only. Each occupied cell, visited in
    /// row-major order, seeds every neighbor that was empty before the tick:
    /// with `mutation_chance` the seed gets a fresh palette color, otherwise
    /// it copies the source color. A target claimed by several sources keeps
    /// the last one visited. Cells that existed before the tick age by one;
    /// cells born in this tick stay at age 0.
    pub fn spread_flowers<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) -> usize {
        if self.grid.is_degenerate() {
            return 0;
        }

        let snapshot = &self.grid;
        let mut next = Grid::new(snapshot.rows(), snapshot.cols());
        let mut born = 0;

        for (pos, flower) in snapshot.flowers() {
            next.set(pos.row, pos.col, Some(flower.aged()));
        }

        for (pos, flower) in snapshot.flowers() {
            for target in snapshot.adjacent_positions(pos.row, pos.col) {
                if snapshot.get(target.row, target.col).is_some() {
                    continue;
                }

                let color = if chance(rng, config.mutation_chance) {
                    config.flower_colors.random_color(rng)
                } else {
                    flower.color.clone()
                };

                if next.set(target.row, target.col, Some(Flower::new(color))).is_none() {
                    born += 1;
                }
            }
        }

        self.grid = next;
        self.generation += 1;

        trace!(generation = self.generation, born, "Spread tick");
        born
    }

    /// Discard the grid and re-initialize at the configured default size
    pub fn reset<R: Rng + ?Sized>(&mut self, config: &GameConfig, rng: &mut R) {
        self.grid = Grid::default();
        self.initialize(None, None, config, rng);
    }
}
