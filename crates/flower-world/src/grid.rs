//! Row-major grid of optional flowers.

use flower_core::{Flower, GridPosition};
use serde::{Deserialize, Serialize};

/// A bounded (non-wrapping) 2D grid of cells
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<Flower>>,
}

impl Grid {
    /// An all-empty grid
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the grid has no cells at all
    pub fn is_degenerate(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row < self.rows && col < self.cols
    }

    /// Flower at a position; `None` for empty or out-of-bounds cells
    pub fn get(&self, row: usize, col: usize) -> Option<&Flower> {
        if !self.contains(row, col) {
            return None;
        }
        self.cells[self.pos_to_index(row, col)].as_ref()
    }

    /// Replace a cell, returning what was there. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, cell: Option<Flower>) -> Option<Flower> {
        if !self.contains(row, col) {
            return None;
        }
        let index = self.pos_to_index(row, col);
        std::mem::replace(&mut self.cells[index], cell)
    }

    /// In-bounds orthogonal neighbors, ordered up, down, left, right
    pub fn adjacent_positions(&self, row: usize, col: usize) -> Vec<GridPosition> {
        let mut positions = Vec::with_capacity(4);

        if row > 0 {
            positions.push(GridPosition::new(row - 1, col));
        }
        if row + 1 < self.rows {
            positions.push(GridPosition::new(row + 1, col));
        }
        if col > 0 {
            positions.push(GridPosition::new(row, col - 1));
        }
        if col + 1 < self.cols {
            positions.push(GridPosition::new(row, col + 1));
        }

        positions
    }

    pub fn has_any_flower(&self) -> bool {
        self.cells.iter().any(Option::is_some)
    }

    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    fn pos_to_index(&self, row: usize, col: usize) -> usize {
        row * self.cols + col
    }

    /// Get position from index
    pub fn index_to_pos(&self, index: usize) -> GridPosition {
        GridPosition::new(index / self.cols, index % self.cols)
    }

    /// Iterator over all cells with positions, in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (GridPosition, Option<&Flower>)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (self.index_to_pos(i), cell.as_ref()))
    }

    /// Iterator over occupied cells, in row-major order
    pub fn flowers(&self) -> impl Iterator<Item = (GridPosition, &Flower)> + '_ {
        self.iter()
            .filter_map(|(pos, cell)| cell.map(|flower| (pos, flower)))
    }

    /// Cells grouped by row, top to bottom
    pub fn row_slices(&self) -> impl Iterator<Item = &[Option<Flower>]> + '_ {
        // A column-less grid has no cells, so the clamp only avoids chunks(0)
        self.cells.chunks(self.cols.max(1))
    }
}
