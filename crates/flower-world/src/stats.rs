//! Population census of a grid.

use crate::grid::Grid;
use flower_core::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Summary of the field at one moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldStats {
    pub rows: usize,
    pub cols: usize,
    pub occupied: usize,
    pub distinct_colors: usize,
    pub oldest_age: Option<u64>,
    /// Most common color and its count; ties go to the color seen first in row-major order
    pub dominant_color: Option<(Color, usize)>,
}

impl FieldStats {
    pub fn from_grid(grid: &Grid) -> Self {
        let mut counts: HashMap<&Color, (usize, usize)> = HashMap::new();
        let mut oldest_age = None;

        for (order, (_, flower)) in grid.flowers().enumerate() {
            counts.entry(&flower.color).or_insert((0, order)).0 += 1;
            oldest_age = oldest_age.max(Some(flower.age));
        }

        let occupied = counts.values().map(|(count, _)| count).sum::<usize>();
        let dominant_color = counts
            .iter()
            .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then(b.1 .1.cmp(&a.1 .1)))
            .map(|(color, (count, _))| ((*color).clone(), *count));

        Self {
            rows: grid.rows(),
            cols: grid.cols(),
            occupied,
            distinct_colors: counts.len(),
            oldest_age,
            dominant_color,
        }
    }

    pub fn cells(&self) -> usize {
        self.rows * self.cols
    }

    /// Fraction of cells holding a flower
    pub fn occupancy(&self) -> f64 {
        if self.cells() == 0 {
            0.0
        } else {
            self.occupied as f64 / self.cells() as f64
        }
    }

    pub fn is_extinct(&self) -> bool {
        self.occupied == 0
    }
}
