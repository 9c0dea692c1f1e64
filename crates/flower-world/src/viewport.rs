//! Viewport-to-grid sizing.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of the drawing surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whole cells that fit, as `(cols, rows)`.
    ///
    /// A zero cell size is treated as 1 px. The result may contain zeros;
    /// `FlowerField::initialize` coerces those to 1.
    pub fn grid_dimensions(&self, flower_size: u32) -> (usize, usize) {
        let size = flower_size.max(1);
        ((self.width / size) as usize, (self.height / size) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_dimensions_floor() {
        let viewport = Viewport::new(1000, 620);
        assert_eq!(viewport.grid_dimensions(50), (20, 12));
        assert_eq!(viewport.grid_dimensions(30), (33, 20));
    }

    #[test]
    fn test_small_viewport() {
        let viewport = Viewport::new(40, 10);
        assert_eq!(viewport.grid_dimensions(50), (0, 0));
    }

    #[test]
    fn test_zero_flower_size() {
        let viewport = Viewport::new(12, 7);
        assert_eq!(viewport.grid_dimensions(0), (12, 7));
    }
}
