//! Flower field simulation.
//!
//! This crate implements the bounded 2D grid in which flowers spread,
//! mutate, get removed, and respawn after extinction.

pub mod grid;
pub mod field;
pub mod stats;
pub mod viewport;

pub use grid::Grid;
pub use field::FlowerField;
pub use stats::FieldStats;
pub use viewport::Viewport;
