//! Core type definitions for the field.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A flower color, stored as a `#RRGGBB` hex string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(String);

impl Color {
    pub fn new(hex: impl Into<String>) -> Self {
        Self(hex.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode `#RRGGBB` into its channels. Returns `None` for anything else.
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        let hex = self.0.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some((channel(0)?, channel(2)?, channel(4)?))
    }
}

impl From<&str> for Color {
    fn from(hex: &str) -> Self {
        Self::new(hex)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An occupied cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flower {
    pub color: Color,
    /// Spread ticks survived since the flower was created
    pub age: u64,
}

impl Flower {
    /// A freshly created flower (age 0)
    pub fn new(color: Color) -> Self {
        Self { color, age: 0 }
    }

    pub fn with_age(color: Color, age: u64) -> Self {
        Self { color, age }
    }

    /// The same flower one tick older
    pub fn aged(&self) -> Self {
        Self {
            color: self.color.clone(),
            age: self.age.saturating_add(1),
        }
    }
}

/// A (row, col) grid coordinate, 0-indexed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub row: usize,
    pub col: usize,
}

impl GridPosition {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
