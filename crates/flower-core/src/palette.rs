//! The flower color palette.

use crate::error::{Error, Result};
use crate::types::Color;
use rand::Rng;

/// Colors a new flower may take, in `#RRGGBB` form
pub const DEFAULT_COLORS: [&str; 110] = [
    "#FF6B6B", "#4ECDC4", "#45B7D1", "#FFA07A", "#98D8C8", "#F7DC6F",
    "#BB8FCE", "#85C1E2", "#F8B88B", "#E74C3C", "#B22234", "#3C3B6E",
    "#00247D", "#CF142B", "#0055A4", "#EF4135", "#FFD700", "#000000",
    "#FFFFFF", "#007A33", "#FF9933", "#128807", "#0035AD", "#CD2E3A",
    "#DA291C", "#FFCE00", "#006233", "#0033A0", "#ED2939", "#00205B",
    "#009B3A", "#FEDD00", "#003893", "#C8102E", "#003153", "#E30A17",
    "#009246", "#F1ECE1", "#FFD100", "#AA151B", "#0038A8", "#CE1126",
    "#006A4E", "#F42A41", "#000080", "#3137FD", "#002F6C", "#00843D",
    "#AF012E", "#D21034", "#000033", "#66023C", "#002395", "#21468B",
    "#AE1C28", "#0072CE", "#FF4F00", "#00A693", "#CA0821", "#FFD300",
    "#0047AB", "#E667AF", "#800000", "#4B0082", "#704214", "#008080",
    "#E0115F", "#0048BA", "#89CFF0", "#FB607F", "#007BA7", "#DE3163",
    "#8B0000", "#E97451", "#CC7722", "#FFDB58", "#808000", "#B76E79",
    "#C0C0C0", "#FF2400", "#7F1734", "#D1E231", "#00A86B", "#964B00",
    "#6F4E37", "#A40000", "#0000F5", "#3D0734", "#2E5894", "#9C7C38",
    "#50C878", "#FF7F50", "#40E0D0", "#E6E6FA", "#00FF00", "#FF00FF",
    "#800080", "#DAA520", "#FA8072", "#7B68EE", "#6A5ACD", "#483D8B",
    "#2F4F4F", "#BC8F8F", "#D2691E", "#F4A460", "#556B2F", "#ADFF2F",
    "#00FF7F", "#4169E1",
];

/// A fixed, non-empty set of colors.
///
/// The palette is static data: it is read when flowers are created but never
/// persisted and never changed by a configuration reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Palette {
    colors: Vec<Color>,
}

impl Palette {
    pub fn new(colors: Vec<Color>) -> Result<Self> {
        if colors.is_empty() {
            return Err(Error::Validation("palette must contain at least one color".to_string()));
        }
        Ok(Self { colors })
    }

    pub fn colors(&self) -> &[Color] {
        &self.colors
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn contains(&self, color: &Color) -> bool {
        self.colors.contains(color)
    }

    /// Pick a color uniformly at random
    pub fn random_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        self.colors[rng.gen_range(0..self.colors.len())].clone()
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|&hex| Color::from(hex)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_default_palette() {
        let palette = Palette::default();
        assert_eq!(palette.len(), DEFAULT_COLORS.len());
        assert!(palette.colors().iter().all(|c| c.rgb().is_some()));
    }

    #[test]
    fn test_empty_palette_rejected() {
        assert!(matches!(Palette::new(Vec::new()), Err(Error::Validation(_))));
    }

    #[test]
    fn test_random_color_is_member() {
        let palette = Palette::default();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        for _ in 0..200 {
            let color = palette.random_color(&mut rng);
            assert!(palette.contains(&color));
        }
    }

    #[test]
    fn test_single_color_palette() {
        let palette = Palette::new(vec![Color::from("#123456")]).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        assert_eq!(palette.random_color(&mut rng), Color::from("#123456"));
    }
}
