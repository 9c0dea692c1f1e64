//! Terminal renderer: one glyph per cell in 24-bit color.

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{Clear, ClearType},
};
use flower_core::GameConfig;
use flower_world::Grid;
use std::io::{self, Write};

const FLOWER_GLYPH: char = '✿';
const EMPTY_GLYPH: char = '·';

/// Queue one full frame of the grid onto `out`, starting from a cleared screen.
///
/// Empty cells are dimmed by `GRID_BORDER_OPACITY`. Nothing is flushed.
pub fn render_frame<W: Write>(out: &mut W, grid: &Grid, config: &GameConfig) -> io::Result<()> {
    queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;

    let gray = (config.grid_border_opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    let empty = TermColor::Rgb {
        r: gray,
        g: gray,
        b: gray,
    };

    for row in grid.row_slices() {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                queue!(out, Print(' '))?;
            }

            match cell {
                Some(flower) => match flower.color.rgb() {
                    Some((r, g, b)) => queue!(
                        out,
                        SetForegroundColor(TermColor::Rgb { r, g, b }),
                        Print(FLOWER_GLYPH),
                        ResetColor
                    )?,
                    None => queue!(out, Print(FLOWER_GLYPH))?,
                },
                None => queue!(out, SetForegroundColor(empty), Print(EMPTY_GLYPH), ResetColor)?,
            }
        }
        queue!(out, Print('\n'))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use flower_core::{Color, Flower};

    fn frame(grid: &Grid, config: &GameConfig) -> String {
        let mut out = Vec::new();
        render_frame(&mut out, grid, config).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_frame_layout() {
        let mut grid = Grid::new(2, 3);
        grid.set(0, 1, Some(Flower::new(Color::from("#FF0080"))));

        let frame = frame(&grid, &GameConfig::default());

        assert!(frame.starts_with("\x1b[1;1H\x1b[2J"));
        assert_eq!(frame.lines().count(), 2);
        assert_eq!(frame.matches(FLOWER_GLYPH).count(), 1);
        assert_eq!(frame.matches(EMPTY_GLYPH).count(), 5);
        assert!(frame.contains("\x1b[38;2;255;0;128m✿\x1b[0m"));
    }

    #[test]
    fn test_border_opacity_sets_gray() {
        let grid = Grid::new(1, 1);
        let config = GameConfig {
            grid_border_opacity: 1.0,
            ..Default::default()
        };

        let frame = frame(&grid, &config);
        assert!(frame.contains("\x1b[38;2;255;255;255m·"));
    }

    #[test]
    fn test_non_hex_color_renders_plain() {
        let mut grid = Grid::new(1, 1);
        grid.set(0, 0, Some(Flower::new(Color::from("tomato"))));

        let frame = frame(&grid, &GameConfig::default());
        assert!(frame.ends_with("\x1b[2J✿\n"));
    }

    #[test]
    fn test_empty_grid_only_clears() {
        let frame = frame(&Grid::default(), &GameConfig::default());
        assert_eq!(frame, "\x1b[1;1H\x1b[2J");
    }
}
