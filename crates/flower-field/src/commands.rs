//! Line-oriented commands standing in for clicks, resizes and the settings panel.

use crate::driver::FieldEvent;
use anyhow::{bail, Context, Result};
use flower_core::ConfigKey;
use flower_world::Viewport;

pub const HELP: &str = "\
commands:
  remove <row> <col>        remove the flower at a cell
  resize <width> <height>   resize the viewport (pixels)
  set <KEY> <value>         change a setting, e.g. set MUTATION_CHANCE 0.05
  reset                     rebuild the field at GRID_SIZE
  reset-config              restore default settings
  show-config               print the current settings
  quit                      stop";

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse_command(line: &str) -> Result<Option<FieldEvent>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let command = words.next().unwrap_or_default().to_ascii_lowercase();
    let args: Vec<&str> = words.collect();

    let event = match (command.as_str(), args.as_slice()) {
        ("remove" | "rm", [row, col]) => FieldEvent::Remove {
            row: row.parse().with_context(|| format!("invalid row {:?}", row))?,
            col: col.parse().with_context(|| format!("invalid column {:?}", col))?,
        },
        ("resize", [width, height]) => FieldEvent::Resize(Viewport::new(
            width.parse().with_context(|| format!("invalid width {:?}", width))?,
            height.parse().with_context(|| format!("invalid height {:?}", height))?,
        )),
        ("set", [key, value]) => {
            let key: ConfigKey = key.parse()?;
            FieldEvent::SetConfig(key.parse_value(value)?)
        }
        ("reset", []) => FieldEvent::ResetField,
        ("reset-config", []) => FieldEvent::ResetConfig,
        ("show-config" | "config", []) => FieldEvent::ShowConfig,
        ("quit" | "exit" | "q", []) => FieldEvent::Quit,
        ("remove" | "rm" | "resize" | "set" | "reset" | "reset-config" | "show-config"
        | "config" | "quit" | "exit" | "q", _) => {
            bail!("wrong number of arguments for {:?}\n{}", command, HELP)
        }
        _ => bail!("unknown command {:?}\n{}", command, HELP),
    };

    Ok(Some(event))
}

#[cfg(test)]
mod tests {
    use super::*;
    use flower_core::ConfigUpdate;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("remove 3 4").unwrap(),
            Some(FieldEvent::Remove { row: 3, col: 4 })
        );
        assert_eq!(
            parse_command("  resize 800 600 ").unwrap(),
            Some(FieldEvent::Resize(Viewport::new(800, 600)))
        );
        assert_eq!(
            parse_command("set MUTATION_CHANCE 0.25").unwrap(),
            Some(FieldEvent::SetConfig(ConfigUpdate::MutationChance(0.25)))
        );
        assert_eq!(
            parse_command("set spread_interval_ms 1000").unwrap(),
            Some(FieldEvent::SetConfig(ConfigUpdate::SpreadIntervalMs(1000)))
        );
        assert_eq!(parse_command("reset").unwrap(), Some(FieldEvent::ResetField));
        assert_eq!(parse_command("reset-config").unwrap(), Some(FieldEvent::ResetConfig));
        assert_eq!(parse_command("show-config").unwrap(), Some(FieldEvent::ShowConfig));
        assert_eq!(parse_command("QUIT").unwrap(), Some(FieldEvent::Quit));
    }

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse_command("").unwrap(), None);
        assert_eq!(parse_command("   ").unwrap(), None);
        assert_eq!(parse_command("# note").unwrap(), None);
    }

    #[test]
    fn test_out_of_range_setting_is_accepted() {
        assert_eq!(
            parse_command("set GRID_BORDER_OPACITY 4.5").unwrap(),
            Some(FieldEvent::SetConfig(ConfigUpdate::GridBorderOpacity(4.5)))
        );
    }

    #[test]
    fn test_invalid_commands() {
        assert!(parse_command("remove one 2").is_err());
        assert!(parse_command("remove -1 2").is_err());
        assert!(parse_command("remove 1").is_err());
        assert!(parse_command("set FLOWER_COLORS red").is_err());
        assert!(parse_command("set FLOWER_SIZE big").is_err());
        assert!(parse_command("dance").is_err());
    }
}
