//! Configuration types for the field.

use crate::error::{Error, Result};
use crate::palette::Palette;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Tunable game parameters.
///
/// Field names serialize in `SCREAMING_SNAKE_CASE`, which is also the layout
/// of the persisted record. The palette is never serialized. Missing fields
/// in a stored record fall back to their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct GameConfig {
    /// Grid side length used when no viewport dimensions are supplied
    pub grid_size: u32,
    /// Cell size in pixels
    pub flower_size: u32,
    /// Milliseconds between spread ticks
    pub spread_interval_ms: u64,
    /// Probability that a spread re-rolls the color (0.0 to 1.0)
    pub mutation_chance: f64,
    /// Probability of reseeding an empty grid per tick (0.0 to 1.0)
    pub respawn_chance_when_empty: f64,
    /// Flower glyph size relative to its cell
    pub flower_scale: f64,
    /// Opacity of the cell border (0.0 to 1.0)
    pub grid_border_opacity: f64,
    /// Opacity of the hover highlight (0.0 to 1.0)
    pub grid_hover_opacity: f64,
    /// Colors new flowers are drawn from
    #[serde(skip)]
    pub flower_colors: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            flower_size: 50,
            spread_interval_ms: 5000,
            mutation_chance: 0.01,
            respawn_chance_when_empty: 0.1,
            flower_scale: 0.8,
            grid_border_opacity: 0.1,
            grid_hover_opacity: 0.2,
            flower_colors: Palette::default(),
        }
    }
}

impl GameConfig {
    /// Restore every parameter to its default, keeping the palette
    pub fn reset_parameters(&mut self) {
        let palette = std::mem::take(&mut self.flower_colors);
        *self = Self {
            flower_colors: palette,
            ..Self::default()
        };
    }

    pub fn apply(&mut self, update: ConfigUpdate) {
        match update {
            ConfigUpdate::GridSize(v) => self.grid_size = v,
            ConfigUpdate::FlowerSize(v) => self.flower_size = v,
            ConfigUpdate::SpreadIntervalMs(v) => self.spread_interval_ms = v,
            ConfigUpdate::MutationChance(v) => self.mutation_chance = v,
            ConfigUpdate::RespawnChanceWhenEmpty(v) => self.respawn_chance_when_empty = v,
            ConfigUpdate::FlowerScale(v) => self.flower_scale = v,
            ConfigUpdate::GridBorderOpacity(v) => self.grid_border_opacity = v,
            ConfigUpdate::GridHoverOpacity(v) => self.grid_hover_opacity = v,
        }
    }
}

/// Names of the persisted parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    GridSize,
    FlowerSize,
    SpreadIntervalMs,
    MutationChance,
    RespawnChanceWhenEmpty,
    FlowerScale,
    GridBorderOpacity,
    GridHoverOpacity,
}

impl ConfigKey {
    pub fn all() -> [ConfigKey; 8] {
        [
            ConfigKey::GridSize,
            ConfigKey::FlowerSize,
            ConfigKey::SpreadIntervalMs,
            ConfigKey::MutationChance,
            ConfigKey::RespawnChanceWhenEmpty,
            ConfigKey::FlowerScale,
            ConfigKey::GridBorderOpacity,
            ConfigKey::GridHoverOpacity,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigKey::GridSize => "GRID_SIZE",
            ConfigKey::FlowerSize => "FLOWER_SIZE",
            ConfigKey::SpreadIntervalMs => "SPREAD_INTERVAL_MS",
            ConfigKey::MutationChance => "MUTATION_CHANCE",
            ConfigKey::RespawnChanceWhenEmpty => "RESPAWN_CHANCE_WHEN_EMPTY",
            ConfigKey::FlowerScale => "FLOWER_SCALE",
            ConfigKey::GridBorderOpacity => "GRID_BORDER_OPACITY",
            ConfigKey::GridHoverOpacity => "GRID_HOVER_OPACITY",
        }
    }

    /// Parse a textual value into an update for this key.
    ///
    /// Only the number format is checked; range checks belong to the caller.
    pub fn parse_value(&self, raw: &str) -> Result<ConfigUpdate> {
        let key = *self;
        let raw = raw.trim();

        let update = match key {
            ConfigKey::GridSize => ConfigUpdate::GridSize(parse_number(key, raw)?),
            ConfigKey::FlowerSize => ConfigUpdate::FlowerSize(parse_number(key, raw)?),
            ConfigKey::SpreadIntervalMs => ConfigUpdate::SpreadIntervalMs(parse_number(key, raw)?),
            ConfigKey::MutationChance => ConfigUpdate::MutationChance(parse_number(key, raw)?),
            ConfigKey::RespawnChanceWhenEmpty => {
                ConfigUpdate::RespawnChanceWhenEmpty(parse_number(key, raw)?)
            }
            ConfigKey::FlowerScale => ConfigUpdate::FlowerScale(parse_number(key, raw)?),
            ConfigKey::GridBorderOpacity => {
                ConfigUpdate::GridBorderOpacity(parse_number(key, raw)?)
            }
            ConfigKey::GridHoverOpacity => ConfigUpdate::GridHoverOpacity(parse_number(key, raw)?),
        };

        Ok(update)
    }
}

fn parse_number<T>(key: ConfigKey, raw: &str) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    raw.parse::<T>()
        .map_err(|e| Error::Validation(format!("invalid value {:?} for {}: {}", raw, key, e)))
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfigKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_uppercase().replace('-', "_");
        ConfigKey::all()
            .into_iter()
            .find(|key| key.as_str() == wanted)
            .ok_or_else(|| Error::NotFound(format!("unknown config key: {}", s.trim())))
    }
}

/// A single parameter change, carrying the value in the parameter's own type.
///
/// Sizes and the interval are unsigned, so negative values cannot be
/// expressed. Zero is stored as given and coerced to 1 where it is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigUpdate {
    GridSize(u32),
    FlowerSize(u32),
    SpreadIntervalMs(u64),
    MutationChance(f64),
    RespawnChanceWhenEmpty(f64),
    FlowerScale(f64),
    GridBorderOpacity(f64),
    GridHoverOpacity(f64),
}

impl ConfigUpdate {
    pub fn key(&self) -> ConfigKey {
        match self {
            ConfigUpdate::GridSize(_) => ConfigKey::GridSize,
            ConfigUpdate::FlowerSize(_) => ConfigKey::FlowerSize,
            ConfigUpdate::SpreadIntervalMs(_) => ConfigKey::SpreadIntervalMs,
            ConfigUpdate::MutationChance(_) => ConfigKey::MutationChance,
            ConfigUpdate::RespawnChanceWhenEmpty(_) => ConfigKey::RespawnChanceWhenEmpty,
            ConfigUpdate::FlowerScale(_) => ConfigKey::FlowerScale,
            ConfigUpdate::GridBorderOpacity(_) => ConfigKey::GridBorderOpacity,
            ConfigUpdate::GridHoverOpacity(_) => ConfigKey::GridHoverOpacity,
        }
    }
}

impl fmt::Display for ConfigUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}=", self.key())?;
        match self {
            ConfigUpdate::GridSize(v) | ConfigUpdate::FlowerSize(v) => write!(f, "{}", v),
            ConfigUpdate::SpreadIntervalMs(v) => write!(f, "{}", v),
            ConfigUpdate::MutationChance(v)
            | ConfigUpdate::RespawnChanceWhenEmpty(v)
            | ConfigUpdate::FlowerScale(v)
            | ConfigUpdate::GridBorderOpacity(v)
            | ConfigUpdate::GridHoverOpacity(v) => write!(f, "{}", v),
        }
    }
}

/// Runner configuration for the terminal front end
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Directory holding the persisted configuration record
    pub storage_dir: PathBuf,
    /// Viewport width in pixels
    pub viewport_width: u32,
    /// Viewport height in pixels
    pub viewport_height: u32,
    /// Random seed; entropy-seeded when absent
    pub seed: Option<u64>,
    /// Draw the field to stdout after each tick
    pub render: bool,
    /// Stop after this many ticks
    pub max_ticks: Option<u64>,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            storage_dir: PathBuf::from("./data"),
            viewport_width: 1000,
            viewport_height: 600,
            seed: None,
            render: true,
            max_ticks: None,
        }
    }
}

impl RunnerConfig {
    /// Defaults overlaid with `FLOWER_FIELD_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(dir) = lookup("FLOWER_FIELD_STORAGE_DIR") {
            config.storage_dir = PathBuf::from(dir);
        }

        if let Some(viewport) = lookup("FLOWER_FIELD_VIEWPORT") {
            let (width, height) = parse_viewport(&viewport)?;
            config.viewport_width = width;
            config.viewport_height = height;
        }

        if let Some(seed) = lookup("FLOWER_FIELD_SEED") {
            config.seed = Some(seed.trim().parse().map_err(|e| {
                Error::Validation(format!("invalid FLOWER_FIELD_SEED {:?}: {}", seed, e))
            })?);
        }

        if let Some(render) = lookup("FLOWER_FIELD_RENDER") {
            config.render = match render.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" | "on" => true,
                "0" | "false" | "no" | "off" => false,
                other => {
                    return Err(Error::Validation(format!(
                        "invalid FLOWER_FIELD_RENDER {:?}",
                        other
                    )))
                }
            };
        }

        if let Some(ticks) = lookup("FLOWER_FIELD_MAX_TICKS") {
            config.max_ticks = Some(ticks.trim().parse().map_err(|e| {
                Error::Validation(format!("invalid FLOWER_FIELD_MAX_TICKS {:?}: {}", ticks, e))
            })?);
        }

        Ok(config)
    }
}

/// Parse `"<width>x<height>"`
fn parse_viewport(raw: &str) -> Result<(u32, u32)> {
    let invalid = || Error::Validation(format!("invalid viewport {:?}, expected WIDTHxHEIGHT", raw));
    let (width, height) = raw.trim().split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;
    let width = width.trim().parse().map_err(|_| invalid())?;
    let height = height.trim().parse().map_err(|_| invalid())?;
    Ok((width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_configs() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.flower_size, 50);
        assert_eq!(config.spread_interval_ms, 5000);
        assert_eq!(config.mutation_chance, 0.01);
        assert_eq!(config.respawn_chance_when_empty, 0.1);
        assert_eq!(config.flower_scale, 0.8);
        assert_eq!(config.grid_border_opacity, 0.1);
        assert_eq!(config.grid_hover_opacity, 0.2);
        assert!(!config.flower_colors.is_empty());

        let runner = RunnerConfig::default();
        assert_eq!(runner.viewport_width, 1000);
        assert!(runner.render);
    }

    #[test]
    fn test_serialization_skips_palette() {
        let config = GameConfig::default();
        let json = serde_json::to_value(&config).unwrap();
        let object = json.as_object().unwrap();

        assert_eq!(object.len(), 8);
        assert!(!object.contains_key("FLOWER_COLORS"));
        assert_eq!(object["SPREAD_INTERVAL_MS"], 5000);
        assert_eq!(object["RESPAWN_CHANCE_WHEN_EMPTY"], 0.1);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let config: GameConfig = serde_json::from_str(r#"{"MUTATION_CHANCE": 0.5}"#).unwrap();
        assert_eq!(config.mutation_chance, 0.5);
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.flower_colors, Palette::default());
    }

    #[test]
    fn test_apply_stores_out_of_range_values() {
        let mut config = GameConfig::default();
        config.apply(ConfigUpdate::MutationChance(3.5));
        config.apply(ConfigUpdate::GridBorderOpacity(-1.0));
        config.apply(ConfigUpdate::FlowerSize(0));

        assert_eq!(config.mutation_chance, 3.5);
        assert_eq!(config.grid_border_opacity, -1.0);
        assert_eq!(config.flower_size, 0);
    }

    #[test]
    fn test_reset_parameters_keeps_palette() {
        let palette = Palette::new(vec!["#ABCDEF".into()]).unwrap();
        let mut config = GameConfig {
            grid_size: 3,
            mutation_chance: 1.0,
            flower_colors: palette.clone(),
            ..Default::default()
        };

        config.reset_parameters();

        assert_eq!(config.grid_size, 20);
        assert_eq!(config.mutation_chance, 0.01);
        assert_eq!(config.flower_colors, palette);
    }

    #[test]
    fn test_config_key_parsing() {
        assert_eq!("MUTATION_CHANCE".parse::<ConfigKey>().unwrap(), ConfigKey::MutationChance);
        assert_eq!("flower-size".parse::<ConfigKey>().unwrap(), ConfigKey::FlowerSize);
        assert!(matches!("FLOWER_COLORS".parse::<ConfigKey>(), Err(Error::NotFound(_))));

        for key in ConfigKey::all() {
            assert_eq!(key.as_str().parse::<ConfigKey>().unwrap(), key);
        }
    }

    #[test]
    fn test_parse_value() {
        assert_eq!(
            ConfigKey::SpreadIntervalMs.parse_value("250").unwrap(),
            ConfigUpdate::SpreadIntervalMs(250)
        );
        assert_eq!(
            ConfigKey::FlowerScale.parse_value(" 1.25 ").unwrap(),
            ConfigUpdate::FlowerScale(1.25)
        );
        assert!(matches!(
            ConfigKey::GridSize.parse_value("-4"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            ConfigKey::MutationChance.parse_value("often"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_unsigned_parameters_take_zero_but_not_negatives() {
        assert_eq!(
            ConfigKey::GridSize.parse_value("0").unwrap(),
            ConfigUpdate::GridSize(0)
        );
        assert_eq!(
            ConfigKey::FlowerSize.parse_value("0").unwrap(),
            ConfigUpdate::FlowerSize(0)
        );
        for key in [ConfigKey::GridSize, ConfigKey::FlowerSize, ConfigKey::SpreadIntervalMs] {
            assert!(matches!(key.parse_value("-4"), Err(Error::Validation(_))));
        }

        let mut config = GameConfig::default();
        config.apply(ConfigUpdate::GridSize(0));
        assert_eq!(config.grid_size, 0);
    }

    #[test]
    fn test_update_key_round_trip() {
        let update = ConfigUpdate::RespawnChanceWhenEmpty(0.3);
        assert_eq!(update.key(), ConfigKey::RespawnChanceWhenEmpty);
        assert_eq!(update.to_string(), "RESPAWN_CHANCE_WHEN_EMPTY=0.3");
    }

    #[test]
    fn test_runner_config_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("FLOWER_FIELD_STORAGE_DIR", "/tmp/flowers"),
            ("FLOWER_FIELD_VIEWPORT", "800x450"),
            ("FLOWER_FIELD_SEED", "42"),
            ("FLOWER_FIELD_RENDER", "off"),
            ("FLOWER_FIELD_MAX_TICKS", "10"),
        ]
        .into_iter()
        .collect();

        let config = RunnerConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(config.storage_dir, PathBuf::from("/tmp/flowers"));
        assert_eq!((config.viewport_width, config.viewport_height), (800, 450));
        assert_eq!(config.seed, Some(42));
        assert!(!config.render);
        assert_eq!(config.max_ticks, Some(10));
    }

    #[test]
    fn test_runner_config_rejects_bad_viewport() {
        let result = RunnerConfig::from_lookup(|k| {
            (k == "FLOWER_FIELD_VIEWPORT").then(|| "wide".to_string())
        });
        assert!(matches!(result, Err(Error::Validation(_))));
    }
}
