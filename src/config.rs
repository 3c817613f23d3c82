//! Generator configuration
//!
//! All the knobs of the generation pipeline, validated up front and passed
//! explicitly to every stage. Can be loaded from a RON file; fields missing
//! from the file keep their defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::world::dungeon::{grid_area, MAX_CELLS};

/// Minimum grid height
pub const MIN_HEIGHT: i32 = 10;
/// Smallest room side
pub const MIN_ROOM_SIDE: i32 = 2;
/// Rooms must leave at least this many cells of the grid free
pub const ROOM_MARGIN: i32 = 6;

/// Configuration errors, all detected before any grid is allocated
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Map height must be at least {min}, got {height}")]
    HeightTooSmall { height: i32, min: i32 },

    #[error("Room {axis} range misordered: {min} > {max}")]
    RangeMisordered { axis: &'static str, min: i32, max: i32 },

    #[error("Maximum room {axis} can not be greater than {limit} [map {axis} - 6], got {max}")]
    RoomTooLarge { axis: &'static str, max: i32, limit: i32 },

    #[error("Minimum room {axis} can not be less than {limit}, got {min}")]
    RoomTooSmall { axis: &'static str, min: i32, limit: i32 },

    #[error("Map {height}x{width} is larger than {max} cells")]
    GridTooLarge { height: i32, width: i32, max: usize },

    #[error("Probability '{option}' must be within 0..=100, got {value}")]
    ProbabilityOutOfRange { option: &'static str, value: u32 },

    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Inclusive size range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: i32,
    pub max: i32,
}

impl SizeRange {
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    fn validate(&self, axis: &'static str, dimension: i32) -> Result<(), ConfigError> {
        if self.min > self.max {
            return Err(ConfigError::RangeMisordered {
                axis,
                min: self.min,
                max: self.max,
            });
        }
        if self.max > dimension - ROOM_MARGIN {
            return Err(ConfigError::RoomTooLarge {
                axis,
                max: self.max,
                limit: dimension - ROOM_MARGIN,
            });
        }
        if self.min < MIN_ROOM_SIDE {
            return Err(ConfigError::RoomTooSmall {
                axis,
                min: self.min,
                limit: MIN_ROOM_SIDE,
            });
        }
        Ok(())
    }
}

/// Parameters of one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub height: i32,
    pub width: i32,
    pub room_height: SizeRange,
    pub room_width: SizeRange,
    /// Room placement stops once this many rooms are carved...
    pub max_rooms: usize,
    /// ...or after this many placement attempts, whichever comes first
    pub max_room_attempts: usize,
    /// Percent chance the maze keeps carving in the same direction
    pub chance_maintain_direction: u32,
    /// Percent chance a redundant connector becomes an extra doorway instead of rock
    pub chance_extra_doorway: u32,
    /// Percent chance a dead end is spared by sparseness reduction
    pub chance_keep_dead_end: u32,
    /// Sparseness reduction pass cap, `None` runs until no dead ends remain
    pub max_sparseness_passes: Option<u32>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            height: 40,
            width: 60,
            room_height: SizeRange::new(3, 20),
            room_width: SizeRange::new(3, 20),
            max_rooms: 40,
            max_room_attempts: 300,
            chance_maintain_direction: 80,
            chance_extra_doorway: 5,
            chance_keep_dead_end: 5,
            max_sparseness_passes: Some(20),
        }
    }
}

impl GeneratorConfig {
    /// Small, quick dungeon used by demos and tests
    pub fn compact() -> Self {
        Self {
            height: 10,
            width: 30,
            room_height: SizeRange::new(3, 4),
            room_width: SizeRange::new(3, 8),
            max_room_attempts: 100,
            max_sparseness_passes: Some(5),
            ..Self::default()
        }
    }

    /// Check every option, failing on the first problem found
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.height < MIN_HEIGHT {
            return Err(ConfigError::HeightTooSmall {
                height: self.height,
                min: MIN_HEIGHT,
            });
        }
        self.room_height.validate("height", self.height)?;
        self.room_width.validate("width", self.width)?;
        if grid_area(self.height, self.width).is_none() {
            return Err(ConfigError::GridTooLarge {
                height: self.height,
                width: self.width,
                max: MAX_CELLS,
            });
        }

        let chances = [
            ("chance_maintain_direction", self.chance_maintain_direction),
            ("chance_extra_doorway", self.chance_extra_doorway),
            ("chance_keep_dead_end", self.chance_keep_dead_end),
        ];
        for (option, value) in chances {
            if value > 100 {
                return Err(ConfigError::ProbabilityOutOfRange { option, value });
            }
        }

        Ok(())
    }

    /// Parse and validate a RON document
    pub fn from_ron(source: &str) -> Result<Self, ConfigError> {
        let config: GeneratorConfig = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a RON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path)?;
        Self::from_ron(&source)
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(GeneratorConfig::default().validate().is_ok());
        assert!(GeneratorConfig::compact().validate().is_ok());
    }

    #[test]
    fn test_height_minimum() {
        let config = GeneratorConfig {
            height: 9,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::HeightTooSmall { height: 9, .. })
        ));
    }

    #[test]
    fn test_misordered_ranges() {
        let config = GeneratorConfig {
            room_width: SizeRange::new(6, 4),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::RangeMisordered { axis: "width", .. })
        ));
    }

    #[test]
    fn test_room_bounds() {
        let too_large = GeneratorConfig {
            height: 20,
            room_height: SizeRange::new(3, 15),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            too_large.validate(),
            Err(ConfigError::RoomTooLarge { axis: "height", limit: 14, .. })
        ));

        let too_small = GeneratorConfig {
            room_width: SizeRange::new(1, 4),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            too_small.validate(),
            Err(ConfigError::RoomTooSmall { axis: "width", .. })
        ));
    }

    #[test]
    fn test_grid_size_cap() {
        let config = GeneratorConfig {
            height: 100_000,
            width: 100_000,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::GridTooLarge { height: 100_000, .. })
        ));
    }

    #[test]
    fn test_probability_range() {
        let config = GeneratorConfig {
            chance_extra_doorway: 101,
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange { option: "chance_extra_doorway", .. })
        ));
    }

    #[test]
    fn test_partial_ron_keeps_defaults() {
        let config = GeneratorConfig::from_ron("(height: 30, max_rooms: 12, max_sparseness_passes: None)")
            .expect("valid config");
        assert_eq!(config.height, 30);
        assert_eq!(config.max_rooms, 12);
        assert_eq!(config.max_sparseness_passes, None);
        assert_eq!(config.width, GeneratorConfig::default().width);
    }

    #[test]
    fn test_ron_round_trip_and_load() {
        let config = GeneratorConfig::compact();
        let text = config.to_ron().unwrap();

        let path = std::env::temp_dir().join(format!("undercroft_config_{}.ron", std::process::id()));
        std::fs::write(&path, text).unwrap();
        let loaded = GeneratorConfig::load(&path);
        let _ = std::fs::remove_file(&path);

        assert_eq!(loaded.unwrap(), config);
    }

    #[test]
    fn test_invalid_ron_is_parse_error() {
        assert!(matches!(
            GeneratorConfig::from_ron("(height: \"tall\")"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            GeneratorConfig::load("/definitely/not/here.ron"),
            Err(ConfigError::Io(_))
        ));
    }
}
