//! Tile edge lengths.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{Result, TilingError};

/// Edge length of the cube fed to the network.
pub const DEFAULT_BOX_SIZE: usize = 64;

/// Edge length of the trusted centre of each cube.
pub const DEFAULT_CORE_SIZE: usize = 50;

/// Tile geometry shared by the splitter and the stitcher.
///
/// `core_size` is both the stride between tile origins and the edge of the
/// block each tile contributes to the output. The remaining
/// `box_size - core_size` samples are split evenly into a margin on each
/// side, so the difference must be even.
///
/// Fields are private so every value in circulation has passed
/// [`TileConfig::validate`]; deserializing validates as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawTileConfig")]
pub struct TileConfig {
    box_size: usize,
    core_size: usize,
}

/// Unchecked form read from JSON before validation.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct RawTileConfig {
    box_size: usize,
    core_size: usize,
}

impl Default for RawTileConfig {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            core_size: DEFAULT_CORE_SIZE,
        }
    }
}

impl TryFrom<RawTileConfig> for TileConfig {
    type Error = TilingError;

    fn try_from(raw: RawTileConfig) -> Result<Self> {
        Self::new(raw.box_size, raw.core_size)
    }
}

impl TileConfig {
    /// Create a validated configuration.
    pub fn new(box_size: usize, core_size: usize) -> Result<Self> {
        let config = Self {
            box_size,
            core_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a configuration from JSON. Missing fields take the defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawTileConfig = serde_json::from_str(json)?;
        Self::try_from(raw)
    }

    /// Edge length of the cube fed to the network.
    pub fn box_size(&self) -> usize {
        self.box_size
    }

    /// Edge length of the block each tile contributes to the output.
    pub fn core_size(&self) -> usize {
        self.core_size
    }

    /// Check `box_size > core_size > 0` and an even margin.
    pub fn validate(&self) -> Result<()> {
        let reason = if self.core_size == 0 {
            Some("core_size must be positive".to_string())
        } else if self.box_size <= self.core_size {
            Some(format!(
                "box_size ({}) must exceed core_size ({})",
                self.box_size, self.core_size
            ))
        } else if (self.box_size - self.core_size) % 2 != 0 {
            Some(format!(
                "box_size - core_size ({}) must be even",
                self.box_size - self.core_size
            ))
        } else {
            None
        };

        match reason {
            Some(reason) => {
                warn!("Rejecting tile config {:?}: {}", self, reason);
                Err(TilingError::InvalidConfig(reason))
            }
            None => Ok(()),
        }
    }

    /// Samples discarded on each side of a tile.
    pub fn margin(&self) -> usize {
        self.box_size.saturating_sub(self.core_size) / 2
    }

    /// Padded coordinate of the first tile origin on every axis.
    pub fn start(&self) -> usize {
        self.box_size - self.margin()
    }
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            box_size: DEFAULT_BOX_SIZE,
            core_size: DEFAULT_CORE_SIZE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_geometry() {
        let config = TileConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.margin(), 7);
        assert_eq!(config.start(), 57);
    }

    #[test]
    fn test_rejects_odd_margin() {
        let err = TileConfig::new(64, 51).unwrap_err();
        assert!(matches!(err, TilingError::InvalidConfig(_)));
    }

    #[test]
    fn test_rejects_core_not_smaller() {
        assert!(TileConfig::new(50, 50).is_err());
        assert!(TileConfig::new(40, 50).is_err());
    }

    #[test]
    fn test_rejects_zero_core() {
        assert!(TileConfig::new(8, 0).is_err());
    }

    #[test]
    fn test_small_config() {
        let config = TileConfig::new(8, 4).unwrap();
        assert_eq!(config.margin(), 2);
        assert_eq!(config.start(), 6);
    }

    #[test]
    fn test_from_json_partial() {
        let config = TileConfig::from_json_str(r#"{ "core_size": 48 }"#).unwrap();
        assert_eq!(config.box_size(), 64);
        assert_eq!(config.core_size(), 48);
    }

    #[test]
    fn test_deserialize_validates() {
        let config: TileConfig =
            serde_json::from_str(r#"{ "box_size": 8, "core_size": 4 }"#).unwrap();
        assert_eq!(config, TileConfig::new(8, 4).unwrap());

        assert!(serde_json::from_str::<TileConfig>(r#"{ "box_size": 9, "core_size": 4 }"#).is_err());
        assert!(serde_json::from_str::<TileConfig>(r#"{ "core_size": 0 }"#).is_err());
    }

    #[test]
    fn test_serialize_round_trips() {
        let config = TileConfig::new(12, 6).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(TileConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_from_json_invalid_values() {
        let err = TileConfig::from_json_str(r#"{ "box_size": 10, "core_size": 7 }"#).unwrap_err();
        assert!(matches!(err, TilingError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_json_malformed() {
        let err = TileConfig::from_json_str("{ box_size: ").unwrap_err();
        assert!(matches!(err, TilingError::ConfigParse(_)));
    }
}
