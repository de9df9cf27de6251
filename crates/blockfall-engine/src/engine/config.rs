use serde::{Deserialize, Serialize};

/// Smallest width that keeps every spawn footprint inside the grid.
pub const MIN_WIDTH: u16 = 4;
/// Smallest height that keeps every spawn footprint inside the grid.
pub const MIN_HEIGHT: u16 = 2;
/// Largest accepted width or height.
pub const MAX_DIMENSION: u16 = 255;
/// Highest accepted starting level.
pub const MAX_START_LEVEL: usize = 15;
/// Highest accepted logical frame rate (one frame per millisecond).
pub const MAX_FRAME_RATE: u32 = 1000;

/// Rejected engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("invalid board size {width}x{height}: width must be 4..=255, height must be 2..=255")]
    InvalidDimensions { width: u16, height: u16 },
    #[display("invalid starting level {_0}: must be 0..=15")]
    InvalidLevel(#[error(not(source))] usize),
    #[display("invalid frame rate {_0}: must be 1..=1000")]
    InvalidFrameRate(#[error(not(source))] u32),
}

/// Initial configuration of a game.
///
/// Missing JSON fields fall back to the reference configuration: a 10×20
/// board, level 0, 60 logical frames per second.
///
/// # Example
///
/// ```
/// use blockfall_engine::EngineConfig;
///
/// let config: EngineConfig = serde_json::from_str(r#"{ "start_level": 4 }"#).unwrap();
/// assert_eq!(config.width, 10);
/// assert_eq!(config.start_level, 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Board width in cells.
    pub width: u16,
    /// Board height in cells.
    pub height: u16,
    /// Starting level; the game starts with `start_level * 3` completed lines.
    pub start_level: usize,
    /// Logical frames per second driving gravity.
    pub frame_rate: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: 10,
            height: 20,
            start_level: 0,
            frame_rate: 60,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_dimensions(self.width, self.height)?;
        if self.start_level > MAX_START_LEVEL {
            return Err(ConfigError::InvalidLevel(self.start_level));
        }
        if !(1..=MAX_FRAME_RATE).contains(&self.frame_rate) {
            return Err(ConfigError::InvalidFrameRate(self.frame_rate));
        }
        Ok(())
    }

    /// Completed line count implied by the starting level.
    #[must_use]
    pub fn initial_completed_lines(&self) -> usize {
        self.start_level * 3
    }
}

pub(crate) fn validate_dimensions(width: u16, height: u16) -> Result<(), ConfigError> {
    let width_ok = (MIN_WIDTH..=MAX_DIMENSION).contains(&width);
    let height_ok = (MIN_HEIGHT..=MAX_DIMENSION).contains(&height);
    if width_ok && height_ok {
        Ok(())
    } else {
        Err(ConfigError::InvalidDimensions { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(EngineConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_dimensions() {
        for (width, height) in [(0, 20), (10, 0), (3, 20), (10, 1), (256, 20), (10, 300)] {
            let config = EngineConfig {
                width,
                height,
                ..EngineConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidDimensions { width, height })
            );
        }
        assert!(validate_dimensions(MIN_WIDTH, MIN_HEIGHT).is_ok());
    }

    #[test]
    fn test_rejects_level() {
        let config = EngineConfig {
            start_level: 16,
            ..EngineConfig::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidLevel(16)));
    }

    #[test]
    fn test_dimension_error_wins_over_level() {
        let config = EngineConfig {
            width: 2,
            start_level: 99,
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_rejects_frame_rate() {
        for frame_rate in [0, 1001] {
            let config = EngineConfig {
                frame_rate,
                ..EngineConfig::default()
            };
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidFrameRate(frame_rate))
            );
        }
    }

    #[test]
    fn test_initial_completed_lines() {
        let config = EngineConfig {
            start_level: 5,
            ..EngineConfig::default()
        };
        assert_eq!(config.initial_completed_lines(), 15);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            ConfigError::InvalidLevel(20).to_string(),
            "invalid starting level 20: must be 0..=15"
        );
        assert!(
            ConfigError::InvalidDimensions {
                width: 1,
                height: 2
            }
            .to_string()
            .starts_with("invalid board size 1x2")
        );
    }

    #[test]
    fn test_json_round_trip() {
        let config = EngineConfig {
            width: 12,
            height: 24,
            start_level: 2,
            frame_rate: 30,
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(serde_json::from_str::<EngineConfig>(&json).unwrap(), config);
    }
}
