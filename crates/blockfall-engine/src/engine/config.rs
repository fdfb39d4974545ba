use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MIN_BOARD_HEIGHT, MIN_BOARD_WIDTH};

/// Reason a [`GameConfig`] was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display(
        "board width must be between {} and {}, got {width}",
        MIN_BOARD_WIDTH,
        MAX_BOARD_WIDTH
    )]
    BoardWidth { width: usize },
    #[display(
        "board height must be between {} and {}, got {height}",
        MIN_BOARD_HEIGHT,
        MAX_BOARD_HEIGHT
    )]
    BoardHeight { height: usize },
    #[display("gravity interval must be greater than zero")]
    GravityInterval,
}

/// Game constants, fixed for the lifetime of a session.
///
/// Missing fields take their default when deserialized, so a configuration file only
/// needs the values it changes.
///
/// # Example
///
/// ```
/// use blockfall_engine::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{ "board_width": 10 }"#).unwrap();
/// assert_eq!(config.board_width, 10);
/// assert_eq!(config.board_height, 30);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub board_width: usize,
    pub board_height: usize,
    /// Points added for each cleared row.
    pub score_per_row: u64,
    /// Milliseconds between automatic downward moves.
    pub gravity_interval_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: 15,
            board_height: 30,
            score_per_row: 10,
            gravity_interval_ms: 1000,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_BOARD_WIDTH..=MAX_BOARD_WIDTH).contains(&self.board_width) {
            return Err(ConfigError::BoardWidth {
                width: self.board_width,
            });
        }
        if !(MIN_BOARD_HEIGHT..=MAX_BOARD_HEIGHT).contains(&self.board_height) {
            return Err(ConfigError::BoardHeight {
                height: self.board_height,
            });
        }
        if self.gravity_interval_ms == 0 {
            return Err(ConfigError::GravityInterval);
        }
        Ok(())
    }

    #[must_use]
    pub const fn gravity_interval(&self) -> Duration {
        Duration::from_millis(self.gravity_interval_ms)
    }
}
