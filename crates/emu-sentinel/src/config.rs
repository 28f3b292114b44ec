//! Emulator configuration.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};

/// Slowest and fastest supported game speed, in percent.
pub const MIN_GAME_SPEED: u32 = 80;
pub const MAX_GAME_SPEED: u32 = 200;
pub const DEFAULT_GAME_SPEED: u32 = 120;

/// Configuration for creating a [`Sentinel`](crate::Sentinel).
///
/// Every field has a default, so a config file only needs the keys it
/// changes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SentinelConfig {
    /// 48K ROM image (16,384 bytes).
    pub rom: PathBuf,
    /// 48K SNA snapshot of the game.
    pub snapshot: PathBuf,
    /// The sentinel and sentries never see the player.
    pub invisible: bool,
    /// Landscape 0000 gets no special treatment.
    pub true_0000: bool,
    /// Allow landscape numbers containing hex digits.
    pub hex_landscapes: bool,
    /// Game speed in percent. Clamped to 80..=200.
    pub game_speed: u32,
}

impl Default for SentinelConfig {
    fn default() -> Self {
        Self {
            rom: PathBuf::from("48.rom"),
            snapshot: PathBuf::from("sentinel.sna"),
            invisible: false,
            true_0000: false,
            hex_landscapes: false,
            game_speed: DEFAULT_GAME_SPEED,
        }
    }
}

impl SentinelConfig {
    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Parse config from JSON text.
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Game speed limited to the supported range.
    #[must_use]
    pub fn game_speed(&self) -> u32 {
        self.game_speed.clamp(MIN_GAME_SPEED, MAX_GAME_SPEED)
    }
}
