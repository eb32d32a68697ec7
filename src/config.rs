use std::path::Path;
use std::time::Duration;

use crate::ai::LineScoring;
use crate::error::ConfigError;
use crate::game::Player;

/// Deepest lookahead accepted from configuration.
pub const MAX_SEARCH_DEPTH: usize = 8;
/// Longest accepted think delay.
pub const MAX_THINK_MS: u64 = 10_000;

/// Computer opponent settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Plies searched past the computer's own move. 0 = win check plus one
    /// level of evaluation.
    pub max_depth: usize,
    /// Shortest time the computer takes per move, in milliseconds.
    pub min_think_ms: u64,
    pub line_scoring: LineScoring,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            max_depth: 0,
            min_think_ms: 500,
            line_scoring: LineScoring::Horizontal,
        }
    }
}

impl SearchConfig {
    pub fn min_think(&self) -> Duration {
        Duration::from_millis(self.min_think_ms)
    }
}

/// Match settings.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// The side the human plays.
    pub human: Player,
    pub human_starts: bool,
    /// Control loop period in milliseconds.
    pub tick_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            human: Player::Red,
            human_starts: true,
            tick_ms: 50,
        }
    }
}

impl GameConfig {
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub game: GameConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            tracing::warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.max_depth > MAX_SEARCH_DEPTH {
            return Err(ConfigError::Validation(format!(
                "search.max_depth must be <= {MAX_SEARCH_DEPTH}"
            )));
        }
        if self.search.min_think_ms > MAX_THINK_MS {
            return Err(ConfigError::Validation(format!(
                "search.min_think_ms must be <= {MAX_THINK_MS}"
            )));
        }
        if self.game.tick_ms == 0 {
            return Err(ConfigError::Validation("game.tick_ms must be > 0".into()));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
