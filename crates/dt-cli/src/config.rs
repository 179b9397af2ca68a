//! Configuration loading and management.

use std::path::{Path, PathBuf};

use dt_core::{LayoutOptions, MIN_HEIGHT_PERCENT, ValidationError};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// JSON-lines file read when `--input` is not given.
    pub events_path: PathBuf,

    /// Smallest rendered entry height, in percent of the day.
    pub min_height_percent: f64,

    /// Width taken off each lane for visual separation, in percent.
    pub lane_gutter_percent: f64,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            events_path: data_dir.join("events.jsonl"),
            min_height_percent: MIN_HEIGHT_PERCENT,
            lane_gutter_percent: 0.0,
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (DT_*)
        figment = figment.merge(Env::prefixed("DT_"));

        figment.extract()
    }

    /// Builds validated layout options, letting CLI flags override the config.
    pub fn layout_options(
        &self,
        min_height_percent: Option<f64>,
        lane_gutter_percent: Option<f64>,
    ) -> Result<LayoutOptions, ValidationError> {
        LayoutOptions::new(
            min_height_percent.unwrap_or(self.min_height_percent),
            lane_gutter_percent.unwrap_or(self.lane_gutter_percent),
        )
    }
}

/// Returns the platform-specific config directory for dt.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("dt"))
}

/// Returns the platform-specific data directory for dt.
///
/// On Linux: `~/.local/share/dt`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("dt"))
}
