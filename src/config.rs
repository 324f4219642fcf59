use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::engine::ProgressPolicy;
use crate::session::EndPolicy;
use crate::session::NavigatorOptions;

const MIN_TICK_RATE_MS: u64 = 10;
const MAX_TICK_RATE_MS: u64 = 1000;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub progress_policy: ProgressPolicy,
    #[serde(default)]
    pub end_policy: EndPolicy,
    #[serde(default = "default_clear_input_on_failure")]
    pub clear_input_on_failure: bool,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons_dir: Option<PathBuf>,
    #[serde(default = "default_beacon_enabled")]
    pub beacon_enabled: bool,
    #[serde(default = "default_beacon_url")]
    pub beacon_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_url: Option<String>,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_clear_input_on_failure() -> bool {
    true
}
fn default_tick_rate_ms() -> u64 {
    33
}
fn default_beacon_enabled() -> bool {
    false
}
fn default_beacon_url() -> String {
    "http://localhost:8080/beacon".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            progress_policy: ProgressPolicy::default(),
            end_policy: EndPolicy::default(),
            clear_input_on_failure: default_clear_input_on_failure(),
            tick_rate_ms: default_tick_rate_ms(),
            lessons_dir: None,
            beacon_enabled: default_beacon_enabled(),
            beacon_url: default_beacon_url(),
            summary_url: None,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Missing file means defaults; a file that does not parse is an error.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        config.validate();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellhacked")
            .join("config.toml")
    }

    pub fn log_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("shellhacked")
            .join("shellhacked.log")
    }

    /// Clamp values that would make the event loop misbehave.
    pub fn validate(&mut self) {
        self.tick_rate_ms = self.tick_rate_ms.clamp(MIN_TICK_RATE_MS, MAX_TICK_RATE_MS);
        if self.theme.trim().is_empty() {
            self.theme = default_theme();
        }
    }

    pub fn navigator_options(&self) -> NavigatorOptions {
        NavigatorOptions {
            progress_policy: self.progress_policy,
            end_policy: self.end_policy,
            clear_input_on_failure: self.clear_input_on_failure,
        }
    }
}
