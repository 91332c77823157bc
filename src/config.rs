use anyhow::{anyhow, Context, Result};
use chrono::format::{Item, StrftimeItems};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::session::DEFAULT_MAX_HISTORY;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Config {
    pub watch: WatchConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct WatchConfig {
    // Refresh interval, e.g. "1s", "500ms", "2m"
    pub interval: String,
    pub max_history: usize,
    pub shell: String,
    pub diff: bool,
    pub notify: bool,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: "1s".to_string(),
            max_history: DEFAULT_MAX_HISTORY,
            shell: "sh".to_string(),
            diff: true,
            notify: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DisplayConfig {
    pub language: String,
    pub status_bar: bool,
    pub scrollbars: bool,
    // chrono format string used for history timestamps
    pub timestamp_format: String,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            language: "auto".to_string(),
            status_bar: true,
            scrollbars: true,
            timestamp_format: "%H:%M:%S".to_string(),
        }
    }
}

impl Config {
    /// Loads `~/.dtw/config.toml` when present, defaults otherwise.
    pub fn new() -> Result<Self> {
        let config_path = Self::get_config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.interval()?;
        if StrftimeItems::new(&config.display.timestamp_format).any(|item| item == Item::Error) {
            return Err(anyhow!(
                "display.timestamp_format: invalid format '{}'",
                config.display.timestamp_format
            ));
        }
        Ok(config)
    }

    fn get_config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".dtw")
            .join("config.toml")
    }

    pub fn interval(&self) -> Result<Duration> {
        parse_interval(&self.watch.interval).map_err(|e| anyhow!("watch.interval: {e}"))
    }

    pub fn get_effective_language(&self) -> String {
        if self.display.language == "auto" {
            // Try to get system language
            std::env::var("LANG")
                .unwrap_or_else(|_| "en_US".to_string())
                .split('.')
                .next()
                .unwrap_or("en")
                .to_string()
        } else {
            self.display.language.clone()
        }
    }
}

/// Parses `500ms`, `2s`, `1.5s`, `1m`, `1h` or bare seconds (`0.5`).
pub fn parse_interval(input: &str) -> Result<Duration, String> {
    let s = input.trim();
    let split = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    let (number, unit) = s.split_at(split);
    let value: f64 = number
        .parse()
        .map_err(|_| format!("invalid duration '{input}'"))?;
    let secs = match unit.trim() {
        "" | "s" => value,
        "ms" => value / 1000.0,
        "m" => value * 60.0,
        "h" => value * 3600.0,
        other => return Err(format!("unknown unit '{other}' in '{input}'")),
    };
    if !secs.is_finite() || secs <= 0.0 {
        return Err(format!("duration must be positive: '{input}'"));
    }
    Duration::try_from_secs_f64(secs).map_err(|_| format!("duration too large: '{input}'"))
}
