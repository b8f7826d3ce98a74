use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::app::error::AppError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdbSettings {
    pub command_path: String,
    pub command_timeout: i32,
}

impl Default for AdbSettings {
    fn default() -> Self {
        Self {
            command_path: String::new(),
            command_timeout: 30,
        }
    }
}

/// Lab-settle delays and UI wait budgets. The defaults encode the timing the
/// BVT suite has historically shipped with; tune per lab, not per call site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeoutSettings {
    pub short_ms: u64,
    pub long_ms: u64,
    pub overview_wait_ms: u64,
    pub element_wait_ms: u64,
    pub poll_interval_ms: u64,
    pub swipe_step_ms: u64,
    pub idle_settle_ms: u64,
}

impl Default for TimeoutSettings {
    fn default() -> Self {
        Self {
            short_ms: 2_000,
            long_ms: 5_000,
            overview_wait_ms: 5_000,
            element_wait_ms: 2_500,
            poll_interval_ms: 250,
            swipe_step_ms: 5,
            idle_settle_ms: 1_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProbeSettings {
    pub ping_site: String,
    pub attempts: u32,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            ping_site: "www.google.com".to_string(),
            attempts: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub adb: AdbSettings,
    #[serde(default)]
    pub timeouts: TimeoutSettings,
    #[serde(default)]
    pub probe: ProbeSettings,
    #[serde(default)]
    pub version: String,
}

pub fn config_path() -> PathBuf {
    if let Ok(path) = std::env::var("DROIDBVT_CONFIG_PATH") {
        return PathBuf::from(path);
    }
    let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".droidbvt_config.json")
}

pub fn load_config() -> Result<AppConfig, AppError> {
    load_config_from_path(&config_path())
}

pub fn save_config(config: &AppConfig) -> Result<(), AppError> {
    save_config_to_path(config, &config_path())
}

pub fn load_config_from_path(path: &Path) -> Result<AppConfig, AppError> {
    if !path.exists() {
        return Ok(AppConfig::default());
    }
    let raw = fs::read_to_string(path)
        .map_err(|err| AppError::system(format!("Failed to read config: {err}"), ""))?;
    let config: AppConfig = serde_json::from_str(&raw)
        .map_err(|err| AppError::system(format!("Failed to parse config: {err}"), ""))?;
    Ok(validate_config(config))
}

pub fn save_config_to_path(config: &AppConfig, path: &Path) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let payload = serde_json::to_string_pretty(config)
        .map_err(|err| AppError::system(format!("Failed to serialize config: {err}"), ""))?;
    fs::write(path, payload)
        .map_err(|err| AppError::system(format!("Failed to write config: {err}"), ""))?;
    Ok(())
}

fn validate_config(mut config: AppConfig) -> AppConfig {
    if config.adb.command_timeout < 1 {
        config.adb.command_timeout = 30;
    }
    if config.timeouts.short_ms == 0 {
        config.timeouts.short_ms = 2_000;
    }
    if config.timeouts.long_ms == 0 {
        config.timeouts.long_ms = 5_000;
    }
    if config.timeouts.overview_wait_ms == 0 {
        config.timeouts.overview_wait_ms = 5_000;
    }
    if config.timeouts.element_wait_ms == 0 {
        config.timeouts.element_wait_ms = 2_500;
    }
    if config.timeouts.poll_interval_ms < 50 {
        config.timeouts.poll_interval_ms = 250;
    }
    if config.timeouts.swipe_step_ms == 0 {
        config.timeouts.swipe_step_ms = 5;
    }
    if config.timeouts.idle_settle_ms == 0 {
        config.timeouts.idle_settle_ms = 1_000;
    }
    if config.probe.attempts == 0 {
        config.probe.attempts = 10;
    }
    if config.probe.ping_site.trim().is_empty() {
        config.probe.ping_site = "www.google.com".to_string();
    }
    config
}
