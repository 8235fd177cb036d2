// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.safewatch/config.toml`:
//! - `[api]`: where mutations are delivered and how long a call may take
//! - `[sync]`: retry bound, timer and probe periods, queue storage location
//!
//! `SAFEWATCH_API_URL`, `SAFEWATCH_API_TOKEN` and `SAFEWATCH_STATE_DIR`
//! override the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::sync::{EngineConfig, DEFAULT_MAX_RETRIES};

const WORK_DIR_NAME: &str = ".safewatch";
const CONFIG_FILE_NAME: &str = "config.toml";
const GITIGNORE_FILE_NAME: &str = ".gitignore";
const STATE_DIR_NAME: &str = "safewatch";

/// API base URL used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Sync engine and trigger settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSettings {
    /// Failed attempts before a record is evicted.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Period of the background drain timer.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Period of the connectivity probe used by `safewatch run`.
    #[serde(default = "default_probe_interval_secs")]
    pub probe_interval_secs: u64,
    /// Queue storage directory (relative to the project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state_dir: Option<String>,
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            max_retries: default_max_retries(),
            interval_secs: default_interval_secs(),
            probe_interval_secs: default_probe_interval_secs(),
            state_dir: None,
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_interval_secs() -> u64 {
    30
}

fn default_probe_interval_secs() -> u64 {
    15
}

/// Project configuration stored in `.safewatch/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub sync: SyncSettings,
}

impl Config {
    /// Creates a configuration pointing at `api_url` (or the default).
    pub fn new(api_url: Option<&str>) -> Result<Self> {
        let mut config = Config::default();
        if let Some(url) = api_url {
            config.api.base_url = url.to_string();
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects values the engine cannot work with.
    pub fn validate(&self) -> Result<()> {
        let url = &self.api.base_url;
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(Error::InvalidApiUrl(url.clone()));
        }
        if self.sync.max_retries == 0 {
            return Err(Error::Config("sync.max_retries must be at least 1".to_string()));
        }
        if self.sync.interval_secs == 0 || self.sync.probe_interval_secs == 0 {
            return Err(Error::Config("sync intervals must be at least 1 second".to_string()));
        }
        Ok(())
    }

    /// Loads configuration from the given `.safewatch/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the given `.safewatch/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }

    /// Applies environment overrides. Values are passed in so callers and
    /// tests decide where they come from.
    pub fn with_overrides(mut self, api_url: Option<String>, api_token: Option<String>) -> Self {
        if let Some(url) = api_url {
            self.api.base_url = url;
        }
        if let Some(token) = api_token {
            self.api.token = Some(token);
        }
        self
    }

    pub fn sync_interval(&self) -> Duration {
        Duration::from_secs(self.sync.interval_secs)
    }

    pub fn probe_interval(&self) -> Duration {
        Duration::from_secs(self.sync.probe_interval_secs)
    }

    pub fn engine_config(&self, start_online: bool) -> EngineConfig {
        EngineConfig {
            max_retries: self.sync.max_retries,
            start_online,
        }
    }
}

/// Find the .safewatch directory by walking up from the current directory
pub fn find_work_dir() -> Result<PathBuf> {
    find_work_dir_from(&std::env::current_dir()?)
}

/// Find the .safewatch directory by walking up from `start`
pub fn find_work_dir_from(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Resolves where the queue is stored.
///
/// Precedence: `env_override`, then `sync.state_dir` from the config, then
/// `$XDG_STATE_HOME/safewatch`, then `~/.local/state/safewatch`, and finally
/// a `state/` directory inside the work dir.
pub fn resolve_state_dir(
    work_dir: &Path,
    config: &Config,
    env_override: Option<PathBuf>,
    xdg_state_home: Option<PathBuf>,
) -> PathBuf {
    if let Some(dir) = env_override {
        return dir;
    }
    if let Some(dir) = &config.sync.state_dir {
        let path = Path::new(dir);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        // Relative to work_dir's parent (the project root)
        return work_dir.parent().unwrap_or(work_dir).join(path);
    }
    if let Some(xdg) = xdg_state_home {
        return xdg.join(STATE_DIR_NAME);
    }
    match dirs::home_dir() {
        Some(home) => home.join(".local").join("state").join(STATE_DIR_NAME),
        None => work_dir.join("state"),
    }
}

/// Initialize a new .safewatch directory at the given path
pub fn init_work_dir(path: &Path, api_url: Option<&str>) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    let config = Config::new(api_url)?;
    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;
    write_gitignore(&work_dir)?;

    Ok(work_dir)
}

/// Write a .gitignore file to the work directory.
///
/// The config may carry an API token, so it stays out of version control
/// along with any project-local queue state.
pub fn write_gitignore(work_dir: &Path) -> Result<()> {
    let gitignore_path = work_dir.join(GITIGNORE_FILE_NAME);
    fs::write(
        &gitignore_path,
        "# Local configuration (may contain an API token)\nconfig.toml\n\n# Queue state\nstate/\n",
    )?;
    Ok(())
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
