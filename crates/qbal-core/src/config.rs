use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

fn default_host() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_username() -> String {
    "admin".to_string()
}

fn default_password() -> String {
    "adminadmin".to_string()
}

fn default_monitored_slots() -> Vec<usize> {
    (1..=10).collect()
}

fn default_candidate_slot() -> usize {
    12
}

fn default_full_check_interval() -> u64 {
    600
}

fn default_tick_interval() -> u64 {
    60
}

/// Global configuration loaded from `~/.config/qbal/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QbalConfig {
    /// qBittorrent Web UI base address.
    #[serde(default = "default_host")]
    pub qb_host: String,
    /// Web UI login name.
    #[serde(default = "default_username")]
    pub qb_username: String,
    /// Web UI password.
    #[serde(default = "default_password")]
    pub qb_password: String,
    /// 1-based queue positions checked for stalls and used as the
    /// weakest-slot comparison set. May be empty.
    #[serde(default = "default_monitored_slots")]
    pub monitored_slots: Vec<usize>,
    /// The single 1-based position evaluated for promotion each tick.
    #[serde(default = "default_candidate_slot")]
    pub candidate_slot: usize,
    /// Seconds between full-window stall checks. Must be an integer
    /// multiple of `tick_interval_secs`.
    #[serde(default = "default_full_check_interval")]
    pub full_check_interval_secs: u64,
    /// Seconds between ticks (history update + frequent check).
    #[serde(default = "default_tick_interval")]
    pub tick_interval_secs: u64,
}

impl Default for QbalConfig {
    fn default() -> Self {
        Self {
            qb_host: default_host(),
            qb_username: default_username(),
            qb_password: default_password(),
            monitored_slots: default_monitored_slots(),
            candidate_slot: default_candidate_slot(),
            full_check_interval_secs: default_full_check_interval(),
            tick_interval_secs: default_tick_interval(),
        }
    }
}

impl QbalConfig {
    /// Checks tuning values. Any violation is fatal at startup.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_interval_secs == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.full_check_interval_secs == 0 {
            return Err(ConfigError::ZeroFullCheckInterval);
        }
        if self.full_check_interval_secs % self.tick_interval_secs != 0 {
            return Err(ConfigError::IntervalMismatch {
                full: self.full_check_interval_secs,
                tick: self.tick_interval_secs,
            });
        }
        if self.monitored_slots.iter().any(|&s| s == 0) {
            return Err(ConfigError::ZeroSlot {
                field: "monitored_slots",
            });
        }
        if self.candidate_slot == 0 {
            return Err(ConfigError::ZeroSlot {
                field: "candidate_slot",
            });
        }
        url::Url::parse(&self.qb_host)?;
        Ok(())
    }

    /// Ratio of the two intervals: the full-window check runs every Kth tick.
    pub fn full_check_every_ticks(&self) -> u64 {
        self.full_check_interval_secs / self.tick_interval_secs
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("qbal")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<QbalConfig> {
    let path = config_path()?;
    load_or_init_at(&path)
}

/// Same as [`load_or_init`] but against an explicit path (`--config`).
pub fn load_or_init_at(path: &Path) -> Result<QbalConfig> {
    if !path.exists() {
        let default_cfg = QbalConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: QbalConfig = toml::from_str(&data)?;
    Ok(cfg)
}
