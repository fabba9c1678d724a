/*
 * This file is part of Sensordeck.
 *
 * Copyright (C) 2025 Sensordeck contributors
 *
 * Sensordeck is free software: you can redistribute it and/or modify
 * it under the terms of the GNU General Public License as published by
 * the Free Software Foundation, either version 3 of the License, or
 * (at your option) any later version.
 *
 * Sensordeck is distributed in the hope that it will be useful,
 * but WITHOUT ANY WARRANTY; without even the implied warranty of
 * MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
 * GNU General Public License for more details.
 *
 * You should have received a copy of the GNU General Public License
 * along with Sensordeck. If not, see <https://www.gnu.org/licenses/>.
 */

//! Application settings stored as JSON.
//!
//! Only startup options live here. Dashboard visibility is rebuilt from the
//! default heuristic on every start and is never written to disk.

use std::env;
use std::fs;
use std::io;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConfigError;
use crate::hwmon::DEFAULT_HWMON_ROOT;
use crate::refresh::{ViewMode, DEFAULT_REFRESH_INTERVAL};

/// Accepted refresh intervals in milliseconds.
pub const REFRESH_INTERVAL_RANGE: RangeInclusive<u64> = 100..=60_000;

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Hwmon,
    Demo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppSettings {
    pub refresh_interval_ms: u64,
    pub hwmon_root: PathBuf,
    pub start_view: ViewMode,
    pub provider: ProviderKind,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            refresh_interval_ms: DEFAULT_REFRESH_INTERVAL.as_millis() as u64,
            hwmon_root: PathBuf::from(DEFAULT_HWMON_ROOT),
            start_view: ViewMode::default(),
            provider: ProviderKind::default(),
        }
    }
}

impl AppSettings {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh_interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !REFRESH_INTERVAL_RANGE.contains(&self.refresh_interval_ms) {
            return Err(ConfigError::Invalid(format!(
                "refresh_interval_ms must be between {} and {}, got {}",
                REFRESH_INTERVAL_RANGE.start(),
                REFRESH_INTERVAL_RANGE.end(),
                self.refresh_interval_ms
            )));
        }
        if self.hwmon_root.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("hwmon_root must not be empty".into()));
        }
        Ok(())
    }
}

pub fn config_path() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        return Path::new(&xdg).join("sensordeck").join("config.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".config").join("sensordeck").join("config.json");
    }
    PathBuf::from("/etc/sensordeck/config.json")
}

/// Load and validate settings from `path`. A missing file yields defaults.
pub fn load_settings(path: &Path) -> Result<AppSettings, ConfigError> {
    let data = match fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(AppSettings::default());
        }
        Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
    };
    let settings: AppSettings = serde_json::from_str(&data)?;
    settings.validate()?;
    Ok(settings)
}

pub fn save_settings(path: &Path, settings: &AppSettings) -> Result<(), ConfigError> {
    settings.validate()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write { path: parent.to_path_buf(), source })?;
    }
    let json = serde_json::to_string_pretty(settings)?;
    fs::write(path, json).map_err(|source| ConfigError::Write { path: path.to_path_buf(), source })
}
