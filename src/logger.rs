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

//! tracing subscriber setup.
//!
//! The TUI owns the terminal, so in that mode events are written as JSON lines
//! to a log file. Headless runs log plain text to stderr.

use std::env;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive, e.g. `sensordeck=debug`.
pub const LOG_ENV: &str = "SENSORDECK_LOG";

const FALLBACK_LOG_PATH: &str = "/tmp/sensordeck_logs.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

pub fn default_log_path() -> PathBuf {
    if let Ok(state) = env::var("XDG_STATE_HOME") {
        return Path::new(&state).join("sensordeck").join("logs.json");
    }
    if let Ok(home) = env::var("HOME") {
        return Path::new(&home).join(".local").join("state").join("sensordeck").join("logs.json");
    }
    PathBuf::from(FALLBACK_LOG_PATH)
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

fn open_append(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

/// Open `path` for appending, falling back to `/tmp` when it is not writable.
/// Returns the file and the path actually used.
pub fn open_log_file(path: &Path) -> io::Result<(File, PathBuf)> {
    match open_append(path) {
        Ok(file) => Ok((file, path.to_path_buf())),
        Err(_) => {
            let fallback = PathBuf::from(FALLBACK_LOG_PATH);
            open_append(&fallback).map(|file| (file, fallback))
        }
    }
}

/// Install the global subscriber. Returns the log file path for file targets.
/// Calling it again after a subscriber is set has no effect.
pub fn init_logging(target: &LogTarget) -> io::Result<Option<PathBuf>> {
    match target {
        LogTarget::Stderr => {
            let _ = tracing_subscriber::fmt()
                .with_target(false)
                .with_level(true)
                .with_env_filter(env_filter())
                .with_writer(io::stderr)
                .try_init();
            Ok(None)
        }
        LogTarget::File(path) => {
            let (file, used) = open_log_file(path)?;
            let _ = tracing_subscriber::fmt()
                .json()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .try_init();
            Ok(Some(used))
        }
    }
}
