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

//! Error types shared across the sensor core.
//!
//! Missing sensor values are never errors: they are `None` readings and render
//! as the "N/A" sentinel. Unknown ids in visibility mutations are silent no-ops.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::tree::HardwareId;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("sensor provider unavailable: {0}")]
    Unavailable(String),
    #[error("unknown hardware id: {0}")]
    UnknownHardware(HardwareId),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },
    #[error("Parse error: {0}")]
    Parse(String),
}

#[derive(Error, Debug)]
pub enum RefreshError {
    #[error("provider error during refresh: {0}")]
    Provider(#[from] ProviderError),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write config {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
