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

//! Sensordeck - hardware sensor dashboard for the terminal
//!
//! This library discovers hardware monitoring sensors, decides which of them
//! the dashboard shows by default, and refreshes formatted readings for a
//! dashboard or an indented per-hardware list.

pub mod error;
pub mod tree;
pub mod format;
pub mod provider;
pub mod hwmon;
pub mod memory;
pub mod system;
pub mod defaults;
pub mod visibility;
pub mod refresh;
pub mod config;
pub mod logger;
pub mod service;
pub mod app;
pub mod events;
pub mod ui;

#[cfg(test)]
pub mod test_utils;
