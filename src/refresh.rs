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

//! Refresh engine
//!
//! Each tick re-reads live values from the provider session and rebuilds one
//! of two projections:
//!
//! - the **list** projection: every displayable reading of one focused
//!   hardware node as fixed-width text lines, grouped under sub-hardware
//!   headers;
//! - the **dashboard** projection: formatted values for every
//!   (hardware, sensor) pair the visibility store marks as shown.
//!
//! Ticks are fixed-delay: the next one is due `interval` after the previous
//! one finished. A failed tick is logged and counted; the projections from the
//! last good tick stay in place.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ProviderError, RefreshError};
use crate::format::{format_value, FormattedValue};
use crate::provider::ProviderSession;
use crate::tree::{HardwareId, HardwareNode, SensorId};
use crate::visibility::VisibilityStore;

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(2000);

/// Width the sensor name column is truncated and padded to.
pub const NAME_WIDTH: usize = 30;
/// Width the value column is right-aligned to.
pub const VALUE_WIDTH: usize = 8;

pub const NO_SENSORS_SUBCOMPONENT: &str = "(No relevant sensors for this sub-component)";
pub const NO_SENSORS_COMPONENT: &str = "(No relevant sensors of interest found for this component)";
pub const EMPTY_LIST_MESSAGE: &str = "No sensor data to display.";

#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Dashboard,
    List,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Dashboard => ViewMode::List,
            ViewMode::List => ViewMode::Dashboard,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ViewMode::Dashboard => "Dashboard",
            ViewMode::List => "List",
        }
    }
}

// ---------- list projection ----------

/// `<name>: <value> <unit>` with the name cut to [`NAME_WIDTH`] characters.
fn sensor_line(indent: &str, name: &str, value: &FormattedValue) -> String {
    let name: String = name.chars().take(NAME_WIDTH).collect();
    format!(
        "{indent}{name:<name_w$}: {number:>value_w$} {unit}",
        number = value.number,
        unit = value.unit,
        name_w = NAME_WIDTH,
        value_w = VALUE_WIDTH,
    )
}

/// Render `node` and its sub-hardware. Returns the lines and whether any
/// sensor anywhere in the subtree produced one.
fn render_subtree(node: &HardwareNode, level: usize) -> (Vec<String>, bool) {
    let indent = "  ".repeat(level);
    let sensor_indent = "  ".repeat(level + 1);
    let mut lines = Vec::new();

    let mut direct = false;
    for sensor in &node.sensors {
        if sensor.value.is_none() || !sensor.category.is_displayable() {
            continue;
        }
        let value = format_value(sensor.category, sensor.value);
        lines.push(sensor_line(&sensor_indent, &sensor.name, &value));
        direct = true;
    }

    let mut nested = false;
    for child in &node.children {
        lines.push(format!("{indent}  -- {} ({}) --", child.name, child.category));
        let (child_lines, child_has_content) = render_subtree(child, level + 1);
        if child_has_content {
            lines.extend(child_lines);
            nested = true;
        } else {
            lines.push(format!("{indent}    {NO_SENSORS_SUBCOMPONENT}"));
        }
    }

    if level == 0 && !direct && node.children.is_empty() {
        lines.push(format!("{indent}  {NO_SENSORS_COMPONENT}"));
    }
    (lines, direct || nested)
}

/// List projection for one hardware node, using its current values.
pub fn list_lines(node: &HardwareNode) -> Vec<String> {
    render_subtree(node, 0).0
}

// ---------- dashboard projection ----------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardRow {
    pub sensor_id: SensorId,
    /// Raw sensor name.
    pub label: String,
    pub value: FormattedValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSection {
    pub hardware_id: HardwareId,
    pub name: String,
    pub rows: Vec<DashboardRow>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dashboard {
    pub sections: Vec<DashboardSection>,
}

impl Dashboard {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn value(&self, hardware_id: &HardwareId, sensor_id: &SensorId) -> Option<&FormattedValue> {
        self.sections
            .iter()
            .find(|section| &section.hardware_id == hardware_id)?
            .rows
            .iter()
            .find(|row| &row.sensor_id == sensor_id)
            .map(|row| &row.value)
    }
}

/// Rebuild the dashboard from the store's visible entries. Hardware the
/// session cannot reach renders every visible sensor as the sentinel.
pub fn build_dashboard(
    session: &mut ProviderSession,
    store: &VisibilityStore,
) -> Result<Dashboard, RefreshError> {
    let mut sections = Vec::new();

    for hardware_id in store.visible_hardware() {
        let Some(entry) = store.get(hardware_id) else { continue };
        let visible = store.visible_sensors(hardware_id);

        let live = match session.update(hardware_id) {
            Ok(node) => Some(node),
            Err(ProviderError::Unavailable(_)) | Err(ProviderError::UnknownHardware(_)) => None,
            Err(e) => return Err(e.into()),
        };

        let rows = visible
            .into_iter()
            .map(|sensor_id| {
                let value = live
                    .and_then(|node| node.find_sensor(sensor_id))
                    .map(|sensor| format_value(sensor.category, sensor.value))
                    .unwrap_or_else(FormattedValue::sentinel);
                let label = entry
                    .sensor(sensor_id)
                    .map(|s| s.name.clone())
                    .unwrap_or_else(|| sensor_id.to_string());
                DashboardRow { sensor_id: sensor_id.clone(), label, value }
            })
            .collect();

        sections.push(DashboardSection {
            hardware_id: hardware_id.clone(),
            name: entry.name.clone(),
            rows,
        });
    }

    Ok(Dashboard { sections })
}

// ---------- engine ----------

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    Refreshed,
    Failed,
}

#[derive(Debug)]
pub struct RefreshEngine {
    interval: Duration,
    last_tick: Option<Instant>,
    last_success: Option<Instant>,
    list: Vec<String>,
    dashboard: Dashboard,
    last_error: Option<String>,
    ticks: u64,
    failures: u64,
}

impl Default for RefreshEngine {
    fn default() -> Self {
        Self::new(DEFAULT_REFRESH_INTERVAL)
    }
}

impl RefreshEngine {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_tick: None,
            last_success: None,
            list: Vec::new(),
            dashboard: Dashboard::default(),
            last_error: None,
            ticks: 0,
            failures: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// True when no tick has run yet or `interval` has passed since the last
    /// one completed.
    pub fn is_due(&self, now: Instant) -> bool {
        self.time_until_due(now).is_zero()
    }

    pub fn time_until_due(&self, now: Instant) -> Duration {
        match self.last_tick {
            Some(last) => self.interval.saturating_sub(now.saturating_duration_since(last)),
            None => Duration::ZERO,
        }
    }

    /// Make the next tick due immediately.
    pub fn request_refresh(&mut self) {
        self.last_tick = None;
    }

    /// Run one refresh for the active view. Never fails: errors are logged,
    /// counted and kept in [`last_error`](Self::last_error).
    pub fn tick(
        &mut self,
        session: &mut ProviderSession,
        store: &VisibilityStore,
        mode: ViewMode,
        focused: Option<&HardwareId>,
    ) -> TickOutcome {
        let result = match mode {
            ViewMode::Dashboard => self.refresh_dashboard(session, store),
            ViewMode::List => self.refresh_list(session, focused),
        };
        self.ticks += 1;

        let outcome = match result {
            Ok(()) => {
                self.last_error = None;
                self.last_success = Some(Instant::now());
                TickOutcome::Refreshed
            }
            Err(e) => {
                self.failures += 1;
                warn!(error = %e, view = mode.title(), failures = self.failures, "refresh tick failed");
                self.last_error = Some(e.to_string());
                TickOutcome::Failed
            }
        };
        // fixed delay: schedule from completion
        self.last_tick = Some(Instant::now());
        outcome
    }

    fn refresh_dashboard(
        &mut self,
        session: &mut ProviderSession,
        store: &VisibilityStore,
    ) -> Result<(), RefreshError> {
        self.dashboard = build_dashboard(session, store)?;
        debug!(sections = self.dashboard.sections.len(), "dashboard refreshed");
        Ok(())
    }

    fn refresh_list(
        &mut self,
        session: &mut ProviderSession,
        focused: Option<&HardwareId>,
    ) -> Result<(), RefreshError> {
        let Some(id) = focused else {
            self.list.clear();
            return Ok(());
        };
        self.list = match session.update(id) {
            Ok(node) => list_lines(node),
            Err(ProviderError::Unavailable(_)) | Err(ProviderError::UnknownHardware(_)) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        debug!(hardware_id = %id, lines = self.list.len(), "list refreshed");
        Ok(())
    }

    pub fn list(&self) -> &[String] {
        &self.list
    }

    /// The list projection as display text, with the empty-list message when
    /// there is nothing to show.
    pub fn list_text(&self) -> Vec<String> {
        if self.list.is_empty() {
            vec![EMPTY_LIST_MESSAGE.to_string()]
        } else {
            self.list.clone()
        }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn last_success(&self) -> Option<Instant> {
        self.last_success
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }
}
