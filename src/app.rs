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

use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::defaults::apply_default_visibility;
use crate::provider::ProviderSession;
use crate::refresh::{RefreshEngine, TickOutcome, ViewMode};
use crate::tree::{HardwareId, SensorId};
use crate::visibility::VisibilityStore;

/// Overlay shown on top of the active view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Dialog {
    None,
    /// Hardware visibility toggles.
    Configure,
    /// Sensor visibility toggles for one hardware entry.
    Sensors(HardwareId),
}

pub struct App {
    pub session: ProviderSession,
    pub store: VisibilityStore,
    pub engine: RefreshEngine,
    pub view: ViewMode,
    // list view
    pub focused: Option<HardwareId>,
    pub nav_idx: usize,
    // dialogs
    pub dialog: Dialog,
    pub config_idx: usize,
    pub sensor_idx: usize,
    pub status: String,
    // header
    pub cpu_name: String,
    pub mb_name: String,
}

impl App {
    /// Seed the dashboard selection from the session's tree and get ready for
    /// the first tick.
    pub fn new(session: ProviderSession, interval: Duration, view: ViewMode) -> Self {
        let mut store = VisibilityStore::new();
        apply_default_visibility(&mut store, session.tree());
        let status = match session.open_error() {
            Some(e) => format!("Sensor provider unavailable: {e}"),
            None => format!("{} hardware item(s) via {}", session.tree().len(), session.name()),
        };
        let mut app = Self {
            session,
            store,
            engine: RefreshEngine::new(interval),
            view,
            focused: None,
            nav_idx: 0,
            dialog: Dialog::None,
            config_idx: 0,
            sensor_idx: 0,
            status,
            cpu_name: String::new(),
            mb_name: String::new(),
        };
        if app.view == ViewMode::List {
            app.ensure_focus();
        }
        app
    }

    /// Top-level hardware ids in tree order.
    pub fn hardware_ids(&self) -> Vec<HardwareId> {
        self.session.tree().hardware().iter().map(|node| node.id.clone()).collect()
    }

    /// Run a refresh tick when one is due.
    pub fn tick_if_due(&mut self, now: Instant) -> Option<TickOutcome> {
        if !self.engine.is_due(now) {
            return None;
        }
        let outcome = self
            .engine
            .tick(&mut self.session, &self.store, self.view, self.focused.as_ref());
        Some(outcome)
    }

    pub fn refresh_now(&mut self) {
        self.engine.request_refresh();
    }

    pub fn switch_view(&mut self) {
        self.view = self.view.toggled();
        if self.view == ViewMode::List {
            self.ensure_focus();
        }
        self.refresh_now();
    }

    fn ensure_focus(&mut self) {
        if self.focused.is_some() {
            return;
        }
        let ids = self.hardware_ids();
        self.nav_idx = 0;
        self.focused = ids.into_iter().next();
    }

    pub fn move_nav(&mut self, down: bool) {
        let ids = self.hardware_ids();
        if ids.is_empty() {
            return;
        }
        self.nav_idx = step(self.nav_idx, ids.len(), down);
        self.focused = ids.get(self.nav_idx).cloned();
        self.refresh_now();
    }

    // ---------- configuration dialogs ----------

    /// Open the hardware dialog, first picking up any hardware or sensors that
    /// appeared since startup.
    pub fn open_configure(&mut self) {
        if self.session.is_available() {
            if let Err(e) = self.session.update_all() {
                warn!(error = %e, "refresh before configuration rescan failed");
            }
        }
        let added = self.store.rescan(self.session.tree());
        if added > 0 {
            info!(added, "configuration rescan found new sensors");
        }
        self.config_idx = self.config_idx.min(self.store.len().saturating_sub(1));
        self.dialog = Dialog::Configure;
    }

    pub fn selected_hardware(&self) -> Option<&HardwareId> {
        self.store.entries().nth(self.config_idx).map(|entry| &entry.id)
    }

    fn selected_sensor(&self, hardware_id: &HardwareId) -> Option<SensorId> {
        self.store
            .get(hardware_id)?
            .sensors()
            .get(self.sensor_idx)
            .map(|sensor| sensor.id.clone())
    }

    pub fn move_dialog(&mut self, down: bool) {
        match &self.dialog {
            Dialog::None => {}
            Dialog::Configure => {
                self.config_idx = step(self.config_idx, self.store.len(), down);
            }
            Dialog::Sensors(id) => {
                let len = self.store.get(id).map_or(0, |entry| entry.sensors().len());
                self.sensor_idx = step(self.sensor_idx, len, down);
            }
        }
    }

    pub fn toggle_selected(&mut self) {
        match self.dialog.clone() {
            Dialog::None => {}
            Dialog::Configure => {
                if let Some(id) = self.selected_hardware().cloned() {
                    self.store.toggle_hardware(&id);
                }
            }
            Dialog::Sensors(id) => {
                if let Some(sensor_id) = self.selected_sensor(&id) {
                    self.store.toggle_sensor(&id, &sensor_id);
                }
            }
        }
    }

    pub fn open_sensor_dialog(&mut self) {
        if let Some(id) = self.selected_hardware().cloned() {
            self.sensor_idx = 0;
            self.dialog = Dialog::Sensors(id);
        }
    }

    /// Step back one dialog level. Leaving the dialogs refreshes the view.
    pub fn close_dialog(&mut self) {
        self.dialog = match self.dialog {
            Dialog::Sensors(_) => Dialog::Configure,
            Dialog::Configure | Dialog::None => {
                self.refresh_now();
                Dialog::None
            }
        };
    }

    pub fn status_line(&self, now: Instant) -> String {
        let provider = if self.session.is_available() {
            format!("{}: ok", self.session.name())
        } else {
            format!("{}: unavailable", self.session.name())
        };
        let updated = match self.engine.last_success() {
            Some(t) => format!("updated {:.1}s ago", now.saturating_duration_since(t).as_secs_f64()),
            None => "not updated yet".to_string(),
        };
        let mut line = format!(" {provider} | {updated} | view: {} ", self.view.title());
        if let Some(e) = self.engine.last_error() {
            line.push_str(&format!("| last refresh failed: {e} "));
        }
        line
    }
}

fn step(idx: usize, len: usize, down: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if down {
        (idx + 1).min(len - 1)
    } else {
        idx.saturating_sub(1)
    }
}
