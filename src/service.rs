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

//! Headless mode: print the active projection on every refresh tick.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use tracing::info;

use crate::provider::ProviderSession;
use crate::refresh::{Dashboard, RefreshEngine, ViewMode, NAME_WIDTH};
use crate::tree::HardwareId;
use crate::visibility::VisibilityStore;

const POLL_SLEEP: Duration = Duration::from_millis(50);

#[derive(Debug, Clone, Default)]
pub struct HeadlessOptions {
    pub mode: ViewMode,
    /// Hardware shown by the list view; the first hardware when unset.
    pub focus: Option<HardwareId>,
    /// Emit the dashboard as one JSON document per tick.
    pub json: bool,
    /// Stop after this many ticks.
    pub max_ticks: Option<u64>,
}

pub fn dashboard_lines(dashboard: &Dashboard) -> Vec<String> {
    if dashboard.is_empty() {
        return vec!["No hardware selected for the dashboard.".to_string()];
    }
    let mut lines = Vec::new();
    for section in &dashboard.sections {
        lines.push(format!("== {} ==", section.name));
        for row in &section.rows {
            let label: String = row.label.chars().take(NAME_WIDTH).collect();
            lines.push(format!("  {label:<width$}: {}", row.value, width = NAME_WIDTH));
        }
    }
    lines
}

fn write_tick(out: &mut impl Write, engine: &RefreshEngine, opts: &HeadlessOptions) -> Result<()> {
    match (opts.mode, opts.json) {
        (ViewMode::Dashboard, true) => {
            serde_json::to_writer(&mut *out, engine.dashboard()).context("serialize dashboard")?;
            writeln!(out)?;
        }
        (ViewMode::Dashboard, false) => {
            for line in dashboard_lines(engine.dashboard()) {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
        }
        (ViewMode::List, true) => {
            serde_json::to_writer(&mut *out, engine.list()).context("serialize list")?;
            writeln!(out)?;
        }
        (ViewMode::List, false) => {
            for line in engine.list_text() {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Refresh and print until `max_ticks` is reached (forever when unset) or the
/// output is closed.
pub fn run_headless(
    session: &mut ProviderSession,
    store: &VisibilityStore,
    engine: &mut RefreshEngine,
    opts: &HeadlessOptions,
    out: &mut impl Write,
) -> Result<()> {
    let focus = opts
        .focus
        .clone()
        .or_else(|| session.tree().hardware().first().map(|node| node.id.clone()));
    info!(
        view = opts.mode.title(),
        interval_ms = engine.interval().as_millis() as u64,
        "starting headless refresh loop"
    );

    let mut printed = 0;
    loop {
        if !engine.is_due(Instant::now()) {
            thread::sleep(POLL_SLEEP.min(engine.time_until_due(Instant::now())));
            continue;
        }
        engine.tick(session, store, opts.mode, focus.as_ref());
        write_tick(out, engine, opts).context("write refresh output")?;

        printed += 1;
        if opts.max_ticks.is_some_and(|max| printed >= max) {
            return Ok(());
        }
    }
}
