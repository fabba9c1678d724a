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

pub mod ui_components;
pub mod ui_main;

use std::time::Instant;

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::Frame;

use crate::app::{App, Dialog};
use crate::refresh::ViewMode;

pub fn ui(f: &mut Frame, app: &App) {
    let size = f.area();

    // header | view | status
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)])
        .split(size);

    ui_main::render_header(f, app, chunks[0]);
    match app.view {
        ViewMode::Dashboard => ui_main::render_dashboard(f, app, chunks[1]),
        ViewMode::List => ui_main::render_list_view(f, app, chunks[1]),
    }
    ui_main::render_status_bar(f, app, chunks[2], Instant::now());

    match &app.dialog {
        Dialog::None => {}
        Dialog::Configure => ui_components::render_configure_dialog(f, app, size),
        Dialog::Sensors(id) => ui_components::render_sensor_dialog(f, app, id, size),
    }
}
