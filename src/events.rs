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

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{App, Dialog};

/// Main event handler. Returns `Ok(true)` when the app should quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> anyhow::Result<bool> {
    let KeyEvent { code, modifiers, .. } = key_event;

    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    // Dialogs swallow every other key
    if app.dialog != Dialog::None {
        handle_dialog_events(app, code);
        return Ok(false);
    }

    handle_global_events(app, code)
}

fn handle_dialog_events(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Esc | KeyCode::Char('q') => app.close_dialog(),
        KeyCode::Up | KeyCode::Char('k') => app.move_dialog(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_dialog(true),
        KeyCode::Char(' ') => app.toggle_selected(),
        KeyCode::Enter => {
            if app.dialog == Dialog::Configure {
                app.open_sensor_dialog();
            } else {
                app.toggle_selected();
            }
        }
        _ => {}
    }
}

fn handle_global_events(app: &mut App, code: KeyCode) -> anyhow::Result<bool> {
    match code {
        KeyCode::Char('q') => return Ok(true),
        KeyCode::Tab | KeyCode::Char('v') => app.switch_view(),
        KeyCode::Char('c') => app.open_configure(),
        KeyCode::Char('r') => app.refresh_now(),
        KeyCode::Up | KeyCode::Char('k') => app.move_nav(false),
        KeyCode::Down | KeyCode::Char('j') => app.move_nav(true),
        _ => {}
    }
    Ok(false)
}
