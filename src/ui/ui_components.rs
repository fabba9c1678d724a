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

use ratatui::layout::Rect;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::App;
use crate::tree::HardwareId;

/// Helper function to create a centered rectangle for popups
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_dialog_frame(f: &mut Frame, area: Rect, title: &str, hint: &str) -> Rect {
    f.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(title.to_string())
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);
    f.render_widget(Paragraph::new(hint.to_string()).style(Style::default().fg(Color::Gray)), parts[1]);
    parts[0]
}

/// Hardware picker: which entries get a dashboard block.
pub fn render_configure_dialog(f: &mut Frame, app: &App, size: Rect) {
    let area = centered_rect(60, 70, size);
    let body = render_dialog_frame(
        f,
        area,
        " Configure dashboard ",
        "Space toggle  Enter sensors  Esc close",
    );

    let items: Vec<ListItem> = app
        .store
        .entries()
        .map(|entry| {
            let shown = entry.sensors().iter().filter(|s| s.show_sensor).count();
            ListItem::new(format!(
                "{} {} ({}) {}/{} sensors",
                checkbox(entry.show_hardware),
                entry.name,
                entry.category.as_str(),
                shown,
                entry.sensors().len()
            ))
        })
        .collect();

    let mut state = ListState::default();
    if !items.is_empty() {
        state.select(Some(app.config_idx));
    }
    let list = List::new(items).highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    f.render_stateful_widget(list, body, &mut state);
}

/// Sensor picker for one hardware entry, labelled by tree path.
pub fn render_sensor_dialog(f: &mut Frame, app: &App, hardware_id: &HardwareId, size: Rect) {
    let Some(entry) = app.store.get(hardware_id) else {
        return;
    };
    let area = centered_rect(70, 80, size);
    let body = render_dialog_frame(f, area, &format!(" {} sensors ", entry.name), "Space toggle  Esc back");

    let items: Vec<ListItem> = entry
        .sensors()
        .iter()
        .map(|sensor| {
            ListItem::new(format!(
                "{} {} ({})",
                checkbox(sensor.show_sensor),
                sensor.path,
                sensor.category.as_str()
            ))
        })
        .collect();

    let mut state = ListState::default();
    if items.is_empty() {
        f.render_widget(Paragraph::new("This hardware has no sensors."), body);
        return;
    }
    state.select(Some(app.sensor_idx));
    let list = List::new(items).highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    f.render_stateful_widget(list, body, &mut state);
}
