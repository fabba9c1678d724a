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

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};

use crate::app::App;
use crate::refresh::{DashboardSection, NAME_WIDTH, VALUE_WIDTH};

/// Narrowest a dashboard block gets before the grid drops a column.
const MIN_BLOCK_WIDTH: u16 = (NAME_WIDTH + VALUE_WIDTH + 4) as u16;

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let header_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(area);

    let header_text = format!(
        " CPU: {}    |    Motherboard: {}    |    hardware: {} ",
        if app.cpu_name.is_empty() { "?" } else { &app.cpu_name },
        if app.mb_name.is_empty() { "?" } else { &app.mb_name },
        app.session.tree().len()
    );
    let header = Paragraph::new(header_text).style(Style::default().fg(Color::Yellow));
    f.render_widget(header, header_cols[0]);

    let keys = Paragraph::new("Tab view  c configure  r refresh  q quit ")
        .alignment(Alignment::Right)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(keys, header_cols[1]);
}

pub fn render_status_bar(f: &mut Frame, app: &App, area: Rect, now: Instant) {
    let style = if app.engine.last_error().is_some() || !app.session.is_available() {
        Style::default().fg(Color::Black).bg(Color::Red)
    } else {
        Style::default().fg(Color::Black).bg(Color::Gray)
    };
    let status = Paragraph::new(app.status_line(now)).style(style);
    f.render_widget(status, area);
}

/// Grid of one block per visible hardware entry.
pub fn render_dashboard(f: &mut Frame, app: &App, area: Rect) {
    let dashboard = app.engine.dashboard();
    if dashboard.is_empty() {
        let text = if app.session.is_available() {
            "No hardware selected. Press 'c' to choose what the dashboard shows.".to_string()
        } else {
            app.status.clone()
        };
        let empty = Paragraph::new(text)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).title(" Dashboard "));
        f.render_widget(empty, area);
        return;
    }

    let sections = &dashboard.sections;
    let columns = usize::from((area.width / MIN_BLOCK_WIDTH).max(1)).min(sections.len());
    let row_constraints: Vec<Constraint> = sections
        .chunks(columns)
        .map(|row| {
            let tallest = row.iter().map(|s| s.rows.len().max(1)).max().unwrap_or(1);
            Constraint::Min(tallest as u16 + 2)
        })
        .collect();
    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(row_constraints)
        .split(area);

    for (row_idx, row) in sections.chunks(columns).enumerate() {
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(row_areas[row_idx]);
        for (col_idx, section) in row.iter().enumerate() {
            render_section(f, section, cols[col_idx]);
        }
    }
}

fn render_section(f: &mut Frame, section: &DashboardSection, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" {} ", section.name))
        .border_style(Style::default().fg(Color::Cyan));

    let items: Vec<ListItem> = if section.rows.is_empty() {
        vec![ListItem::new("no sensors selected").style(Style::default().fg(Color::DarkGray))]
    } else {
        section
            .rows
            .iter()
            .map(|row| {
                let label: String = row.label.chars().take(NAME_WIDTH).collect();
                let value_style = if row.value.is_sentinel() {
                    Style::default().fg(Color::DarkGray)
                } else {
                    Style::default().fg(Color::Green)
                };
                ListItem::new(Line::from(vec![
                    Span::raw(format!("{label:<width$} ", width = NAME_WIDTH)),
                    Span::styled(format!("{:>width$}", row.value.to_string(), width = VALUE_WIDTH), value_style),
                ]))
            })
            .collect()
    };

    f.render_widget(List::new(items).block(block), area);
}

/// Hardware navigation on the left, indented tree of the focused entry on the right.
pub fn render_list_view(f: &mut Frame, app: &App, area: Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(30), Constraint::Percentage(70)])
        .split(area);

    let highlight = Style::default().bg(Color::Blue).fg(Color::White);
    let nav_items: Vec<ListItem> = app
        .session
        .tree()
        .hardware()
        .iter()
        .map(|node| ListItem::new(format!("{} ({})", node.name, node.category.as_str())))
        .collect();
    let mut state = ListState::default();
    if !nav_items.is_empty() {
        state.select(Some(app.nav_idx));
    }
    let nav = List::new(nav_items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .title(" Hardware ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(highlight);
    f.render_stateful_widget(nav, cols[0], &mut state);

    let title = app
        .focused
        .as_ref()
        .and_then(|id| app.session.tree().find_hardware(id))
        .map(|node| format!(" {} ", node.name))
        .unwrap_or_else(|| " Sensors ".to_string());
    let lines: Vec<Line> = app.engine.list_text().into_iter().map(Line::from).collect();
    let body = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded).title(title));
    f.render_widget(body, cols[1]);
}
