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

use std::io::{self, stdout};
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Context;
use clap::{Parser, Subcommand};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use tracing::{error, info};

use sensordeck::app::App;
use sensordeck::config::{self, AppSettings, ProviderKind};
use sensordeck::defaults::apply_default_visibility;
use sensordeck::events::handle_key_event;
use sensordeck::hwmon::HwmonProvider;
use sensordeck::logger::{self, LogTarget};
use sensordeck::memory::StaticProvider;
use sensordeck::provider::{ProviderSession, SensorProvider};
use sensordeck::refresh::{RefreshEngine, ViewMode};
use sensordeck::service::{self, HeadlessOptions};
use sensordeck::system;
use sensordeck::ui::ui;
use sensordeck::visibility::VisibilityStore;

#[derive(Debug, Parser)]
#[command(name = "sensordeck", version, about = "Hardware sensor dashboard for the terminal")]
struct Cli {
    /// Settings file (defaults to $XDG_CONFIG_HOME/sensordeck/config.json)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Refresh interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// hwmon class directory to scan
    #[arg(long)]
    hwmon_root: Option<PathBuf>,

    /// View to start in
    #[arg(long, value_enum)]
    view: Option<ViewMode>,

    /// Use simulated hardware instead of hwmon
    #[arg(long)]
    demo: bool,

    /// Print readings to stdout instead of drawing the TUI
    #[arg(long)]
    headless: bool,

    /// Print a single refresh and exit (implies --headless)
    #[arg(long)]
    once: bool,

    /// Emit JSON in headless mode
    #[arg(long)]
    json: bool,

    /// Log file for TUI mode
    #[arg(long)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write the effective settings to the config file and exit
    WriteConfig,
}

impl Cli {
    fn settings(&self, mut settings: AppSettings) -> anyhow::Result<AppSettings> {
        if let Some(ms) = self.interval_ms {
            settings.refresh_interval_ms = ms;
        }
        if let Some(root) = &self.hwmon_root {
            settings.hwmon_root = root.clone();
        }
        if let Some(view) = self.view {
            settings.start_view = view;
        }
        if self.demo {
            settings.provider = ProviderKind::Demo;
        }
        settings.validate()?;
        Ok(settings)
    }
}

fn build_provider(settings: &AppSettings) -> Box<dyn SensorProvider> {
    match settings.provider {
        ProviderKind::Hwmon => Box::new(HwmonProvider::new(settings.hwmon_root.clone())),
        ProviderKind::Demo => Box::new(StaticProvider::demo()),
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let headless = cli.headless || cli.once;

    let target = if headless {
        LogTarget::Stderr
    } else {
        LogTarget::File(cli.log_file.clone().unwrap_or_else(logger::default_log_path))
    };
    logger::init_logging(&target).context("initialize logging")?;

    let path = cli.config.clone().unwrap_or_else(config::config_path);
    let loaded = config::load_settings(&path).with_context(|| format!("load settings from {}", path.display()))?;
    let settings = cli.settings(loaded)?;

    if let Some(Command::WriteConfig) = cli.command {
        config::save_settings(&path, &settings).with_context(|| format!("write settings to {}", path.display()))?;
        println!("Wrote settings to {}", path.display());
        return Ok(());
    }

    info!(provider = ?settings.provider, interval_ms = settings.refresh_interval_ms, headless, "starting");
    let mut session = ProviderSession::open(build_provider(&settings));

    if headless {
        let mut store = VisibilityStore::new();
        apply_default_visibility(&mut store, session.tree());
        let mut engine = RefreshEngine::new(settings.refresh_interval());
        let opts = HeadlessOptions {
            mode: settings.start_view,
            focus: None,
            json: cli.json,
            max_ticks: cli.once.then_some(1),
        };
        let res = service::run_headless(&mut session, &store, &mut engine, &opts, &mut stdout().lock());
        session.close();
        return res;
    }

    let mut app = App::new(session, settings.refresh_interval(), settings.start_view);
    app.cpu_name = system::read_cpu_name().unwrap_or_default();
    app.mb_name = system::read_mb_name().unwrap_or_default();

    // Terminal init
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = ratatui::backend::CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    app.session.close();

    if let Err(err) = res {
        error!(error = %err, "fatal error");
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<ratatui::backend::CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> anyhow::Result<()> {
    loop {
        app.tick_if_due(Instant::now());
        terminal.draw(|f| ui(f, app))?;

        let timeout = app.engine.time_until_due(Instant::now());
        if event::poll(timeout).unwrap_or(false) {
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(app, key_event)? {
                    return Ok(());
                }
            }
        }
    }
}
