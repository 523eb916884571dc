// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod client;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use client::RuntimeClient;
use source::{ChannelSource, FileSource, PollIntervals, TelemetrySnapshot, TelemetrySource};

#[derive(Parser, Debug)]
#[command(name = "akis-console")]
#[command(about = "Diagnostic TUI for monitoring an AKIS sorting line runtime")]
struct Args {
    /// Path to a mock telemetry JSON file (conflicts with --endpoint)
    #[arg(short, long, conflicts_with = "endpoint")]
    file: Option<PathBuf>,

    /// Base URL of the runtime API (e.g., http://localhost:8080)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Site identifier sent with every request
    #[arg(long)]
    site: Option<String>,

    /// Line identifier sent with every request
    #[arg(long)]
    line: Option<String>,

    /// Path to a TOML config file. Values are layered under AKIS_*
    /// environment variables (e.g., AKIS_DEBUG_TOKEN) and below CLI flags.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Poll interval for line state (e.g., "5s")
    #[arg(long, default_value = "5s")]
    line_interval: String,

    /// Poll interval for PLC health (e.g., "5s")
    #[arg(long, default_value = "5s")]
    plc_interval: String,

    /// Poll interval for recent events (e.g., "10s")
    #[arg(long, default_value = "10s")]
    events_interval: String,

    /// Window for the recent-events query, maps to since_ms_ago (e.g., "10m")
    #[arg(long, default_value = "10m")]
    events_window: String,

    /// Refresh interval in seconds (only used with --file)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Export current health and snapshots to a JSON file and exit
    #[arg(long)]
    export: Option<PathBuf>,
}

/// Connection settings after layering config file, environment and flags.
#[derive(Debug, Clone)]
struct Settings {
    endpoint: String,
    site: String,
    line: String,
    debug_token: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let settings = load_settings(&args)?;

    let intervals = PollIntervals {
        line: data::duration::parse_duration(&args.line_interval)
            .unwrap_or(Duration::from_secs(5)),
        plc: data::duration::parse_duration(&args.plc_interval).unwrap_or(Duration::from_secs(5)),
        events: data::duration::parse_duration(&args.events_interval)
            .unwrap_or(Duration::from_secs(10)),
    };
    let events_window = data::duration::parse_duration(&args.events_window)
        .unwrap_or(Duration::from_secs(600));

    // Handle export mode (non-interactive)
    if let Some(ref export_path) = args.export {
        return export_to_file(&args, &settings, events_window, export_path);
    }

    // Mock mode: a JSON file stands in for the backend
    if let Some(ref path) = args.file {
        return run_with_file(path, Duration::from_secs(args.refresh));
    }

    // Default: poll the live runtime API
    run_with_http(&settings, intervals, events_window)
}

/// Layer settings: defaults < config file < AKIS_* environment < CLI flags.
fn load_settings(args: &Args) -> Result<Settings> {
    let mut builder = config::Config::builder();
    if let Some(ref path) = args.config {
        builder = builder.add_source(config::File::from(path.as_path()));
    }
    let config = builder
        .add_source(config::Environment::with_prefix("AKIS"))
        .build()
        .context("Failed to load configuration")?;

    let endpoint = args
        .endpoint
        .clone()
        .or_else(|| config.get_string("endpoint").ok())
        .unwrap_or_else(|| "http://localhost:8080".to_string());
    let site = args
        .site
        .clone()
        .or_else(|| config.get_string("site").ok())
        .unwrap_or_else(|| "default".to_string());
    let line = args
        .line
        .clone()
        .or_else(|| config.get_string("line").ok())
        .unwrap_or_else(|| "line-1".to_string());
    let debug_token = config.get_string("debug_token").ok();

    Ok(Settings {
        endpoint,
        site,
        line,
        debug_token,
    })
}

fn build_client(settings: &Settings) -> RuntimeClient {
    RuntimeClient::builder()
        .endpoint(settings.endpoint.clone())
        .site(settings.site.clone())
        .line(settings.line.clone())
        .debug_token(settings.debug_token.clone())
        .build()
}

/// Run with a file-based data source
fn run_with_file(path: &PathBuf, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, refresh)
}

/// Run with the live HTTP polling source
fn run_with_http(
    settings: &Settings,
    intervals: PollIntervals,
    events_window: Duration,
) -> Result<()> {
    // The runtime drives the pollers while the TUI owns the main thread.
    let rt = tokio::runtime::Runtime::new()?;

    let client = build_client(settings);
    let source = rt.block_on(async { client.into_source(intervals, events_window) });

    run_tui(Box::new(source), Duration::from_millis(250))
}

/// Run the TUI with the given data source
fn run_tui(source: Box<dyn TelemetrySource>, refresh_interval: Duration) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source);
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(
                    0,
                    (area.height.saturating_sub(5)) / 2,
                    area.width,
                    5.min(area.height),
                );
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with derived severity
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Overview => ui::overview::render(frame, app, chunks[2]),
                View::Events => ui::events_view::render(frame, app, chunks[2]),
                View::Alerts => ui::alerts::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Fetch once, derive health, write JSON to a file and exit.
///
/// With --file the snapshot comes from the mock file; otherwise each
/// endpoint is fetched once, tolerating individual failures.
fn export_to_file(
    args: &Args,
    settings: &Settings,
    events_window: Duration,
    export_path: &std::path::Path,
) -> Result<()> {
    let snapshot = match args.file {
        Some(ref path) => {
            let mut source = FileSource::new(path);
            source.poll().with_context(|| {
                format!(
                    "Could not read telemetry from {}: {}",
                    path.display(),
                    source.error().unwrap_or_default()
                )
            })?
        }
        None => {
            let rt = tokio::runtime::Runtime::new()?;
            let client = build_client(settings);
            rt.block_on(async {
                // Individual failures leave their slice empty, like a poll tick.
                TelemetrySnapshot {
                    line: client.line_state().await.ok(),
                    plc: client.plc_health().await.ok(),
                    events: client.recent_events(events_window, None).await.ok(),
                }
            })
        }
    };

    let (tx, source) = ChannelSource::create("export");
    let mut app = App::new(Box::new(source));
    tx.send(snapshot)
        .map_err(|_| anyhow::anyhow!("Snapshot channel closed"))?;
    app.reload_data()?;
    app.export_state(export_path)?;

    println!(
        "Exported {} state to: {}",
        app.health.level.symbol(),
        export_path.display()
    );
    Ok(())
}
