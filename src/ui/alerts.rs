//! Alerts view rendering.
//!
//! Shows the ordered alert strings and the event buckets that feed the
//! WARN level: SAFETY, FAULT and PLC_DEVICE events from the current window.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;
use crate::data::HealthLevel;
use crate::source::RuntimeEvent;

/// Render the Alerts view: alert strings on top, buckets below.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(2 + app.health.alerts.len().max(1) as u16),
        Constraint::Min(6),
    ])
    .split(area);

    render_alert_list(frame, app, rows[0]);
    render_buckets(frame, app, rows[1]);
}

fn render_alert_list(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(
        " {} - Alerts ({}) ",
        app.health.level.symbol(),
        app.health.alerts.len()
    );
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.level_style(app.health.level));

    let lines: Vec<Line> = if app.health.alerts.is_empty() {
        vec![Line::from(Span::styled(
            "No active alerts",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        app.health
            .alerts
            .iter()
            .map(|alert| {
                Line::from(Span::styled(
                    format!("▶ {}", alert),
                    app.theme.level_style(HealthLevel::Alert),
                ))
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_buckets(frame: &mut Frame, app: &App, area: Rect) {
    let columns = Layout::horizontal([
        Constraint::Percentage(34),
        Constraint::Percentage(33),
        Constraint::Percentage(33),
    ])
    .split(area);

    render_bucket(frame, app, columns[0], "Safety", &app.health.safety_events);
    render_bucket(frame, app, columns[1], "Fault", &app.health.fault_events);
    render_bucket(
        frame,
        app,
        columns[2],
        "PLC device",
        &app.health.plc_device_events,
    );
}

fn render_bucket(frame: &mut Frame, app: &App, area: Rect, name: &str, events: &[RuntimeEvent]) {
    let level = if events.is_empty() {
        HealthLevel::Ok
    } else {
        HealthLevel::Warn
    };

    let block = Block::default()
        .title(format!(" {} ({}) ", name, events.len()))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(app.theme.level_style(level));

    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let lines: Vec<Line> = if events.is_empty() {
        vec![Line::from(Span::styled(
            "none in window",
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        events
            .iter()
            .map(|event| {
                Line::from(vec![
                    Span::styled(
                        format!("{:>6} ", format_age(event.created_at, now_ms)),
                        Style::default().add_modifier(Modifier::DIM),
                    ),
                    Span::raw(event.message.clone()),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
