//! Overview view rendering.
//!
//! Shows the line state and PLC health side by side, with the active
//! alert list underneath. This is the landing view.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;
use crate::data::HealthLevel;

/// Render the Overview: line card + PLC card on top, alerts below.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let rows = Layout::vertical([
        Constraint::Length(7), // Cards
        Constraint::Min(4),    // Alerts
    ])
    .split(area);

    let cards = Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[0]);

    render_line_card(frame, app, cards[0]);
    render_plc_card(frame, app, cards[1]);
    render_alerts(frame, app, rows[1]);
}

fn render_line_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" Line ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = match app.snapshot.line {
        Some(ref line) => {
            let flag = |active: bool| -> Span<'static> {
                if active {
                    Span::styled("YES", app.theme.level_style(HealthLevel::Alert))
                } else {
                    Span::styled("no", Style::default().add_modifier(Modifier::DIM))
                }
            };
            vec![
                Line::from(vec![
                    Span::raw("Mode:    "),
                    Span::styled(
                        line.state.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ]),
                Line::from(vec![Span::raw("E-stop:  "), flag(line.e_stop_active)]),
                Line::from(vec![Span::raw("Fault:   "), flag(line.fault_active)]),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Could not load line state",
            Style::default().add_modifier(Modifier::DIM),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_plc_card(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .title(" PLC ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines = match app.snapshot.plc {
        Some(ref plc) => {
            let status_style = match plc.status {
                crate::source::PlcStatus::Misconfigured
                | crate::source::PlcStatus::Offline
                | crate::source::PlcStatus::Error => app.theme.level_style(HealthLevel::Alert),
                crate::source::PlcStatus::Unknown => Style::default().add_modifier(Modifier::DIM),
                _ => app.theme.level_style(HealthLevel::Ok),
            };
            let opt = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());
            vec![
                Line::from(vec![
                    Span::raw("Status:    "),
                    Span::styled(plc.status.label(), status_style),
                ]),
                Line::from(format!("Connector: {}", opt(&plc.connector))),
                Line::from(format!("Hardware:  {}", opt(&plc.hardware_mode))),
                Line::from(format!("Real I/O:  {}", opt(&plc.real_io_mode))),
                Line::from(format!("Driver:    {}", opt(&plc.driver_health))),
            ]
        }
        None => vec![Line::from(Span::styled(
            "Could not load PLC health",
            Style::default().add_modifier(Modifier::DIM),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let title = format!(" Alerts ({}) ", app.health.alerts.len());
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.border));

    let lines: Vec<Line> = if app.health.alerts.is_empty() {
        let text = match app.health.level {
            HealthLevel::Warn => "No alerts, but warnings are active (see Alerts tab)",
            _ => "No active alerts",
        };
        vec![Line::from(Span::styled(
            text,
            Style::default().add_modifier(Modifier::DIM),
        ))]
    } else {
        app.health
            .alerts
            .iter()
            .map(|alert| {
                Line::from(vec![
                    Span::styled("▶ ", app.theme.level_style(HealthLevel::Alert)),
                    Span::styled(alert.clone(), app.theme.level_style(HealthLevel::Alert)),
                ])
            })
            .collect()
    };

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
