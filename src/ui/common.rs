//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{App, View};
use crate::data::HealthLevel;

/// Render the header bar with the derived line severity.
///
/// Displays: level indicator, alert count, contributing event counts,
/// line mode and PLC status.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    if app.snapshot.is_empty() && app.last_updated.is_none() {
        let line = Line::from(vec![
            Span::styled(
                " AKIS CONSOLE ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw("| Waiting for telemetry..."),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let level = app.health.level;
    let level_style = app.theme.level_style(level);

    let line_mode = app
        .snapshot
        .line
        .as_ref()
        .map_or("NO DATA", |l| l.state.as_str());
    let plc_status = app
        .snapshot
        .plc
        .as_ref()
        .map_or("UNKNOWN", |p| p.status.label());

    let alert_span = if app.health.alerts.is_empty() {
        Span::styled("0 alerts", Style::default().add_modifier(Modifier::DIM))
    } else {
        Span::styled(
            format!("{} alerts", app.health.alerts.len()),
            Style::default().fg(app.theme.alert).add_modifier(Modifier::BOLD),
        )
    };

    let bucketed = app.health.bucketed_event_count();
    let bucket_span = if bucketed == 0 {
        Span::styled("0 events", Style::default().add_modifier(Modifier::DIM))
    } else {
        Span::styled(
            format!("{} events", bucketed),
            Style::default().fg(app.theme.warning),
        )
    };

    let line = Line::from(vec![
        Span::styled(format!(" ● {} ", level.symbol()), level_style),
        Span::styled("AKIS ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ line "),
        Span::styled(
            line_mode.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ plc "),
        Span::styled(
            plc_status.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" │ "),
        alert_span,
        Span::raw(" │ "),
        bucket_span,
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &App, area: Rect) {
    let titles: Vec<Line> = vec![
        Line::from(" 1:Overview "),
        Line::from(" 2:Events "),
        Line::from(" 3:Alerts "),
    ];

    let selected = match app.current_view {
        View::Overview => 0,
        View::Events => 1,
        View::Alerts => 2,
    };

    let tabs = Tabs::new(titles)
        .select(selected)
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: data source, time since last update, per-slice errors, and
/// context-sensitive controls. Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    // Check for temporary status message first
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = match app.current_view {
        View::Overview => {
            "p:pause u:resume x:stop Tab:switch e:export ?:help q:quit"
        }
        View::Events => {
            if app.filter_active {
                "Type to search | Enter:apply Esc:cancel"
            } else {
                "/:search s:sort S:reverse Enter:detail Tab:switch ?:help q:quit"
            }
        }
        View::Alerts => "Tab:switch e:export ?:help q:quit",
    };

    let status = if let Some(updated) = app.last_updated {
        let base = format!(
            " {} | Updated {:.1}s ago | {}",
            app.source_description(),
            updated.elapsed().as_secs_f64(),
            controls,
        );
        match app.load_error {
            Some(ref err) => format!("{} | ! {}", base, err),
            None => base,
        }
    } else if let Some(ref err) = app.load_error {
        format!(" Could not load telemetry: {} | q:quit r:retry", err)
    } else {
        format!(" {} | Waiting... | q:quit", app.source_description())
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));

    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Navigation",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  ↑/↓ j/k     Navigate events"),
        Line::from("  PgUp/PgDn   Jump 10 items"),
        Line::from("  Home/End    Jump to first/last"),
        Line::from("  Enter       Event detail"),
        Line::from("  Esc         Go back"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Events",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  /         Start filter/search"),
        Line::from("  c         Clear filter"),
        Line::from("  s         Cycle sort column"),
        Line::from("  S         Toggle sort direction"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Line commands (Overview)",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  p         Pause the line"),
        Line::from("  u         Resume the line"),
        Line::from("  x         Safe stop"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Reload data"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 44u16.min(area.width.saturating_sub(4));
    let help_height = 30u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    // Clear the area behind the help
    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}

/// Style an OK/WARN/ALERT pill for a level, used by the views.
pub fn level_span(app: &App, level: HealthLevel) -> Span<'static> {
    Span::styled(level.symbol(), app.theme.level_style(level))
}
