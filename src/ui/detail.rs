//! Detail overlay rendering.
//!
//! Displays a modal overlay with the full content of a selected runtime
//! event, including its pretty-printed payload.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 50;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 14;

/// Render the event detail as a modal overlay.
///
/// Shows the selected event's kind, age, message and payload.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(event) = app.selected_event() else {
        return;
    };

    // Calculate overlay size - use most of the screen
    let overlay_width = (area.width * 90 / 100).clamp(MIN_OVERLAY_WIDTH, 100);
    let overlay_height = (area.height * 80 / 100).clamp(MIN_OVERLAY_HEIGHT, 40);

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
        .title(format!(" Event {} ", event.id))
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));
    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Length(4), // Header with event info
        Constraint::Min(4),    // Payload
        Constraint::Length(1), // Footer
    ])
    .split(inner);

    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let header = vec![
        Line::from(vec![
            Span::raw("Kind: "),
            Span::styled(event.kind.label(), app.theme.kind_style(event.kind)),
            Span::raw("   Age: "),
            Span::raw(format_age(event.created_at, now_ms)),
            Span::raw(format!("   ({} ms epoch)", event.created_at)),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Message: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(event.message.clone()),
        ]),
    ];
    frame.render_widget(Paragraph::new(header).wrap(Wrap { trim: false }), chunks[0]);

    let payload_text = match event.payload {
        Some(ref payload) => {
            serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string())
        }
        None => "(no payload)".to_string(),
    };
    let payload = Paragraph::new(payload_text)
        .block(
            Block::default()
                .title(" Payload ")
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(payload, chunks[1]);

    let footer = Paragraph::new(" Esc/Enter: close  j/k: other events ")
        .style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(footer, chunks[2]);
}
