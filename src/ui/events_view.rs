//! Events view rendering.
//!
//! Displays the recent runtime event log in a sortable, filterable table.
//! All kinds are listed here, including the ones the health deriver
//! ignores (PLC_CONN and unclassified).

use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::duration::format_age;
use crate::source::RuntimeEvent;

/// Column to sort by in the Events view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventSortColumn {
    /// Sort by creation time.
    #[default]
    Time,
    /// Sort by event kind.
    Kind,
    /// Sort by event id.
    Id,
}

impl EventSortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            EventSortColumn::Time => EventSortColumn::Kind,
            EventSortColumn::Kind => EventSortColumn::Id,
            EventSortColumn::Id => EventSortColumn::Time,
        }
    }
}

/// Render the Events view showing the windowed event log.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    let visible = app.visible_events();
    let total = app
        .snapshot
        .events
        .as_ref()
        .map_or(0, |events| events.len());

    let now_ms = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64;

    let header = Row::new(vec![
        Cell::from(format_header("Age", EventSortColumn::Time, app)),
        Cell::from(format_header("Kind", EventSortColumn::Kind, app)),
        Cell::from(format_header("Id", EventSortColumn::Id, app)),
        Cell::from("Message"),
    ])
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = visible
        .iter()
        .map(|event| {
            Row::new(vec![
                Cell::from(format_age(event.created_at, now_ms)),
                Cell::from(event.kind.label()).style(app.theme.kind_style(event.kind)),
                Cell::from(event.id.to_string()),
                Cell::from(event.message.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(8),  // Age
        Constraint::Length(12), // Kind
        Constraint::Length(8),  // Id
        Constraint::Fill(1),    // Message
    ];

    let selected_visual_index = app.selected_event_index.min(visible.len().saturating_sub(1));

    let sort_indicator = match app.sort_column {
        EventSortColumn::Time => "time",
        EventSortColumn::Kind => "kind",
        EventSortColumn::Id => "id",
    };
    let sort_dir = if app.sort_ascending { "↑" } else { "↓" };

    // Build title with filter info
    let filter_info = if app.filter_active {
        format!(" /{}_", app.filter_text)
    } else if !app.filter_text.is_empty() {
        format!(" /{}/ [c:clear]", app.filter_text)
    } else {
        String::new()
    };

    let position_info = if !visible.is_empty() {
        format!(" [{}/{}]", selected_visual_index + 1, visible.len())
    } else {
        String::new()
    };

    let title = format!(
        " Events ({}/{}) [s:sort {}{}]{}{} ",
        visible.len(),
        total,
        sort_indicator,
        sort_dir,
        filter_info,
        position_info
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut state = TableState::default();
    state.select(Some(selected_visual_index));

    frame.render_stateful_widget(table, area, &mut state);
}

fn format_header(name: &str, col: EventSortColumn, app: &App) -> Span<'static> {
    if app.sort_column == col {
        let arrow = if app.sort_ascending { "↑" } else { "↓" };
        Span::raw(format!("{}{}", name, arrow))
    } else {
        Span::raw(name.to_string())
    }
}

/// Sort events by the given column and direction (public for use in app.rs)
pub fn sort_events_by(events: &mut [&RuntimeEvent], column: EventSortColumn, ascending: bool) {
    events.sort_by(|a, b| {
        let primary = match column {
            EventSortColumn::Time => a.created_at.cmp(&b.created_at),
            EventSortColumn::Kind => a.kind.label().cmp(b.kind.label()),
            EventSortColumn::Id => a.id.cmp(&b.id),
        };

        // Apply direction to primary comparison
        let primary = if ascending {
            primary
        } else {
            primary.reverse()
        };

        // Use id as a stable secondary sort
        if primary == std::cmp::Ordering::Equal {
            a.id.cmp(&b.id)
        } else {
            primary
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::EventKind;

    fn event(id: u64, kind: EventKind, created_at: u64) -> RuntimeEvent {
        RuntimeEvent {
            id,
            kind,
            created_at,
            message: String::new(),
            payload: None,
        }
    }

    #[test]
    fn test_sort_by_time_descending() {
        let a = event(1, EventKind::Safety, 100);
        let b = event(2, EventKind::Fault, 200);
        let mut events = vec![&a, &b];
        sort_events_by(&mut events, EventSortColumn::Time, false);
        assert_eq!(events[0].id, 2);
    }

    #[test]
    fn test_sort_by_kind_with_stable_id_tiebreak() {
        let a = event(3, EventKind::Fault, 100);
        let b = event(1, EventKind::Fault, 200);
        let c = event(2, EventKind::Safety, 300);
        let mut events = vec![&a, &b, &c];
        sort_events_by(&mut events, EventSortColumn::Kind, true);
        // FAULT < SAFETY lexicographically; ties resolved by id.
        assert_eq!(events[0].id, 1);
        assert_eq!(events[1].id, 3);
        assert_eq!(events[2].id, 2);
    }

    #[test]
    fn test_sort_column_cycle() {
        assert_eq!(EventSortColumn::Time.next(), EventSortColumn::Kind);
        assert_eq!(EventSortColumn::Kind.next(), EventSortColumn::Id);
        assert_eq!(EventSortColumn::Id.next(), EventSortColumn::Time);
    }
}
