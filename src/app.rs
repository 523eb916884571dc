//! Application state and navigation logic.

use std::time::Instant;

use anyhow::Result;

use crate::data::{HealthLevel, HealthResult};
use crate::source::{CommandSender, LineAction, RuntimeEvent, TelemetrySnapshot, TelemetrySource};
use crate::ui::events_view::EventSortColumn;
use crate::ui::Theme;

/// The current view/tab in the TUI.
///
/// Event detail is shown as an overlay (controlled by
/// `App::show_detail_overlay`) rather than as a separate view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// Line state, PLC health and the derived severity at a glance.
    Overview,
    /// The recent runtime event log.
    Events,
    /// Active alert strings with their contributing event buckets.
    Alerts,
}

impl View {
    /// Cycle to the next view.
    pub fn next(self) -> Self {
        match self {
            View::Overview => View::Events,
            View::Events => View::Alerts,
            View::Alerts => View::Overview,
        }
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        match self {
            View::Overview => View::Alerts,
            View::Events => View::Overview,
            View::Alerts => View::Events,
        }
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::Overview => "Overview",
            View::Events => "Events",
            View::Alerts => "Alerts",
        }
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn TelemetrySource>,
    commander: Option<CommandSender>,
    pub snapshot: TelemetrySnapshot,
    pub health: HealthResult,
    pub last_updated: Option<Instant>,
    pub load_error: Option<String>,

    // Navigation state
    pub selected_event_index: usize,

    // Sorting (Events view)
    pub sort_column: EventSortColumn,
    pub sort_ascending: bool,

    // Search/filter
    pub filter_text: String,
    pub filter_active: bool,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, std::time::Instant)>,
}

impl App {
    /// Create a new App with the given telemetry source.
    pub fn new(source: Box<dyn TelemetrySource>) -> Self {
        let commander = source.commander();
        Self {
            running: true,
            current_view: View::Overview,
            show_help: false,
            show_detail_overlay: false,
            source,
            commander,
            snapshot: TelemetrySnapshot::default(),
            health: HealthResult::default(),
            last_updated: None,
            load_error: None,
            selected_event_index: 0,
            sort_column: EventSortColumn::default(),
            sort_ascending: false, // Default descending (newest first)
            filter_text: String::new(),
            filter_active: false,
            theme: Theme::auto_detect(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, std::time::Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for new data and re-derive health.
    ///
    /// Returns Ok(true) if new data was received, Ok(false) if no new data.
    /// Per-slice errors are surfaced in `load_error` without discarding the
    /// slices that did answer.
    pub fn reload_data(&mut self) -> Result<bool> {
        // Surface command outcomes from the async side.
        if let Some(ref commander) = self.commander {
            if let Some(feedback) = commander.take_feedback() {
                self.set_status_message(feedback);
            }
        }

        self.load_error = self.source.error();

        if let Some(snapshot) = self.source.poll() {
            self.health = HealthResult::from_snapshot(&snapshot);
            self.snapshot = snapshot;
            self.last_updated = Some(Instant::now());

            // Clamp selection to the filtered event list
            let count = self.filtered_event_count();
            if self.selected_event_index >= count {
                self.selected_event_index = count.saturating_sub(1);
            }
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Queue a line command against the backend.
    pub fn send_line_command(&mut self, action: LineAction) {
        match self.commander {
            Some(ref commander) => {
                if commander.send(action) {
                    self.set_status_message(format!("Sending {}...", action.label()));
                } else {
                    self.set_status_message("Command channel closed".to_string());
                }
            }
            None => {
                self.set_status_message(format!(
                    "{} ignored: source does not support commands",
                    action.label()
                ));
            }
        }
    }

    /// Switch to the next view (cycles Overview → Events → Alerts).
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
        self.selected_event_index = 0;
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
        self.selected_event_index = 0;
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
        self.selected_event_index = 0;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        self.select_next_n(1);
    }

    /// Move selection up by one item.
    pub fn select_prev(&mut self) {
        self.select_prev_n(1);
    }

    /// Move selection down by n items.
    pub fn select_next_n(&mut self, n: usize) {
        let max = self.filtered_event_count().saturating_sub(1);
        self.selected_event_index = (self.selected_event_index + n).min(max);
    }

    /// Move selection up by n items.
    pub fn select_prev_n(&mut self, n: usize) {
        self.selected_event_index = self.selected_event_index.saturating_sub(n);
    }

    /// Jump to the first item in the list.
    pub fn select_first(&mut self) {
        self.selected_event_index = 0;
    }

    /// Jump to the last item in the list.
    pub fn select_last(&mut self) {
        self.selected_event_index = self.filtered_event_count().saturating_sub(1);
    }

    /// The event list after filtering and sorting, as shown in the Events
    /// view. The visual selection index points into this list.
    pub fn visible_events(&self) -> Vec<&RuntimeEvent> {
        let Some(ref events) = self.snapshot.events else {
            return Vec::new();
        };
        let mut visible: Vec<&RuntimeEvent> =
            events.iter().filter(|e| self.matches_filter(e)).collect();
        crate::ui::events_view::sort_events_by(&mut visible, self.sort_column, self.sort_ascending);
        visible
    }

    /// The event under the cursor, if any.
    pub fn selected_event(&self) -> Option<&RuntimeEvent> {
        self.visible_events().get(self.selected_event_index).copied()
    }

    /// Get count of events after applying filter.
    pub fn filtered_event_count(&self) -> usize {
        let Some(ref events) = self.snapshot.events else {
            return 0;
        };
        events.iter().filter(|e| self.matches_filter(e)).count()
    }

    /// Check if an event matches the current filter (message or kind).
    pub fn matches_filter(&self, event: &RuntimeEvent) -> bool {
        if self.filter_text.is_empty() {
            return true;
        }
        let search = self.filter_text.to_lowercase();
        event.message.to_lowercase().contains(&search)
            || event.kind.label().to_lowercase().contains(&search)
    }

    /// Open the detail overlay for the currently selected event.
    pub fn enter_detail(&mut self) {
        if self.current_view == View::Events && self.selected_event().is_some() {
            self.show_detail_overlay = true;
        }
    }

    /// Navigate back: close overlay first, then return to Overview.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
            return;
        }
        if self.current_view != View::Overview {
            self.current_view = View::Overview;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Cycle to the next sort column (Events view).
    pub fn cycle_sort(&mut self) {
        if self.current_view == View::Events {
            self.sort_column = self.sort_column.next();
        }
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        if self.current_view == View::Events {
            self.sort_ascending = !self.sort_ascending;
        }
    }

    /// Enter filter input mode (starts capturing keystrokes for search).
    pub fn start_filter(&mut self) {
        self.filter_active = true;
    }

    /// Exit filter input mode without clearing the filter text.
    pub fn cancel_filter(&mut self) {
        self.filter_active = false;
    }

    /// Clear the filter text and exit filter mode.
    pub fn clear_filter(&mut self) {
        self.filter_text.clear();
        self.filter_active = false;
    }

    /// Append a character to the filter text.
    pub fn filter_push(&mut self, c: char) {
        self.filter_text.push(c);
    }

    /// Remove the last character from the filter text.
    pub fn filter_pop(&mut self) {
        self.filter_text.pop();
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current snapshot and derived health to a file.
    pub fn export_state(&self, path: &std::path::Path) -> Result<()> {
        use std::io::Write;

        let export = serde_json::json!({
            "health": {
                "level": self.health.level.symbol(),
                "alerts": self.health.alerts,
                "safety_events": self.health.safety_events.len(),
                "fault_events": self.health.fault_events.len(),
                "plc_device_events": self.health.plc_device_events.len(),
            },
            "line": self.snapshot.line,
            "plc": self.snapshot.plc,
            "events": self.snapshot.events,
        });

        let json = serde_json::to_string_pretty(&export)?;
        let mut file = std::fs::File::create(path)?;
        file.write_all(json.as_bytes())?;

        Ok(())
    }

    /// True when the derived level should be treated as actionable.
    pub fn is_alerting(&self) -> bool {
        self.health.level >= HealthLevel::Alert
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{ChannelSource, EventKind, LineState, PlcHealth, PlcStatus};

    fn snapshot_with_events(events: Vec<RuntimeEvent>) -> TelemetrySnapshot {
        TelemetrySnapshot {
            line: Some(LineState {
                state: "RUNNING".to_string(),
                e_stop_active: false,
                fault_active: false,
            }),
            plc: Some(PlcHealth {
                status: PlcStatus::Real,
                connector: None,
                hardware_mode: None,
                real_io_mode: None,
                driver_health: None,
            }),
            events: Some(events),
        }
    }

    fn event(id: u64, kind: EventKind, message: &str) -> RuntimeEvent {
        RuntimeEvent {
            id,
            kind,
            created_at: 1_700_000_000_000 + id,
            message: message.to_string(),
            payload: None,
        }
    }

    #[test]
    fn test_reload_derives_health() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));

        // First poll delivers the empty default snapshot: OK, no data.
        assert!(app.reload_data().unwrap());
        assert_eq!(app.health.level, HealthLevel::Ok);

        tx.send(snapshot_with_events(vec![event(
            1,
            EventKind::Safety,
            "curtain",
        )]))
        .unwrap();

        assert!(app.reload_data().unwrap());
        assert_eq!(app.health.level, HealthLevel::Warn);
        assert_eq!(app.health.safety_events.len(), 1);

        // No new data: health unchanged, reload reports false.
        assert!(!app.reload_data().unwrap());
        assert_eq!(app.health.level, HealthLevel::Warn);
    }

    #[test]
    fn test_filter_matches_message_and_kind() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));
        tx.send(snapshot_with_events(vec![
            event(1, EventKind::Safety, "light curtain"),
            event(2, EventKind::Fault, "jam at diverter"),
        ]))
        .unwrap();
        app.reload_data().unwrap();

        assert_eq!(app.filtered_event_count(), 2);
        app.filter_text = "curtain".to_string();
        assert_eq!(app.filtered_event_count(), 1);
        app.filter_text = "safety".to_string();
        assert_eq!(app.filtered_event_count(), 1);
        app.clear_filter();
        assert_eq!(app.filtered_event_count(), 2);
    }

    #[test]
    fn test_visible_events_default_newest_first() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));
        tx.send(snapshot_with_events(vec![
            event(1, EventKind::Safety, "older"),
            event(2, EventKind::Fault, "newer"),
        ]))
        .unwrap();
        app.reload_data().unwrap();

        let visible = app.visible_events();
        assert_eq!(visible[0].message, "newer");
        assert_eq!(visible[1].message, "older");
    }

    #[test]
    fn test_selection_clamps_to_filtered_list() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));
        tx.send(snapshot_with_events(vec![
            event(1, EventKind::Safety, "a"),
            event(2, EventKind::Fault, "b"),
            event(3, EventKind::Other, "c"),
        ]))
        .unwrap();
        app.reload_data().unwrap();

        app.select_last();
        assert_eq!(app.selected_event_index, 2);
        app.select_next();
        assert_eq!(app.selected_event_index, 2);
        app.select_prev_n(10);
        assert_eq!(app.selected_event_index, 0);
    }

    #[test]
    fn test_command_without_commander_sets_message() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));
        app.send_line_command(LineAction::Pause);
        assert!(app
            .get_status_message()
            .unwrap()
            .contains("does not support commands"));
    }

    #[test]
    fn test_view_cycle() {
        let (_tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));
        assert_eq!(app.current_view, View::Overview);
        app.next_view();
        assert_eq!(app.current_view, View::Events);
        app.next_view();
        assert_eq!(app.current_view, View::Alerts);
        app.next_view();
        assert_eq!(app.current_view, View::Overview);
        app.prev_view();
        assert_eq!(app.current_view, View::Alerts);
    }

    #[test]
    fn test_go_back_closes_overlay_then_returns_to_overview() {
        let (tx, source) = ChannelSource::create("test");
        let mut app = App::new(Box::new(source));
        tx.send(snapshot_with_events(vec![event(1, EventKind::Fault, "jam")]))
            .unwrap();
        app.reload_data().unwrap();

        app.set_view(View::Events);
        app.enter_detail();
        assert!(app.show_detail_overlay);
        app.go_back();
        assert!(!app.show_detail_overlay);
        assert_eq!(app.current_view, View::Events);
        app.go_back();
        assert_eq!(app.current_view, View::Overview);
    }
}
