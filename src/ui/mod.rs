//! Terminal rendering using ratatui.
//!
//! One submodule per view plus the shared chrome:
//!
//! - [`common`]: header bar, tab bar, status bar, help overlay
//! - [`overview`]: line/PLC cards and the alert list
//! - [`events_view`]: the windowed runtime event table
//! - [`alerts`]: alert strings with contributing event buckets
//! - [`detail`]: modal overlay for a single event
//! - [`theme`]: light/dark themes with terminal auto-detection

pub mod alerts;
pub mod common;
pub mod detail;
pub mod events_view;
pub mod overview;
pub mod theme;

pub use events_view::EventSortColumn;
pub use theme::Theme;
