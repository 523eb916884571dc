//! Data source abstraction for receiving telemetry snapshots.
//!
//! This module provides a trait-based abstraction for receiving runtime
//! telemetry from various sources (the live REST API, a mock JSON file,
//! or an in-memory channel).

mod channel;
mod file;
mod http;
mod snapshot;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use http::{CommandSender, HttpSource, PollIntervals};
pub use snapshot::{
    EventKind, LineAction, LineState, PlcHealth, PlcStatus, RuntimeEvent, TelemetrySnapshot,
};

use std::fmt::Debug;

/// Trait for receiving telemetry from various sources.
///
/// Implementations provide merged snapshots from different backends - the
/// live HTTP pollers, a mock telemetry file, or an in-memory channel.
///
/// # Example
///
/// ```
/// use akis_console::{FileSource, TelemetrySource};
///
/// let mut source = FileSource::new("telemetry.json");
/// if let Some(snapshot) = source.poll() {
///     println!("line slice present: {}", snapshot.line.is_some());
/// }
/// ```
pub trait TelemetrySource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<TelemetrySnapshot>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI status bar.
    fn description(&self) -> &str;

    /// Check if the source has encountered an error.
    ///
    /// Returns the error message if an error occurred during the last poll.
    /// Per-slice errors (one endpoint down while others answer) are reported
    /// here too, but never suppress the surviving slices.
    fn error(&self) -> Option<String>;

    /// Returns a handle for issuing line commands, if this source supports
    /// them. Only the live HTTP source does.
    fn commander(&self) -> Option<CommandSender> {
        None
    }
}
