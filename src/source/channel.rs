//! Channel-based data source.
//!
//! Receives telemetry snapshots via a tokio watch channel. This is useful
//! for embedding the console in another process, or for tests that push
//! synthetic snapshots.

use tokio::sync::watch;

use super::{TelemetrySnapshot, TelemetrySource};

/// A data source that receives telemetry snapshots via a channel.
///
/// The producer sends merged snapshots through the channel and this source
/// provides them to the TUI.
///
/// # Example
///
/// ```
/// use akis_console::ChannelSource;
///
/// // Create a channel pair
/// let (tx, source) = ChannelSource::create("synthetic");
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: watch::Receiver<TelemetrySnapshot>,
    description: String,
    /// Track if we've returned the initial value yet
    initial_returned: bool,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// # Arguments
    ///
    /// * `receiver` - The receiving end of a watch channel
    /// * `source_description` - A description of where snapshots come from
    pub fn new(receiver: watch::Receiver<TelemetrySnapshot>, source_description: &str) -> Self {
        let description = format!("channel: {}", source_description);
        Self {
            receiver,
            description,
            initial_returned: false,
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    ///
    /// Returns (sender, source) where the sender can be used to push
    /// snapshots and the source can be handed to the TUI.
    pub fn create(source_description: &str) -> (watch::Sender<TelemetrySnapshot>, Self) {
        let (tx, rx) = watch::channel(TelemetrySnapshot::default());
        let source = Self::new(rx, source_description);
        (tx, source)
    }
}

impl TelemetrySource for ChannelSource {
    fn poll(&mut self) -> Option<TelemetrySnapshot> {
        // Return the initial value on first poll
        if !self.initial_returned {
            self.initial_returned = true;
            self.receiver.mark_changed();
        }

        // Check if there's a new value without blocking
        if self.receiver.has_changed().unwrap_or(false) {
            let snapshot = self.receiver.borrow_and_update().clone();
            Some(snapshot)
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        // Connection errors are the producer's concern; the channel itself
        // cannot fail short of being dropped.
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{LineState, PlcHealth, PlcStatus};

    #[test]
    fn test_channel_source_poll() {
        let (tx, mut source) = ChannelSource::create("test");

        // Initially returns the default (empty) snapshot
        let snapshot = source.poll();
        assert!(snapshot.unwrap().is_empty());

        // No change, so poll returns None
        assert!(source.poll().is_none());

        // Send a new snapshot
        let new_snapshot = TelemetrySnapshot {
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
            events: Some(Vec::new()),
        };
        tx.send(new_snapshot).unwrap();

        // Now poll returns the new snapshot
        let snapshot = source.poll().unwrap();
        assert_eq!(snapshot.line.unwrap().state, "RUNNING");
    }

    #[test]
    fn test_channel_source_description() {
        let (_tx, source) = ChannelSource::create("synthetic");
        assert_eq!(source.description(), "channel: synthetic");
    }
}
