//! Live data source polling the runtime REST API.
//!
//! Spawns one background task per endpoint (line state, PLC health, recent
//! events), each on its own fixed interval. The tasks publish into watch
//! slices that `poll()` merges into a [`TelemetrySnapshot`]. One slow or
//! failing endpoint never blocks the others; its slice simply reports an
//! error and carries no data until the next successful tick.
//!
//! A fourth task forwards line commands (pause / resume / stop) to the
//! backend and records the outcome for the status bar.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use crate::client::RuntimeClient;
use crate::source::{LineAction, LineState, PlcHealth, RuntimeEvent};

use super::{TelemetrySnapshot, TelemetrySource};

/// Poll intervals for the three runtime endpoints.
#[derive(Debug, Clone)]
pub struct PollIntervals {
    pub line: Duration,
    pub plc: Duration,
    pub events: Duration,
}

impl Default for PollIntervals {
    fn default() -> Self {
        Self {
            line: Duration::from_secs(5),
            plc: Duration::from_secs(5),
            events: Duration::from_secs(10),
        }
    }
}

/// One endpoint's latest result: data on success, an error string on
/// failure. A failed fetch clears the data so the deriver sees "no data"
/// rather than a stale reading.
#[derive(Debug, Clone)]
struct Slice<T> {
    data: Option<T>,
    error: Option<String>,
}

impl<T> Default for Slice<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
        }
    }
}

/// Handle for issuing line commands from the TUI thread.
///
/// Commands are fire-and-forget; the outcome message is picked up by the
/// app on its next tick via [`CommandSender::take_feedback`].
#[derive(Debug, Clone)]
pub struct CommandSender {
    tx: mpsc::UnboundedSender<LineAction>,
    feedback: Arc<Mutex<Option<String>>>,
}

impl CommandSender {
    /// Queue a line command. Returns false if the command task is gone.
    pub fn send(&self, action: LineAction) -> bool {
        self.tx.send(action).is_ok()
    }

    /// Take the outcome message of the most recent command, if any.
    pub fn take_feedback(&self) -> Option<String> {
        self.feedback.lock().unwrap().take()
    }
}

/// A data source that polls the live runtime API.
#[derive(Debug)]
pub struct HttpSource {
    line_rx: watch::Receiver<Slice<LineState>>,
    plc_rx: watch::Receiver<Slice<PlcHealth>>,
    events_rx: watch::Receiver<Slice<Vec<RuntimeEvent>>>,
    commander: CommandSender,
    description: String,
    handles: Vec<JoinHandle<()>>,
}

impl HttpSource {
    /// Spawn the pollers against the given client.
    ///
    /// Must be called within a tokio runtime. `events_window` maps to the
    /// `since_ms_ago` query parameter of the events endpoint.
    pub fn spawn(client: RuntimeClient, intervals: PollIntervals, events_window: Duration) -> Self {
        let description = format!("http: {}", client.describe_target());

        let (line_tx, line_rx) = watch::channel(Slice::default());
        let (plc_tx, plc_rx) = watch::channel(Slice::default());
        let (events_tx, events_rx) = watch::channel(Slice::default());
        let (cmd_tx, mut cmd_rx) = mpsc::unbounded_channel::<LineAction>();
        let feedback = Arc::new(Mutex::new(None));

        let mut handles = Vec::new();

        let line_client = client.clone();
        handles.push(tokio::spawn(async move {
            let mut tick = tokio::time::interval(intervals.line);
            loop {
                tick.tick().await;
                let slice = match line_client.line_state().await {
                    Ok(state) => Slice {
                        data: Some(state),
                        error: None,
                    },
                    Err(e) => Slice {
                        data: None,
                        error: Some(e.to_string()),
                    },
                };
                if line_tx.send(slice).is_err() {
                    break;
                }
            }
        }));

        let plc_client = client.clone();
        handles.push(tokio::spawn(async move {
            let mut tick = tokio::time::interval(intervals.plc);
            loop {
                tick.tick().await;
                let slice = match plc_client.plc_health().await {
                    Ok(health) => Slice {
                        data: Some(health),
                        error: None,
                    },
                    Err(e) => Slice {
                        data: None,
                        error: Some(e.to_string()),
                    },
                };
                if plc_tx.send(slice).is_err() {
                    break;
                }
            }
        }));

        let events_client = client.clone();
        handles.push(tokio::spawn(async move {
            let mut tick = tokio::time::interval(intervals.events);
            loop {
                tick.tick().await;
                let slice = match events_client.recent_events(events_window, None).await {
                    Ok(events) => Slice {
                        data: Some(events),
                        error: None,
                    },
                    Err(e) => Slice {
                        data: None,
                        error: Some(e.to_string()),
                    },
                };
                if events_tx.send(slice).is_err() {
                    break;
                }
            }
        }));

        let feedback_slot = feedback.clone();
        handles.push(tokio::spawn(async move {
            while let Some(action) = cmd_rx.recv().await {
                let message = match client.send_command(action).await {
                    Ok(()) => format!("Sent line command: {}", action.label()),
                    Err(e) => format!("Command {} failed: {}", action.label(), e),
                };
                *feedback_slot.lock().unwrap() = Some(message);
            }
        }));

        Self {
            line_rx,
            plc_rx,
            events_rx,
            commander: CommandSender {
                tx: cmd_tx,
                feedback,
            },
            description,
            handles,
        }
    }

    fn merged(&mut self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            line: self.line_rx.borrow_and_update().data.clone(),
            plc: self.plc_rx.borrow_and_update().data.clone(),
            events: self.events_rx.borrow_and_update().data.clone(),
        }
    }
}

impl TelemetrySource for HttpSource {
    fn poll(&mut self) -> Option<TelemetrySnapshot> {
        let changed = self.line_rx.has_changed().unwrap_or(false)
            || self.plc_rx.has_changed().unwrap_or(false)
            || self.events_rx.has_changed().unwrap_or(false);

        if changed {
            Some(self.merged())
        } else {
            None
        }
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(ref e) = self.line_rx.borrow().error {
            parts.push(format!("line: {}", e));
        }
        if let Some(ref e) = self.plc_rx.borrow().error {
            parts.push(format!("plc: {}", e));
        }
        if let Some(ref e) = self.events_rx.borrow().error {
            parts.push(format!("events: {}", e));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" | "))
        }
    }

    fn commander(&self) -> Option<CommandSender> {
        Some(self.commander.clone())
    }
}

impl Drop for HttpSource {
    fn drop(&mut self) {
        // Results arriving after teardown are discarded.
        for handle in &self.handles {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unreachable_client() -> RuntimeClient {
        // Reserved port on localhost; connections are refused immediately.
        RuntimeClient::builder()
            .endpoint("http://127.0.0.1:1")
            .site("plant-a")
            .line("line-1")
            .timeout(Duration::from_millis(200))
            .build()
    }

    fn fast_intervals() -> PollIntervals {
        PollIntervals {
            line: Duration::from_millis(10),
            plc: Duration::from_millis(10),
            events: Duration::from_millis(10),
        }
    }

    #[tokio::test]
    async fn test_failed_polls_surface_errors_not_data() {
        let mut source = unreachable_client()
            .into_source(fast_intervals(), Duration::from_secs(600));

        tokio::time::sleep(Duration::from_millis(300)).await;

        // All three slices failed; snapshot merges to empty.
        if let Some(snapshot) = source.poll() {
            assert!(snapshot.is_empty());
        }
        let error = source.error().expect("per-slice errors expected");
        assert!(error.contains("line:"));
        assert!(error.contains("plc:"));
        assert!(error.contains("events:"));
    }

    #[tokio::test]
    async fn test_commander_available_and_reports_failure() {
        let source = unreachable_client()
            .into_source(fast_intervals(), Duration::from_secs(600));

        let commander = source.commander().expect("http source has a commander");
        assert!(commander.send(LineAction::Pause));

        tokio::time::sleep(Duration::from_millis(300)).await;

        let feedback = commander.take_feedback().expect("command outcome expected");
        assert!(feedback.contains("pause"));
        // Second take returns nothing; the message was consumed.
        assert!(commander.take_feedback().is_none());
    }

    #[tokio::test]
    async fn test_description_names_target() {
        let source = unreachable_client()
            .into_source(fast_intervals(), Duration::from_secs(600));
        assert!(source.description().starts_with("http: "));
        assert!(source.description().contains("plant-a/line-1"));
    }
}
