//! Shared types for runtime telemetry snapshots.
//!
//! These types match the JSON served by the AKIS runtime API
//! (`/api/runtime/...`). They are the common data format between the
//! backend and this console, regardless of which source delivered them.

use serde::{Deserialize, Serialize};

/// Current operating snapshot of the conveyor line.
///
/// Fully replaced on every poll; no history is kept client-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineState {
    /// Operating mode, e.g. "RUNNING", "PAUSED", "FAULT_STOP", "SAFE_STOP".
    /// Treated as an open string set - the backend may add modes.
    pub state: String,

    /// Emergency stop signal from the physical line.
    pub e_stop_active: bool,

    /// A line fault is currently latched.
    pub fault_active: bool,
}

/// Connection status of the PLC driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlcStatus {
    /// Driving real hardware I/O.
    Real,
    /// Running against the simulator.
    Simulation,
    /// Driver reachable but the PLC is not.
    Offline,
    /// Driver configuration does not match the hardware.
    Misconfigured,
    /// Driver reported an internal error.
    Error,
    /// Status not reported or not recognized.
    #[serde(other)]
    Unknown,
}

impl PlcStatus {
    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            PlcStatus::Real => "REAL",
            PlcStatus::Simulation => "SIMULATION",
            PlcStatus::Offline => "OFFLINE",
            PlcStatus::Misconfigured => "MISCONFIGURED",
            PlcStatus::Error => "ERROR",
            PlcStatus::Unknown => "UNKNOWN",
        }
    }
}

/// Polled snapshot of PLC connector health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlcHealth {
    pub status: PlcStatus,

    /// Connector identifier, e.g. "opcua-main".
    #[serde(default)]
    pub connector: Option<String>,

    /// Hardware mode string reported by the driver.
    #[serde(default)]
    pub hardware_mode: Option<String>,

    /// Whether real I/O is wired through, as reported by the driver.
    #[serde(default)]
    pub real_io_mode: Option<String>,

    /// Opaque driver health detail. Surfaced verbatim, never interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_health: Option<String>,
}

/// Classification of a runtime event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventKind {
    Safety,
    Fault,
    PlcDevice,
    PlcConn,
    /// Any kind this console does not classify. Shown in the event list
    /// but ignored by the health deriver.
    #[serde(other)]
    Other,
}

impl EventKind {
    /// Short label for display and for the `kind` query parameter.
    pub fn label(&self) -> &'static str {
        match self {
            EventKind::Safety => "SAFETY",
            EventKind::Fault => "FAULT",
            EventKind::PlcDevice => "PLC_DEVICE",
            EventKind::PlcConn => "PLC_CONN",
            EventKind::Other => "OTHER",
        }
    }
}

/// An immutable entry from the runtime event log.
///
/// Surfaced via a windowed query (`since_ms_ago`); entries are not retained
/// beyond the current poll's response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeEvent {
    pub id: u64,
    pub kind: EventKind,

    /// Creation time as epoch milliseconds.
    pub created_at: u64,

    /// Human-readable summary of the event.
    #[serde(alias = "summary")]
    pub message: String,

    /// Structured detail, if the backend attached any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<serde_json::Value>,
}

/// Command actions accepted by `POST /api/runtime/line/command`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineAction {
    Pause,
    Resume,
    Stop,
}

impl LineAction {
    pub fn label(&self) -> &'static str {
        match self {
            LineAction::Pause => "pause",
            LineAction::Resume => "resume",
            LineAction::Stop => "stop",
        }
    }
}

/// The merged view of everything the pollers know right now.
///
/// Each slice is independently nullable: a failed or not-yet-completed poll
/// leaves its slice `None` without touching the others.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    #[serde(default)]
    pub line: Option<LineState>,
    #[serde(default)]
    pub plc: Option<PlcHealth>,
    #[serde(default)]
    pub events: Option<Vec<RuntimeEvent>>,
}

impl TelemetrySnapshot {
    /// True if no slice has data yet.
    pub fn is_empty(&self) -> bool {
        self.line.is_none() && self.plc.is_none() && self.events.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_line_state() {
        let json = r#"{"state":"RUNNING","e_stop_active":false,"fault_active":false}"#;
        let line: LineState = serde_json::from_str(json).unwrap();
        assert_eq!(line.state, "RUNNING");
        assert!(!line.e_stop_active);
        assert!(!line.fault_active);
    }

    #[test]
    fn test_deserialize_plc_health() {
        let json = r#"{
            "status": "REAL",
            "connector": "opcua-main",
            "hardware_mode": "production",
            "real_io_mode": "enabled",
            "driver_health": "ok"
        }"#;
        let plc: PlcHealth = serde_json::from_str(json).unwrap();
        assert_eq!(plc.status, PlcStatus::Real);
        assert_eq!(plc.connector.as_deref(), Some("opcua-main"));
        assert_eq!(plc.driver_health.as_deref(), Some("ok"));
    }

    #[test]
    fn test_unknown_plc_status_decodes() {
        let json = r#"{"status":"SOMETHING_NEW"}"#;
        let plc: PlcHealth = serde_json::from_str(json).unwrap();
        assert_eq!(plc.status, PlcStatus::Unknown);
    }

    #[test]
    fn test_deserialize_event_with_summary_alias() {
        let json = r#"{
            "id": 42,
            "kind": "SAFETY",
            "created_at": 1700000000000,
            "summary": "Light curtain broken",
            "payload": {"zone": 3}
        }"#;
        let event: RuntimeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 42);
        assert_eq!(event.kind, EventKind::Safety);
        assert_eq!(event.message, "Light curtain broken");
        assert!(event.payload.is_some());
    }

    #[test]
    fn test_unknown_event_kind_decodes_as_other() {
        let json = r#"{"id":1,"kind":"AUDIT","created_at":0,"message":"x"}"#;
        let event: RuntimeEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.kind, EventKind::Other);
    }

    #[test]
    fn test_line_action_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&LineAction::Pause).unwrap(),
            r#""pause""#
        );
        assert_eq!(
            serde_json::to_string(&LineAction::Stop).unwrap(),
            r#""stop""#
        );
    }

    #[test]
    fn test_deserialize_merged_snapshot() {
        let json = r#"{
            "line": {"state":"PAUSED","e_stop_active":false,"fault_active":false},
            "plc": {"status":"SIMULATION"},
            "events": []
        }"#;
        let snapshot: TelemetrySnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.is_empty());
        assert_eq!(snapshot.line.unwrap().state, "PAUSED");
        assert_eq!(snapshot.plc.unwrap().status, PlcStatus::Simulation);
        assert_eq!(snapshot.events.unwrap().len(), 0);
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot: TelemetrySnapshot = serde_json::from_str("{}").unwrap();
        assert!(snapshot.is_empty());
    }
}
