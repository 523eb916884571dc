//! Runtime health derivation.
//!
//! This module maps the latest polled snapshots (line state, PLC health,
//! recent events) into one severity level and an ordered list of
//! human-readable alerts. It is a pure per-tick computation: no state is
//! carried between calls, and identical inputs always produce identical
//! output.

use crate::source::{EventKind, LineState, PlcHealth, PlcStatus, RuntimeEvent, TelemetrySnapshot};

/// Overall severity of the line, worst-first ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthLevel {
    Ok,
    Warn,
    Alert,
}

impl HealthLevel {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthLevel::Ok => "OK",
            HealthLevel::Warn => "WARN",
            HealthLevel::Alert => "ALERT",
        }
    }
}

/// Derived health for the current tick.
///
/// The event buckets hold the SAFETY / FAULT / PLC_DEVICE events that
/// contributed to the level; other kinds are excluded here but still appear
/// in the full event list.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthResult {
    pub level: HealthLevel,
    /// Human-readable alert strings, in fixed precedence order.
    pub alerts: Vec<String>,
    pub safety_events: Vec<RuntimeEvent>,
    pub fault_events: Vec<RuntimeEvent>,
    pub plc_device_events: Vec<RuntimeEvent>,
}

impl Default for HealthResult {
    fn default() -> Self {
        Self {
            level: HealthLevel::Ok,
            alerts: Vec::new(),
            safety_events: Vec::new(),
            fault_events: Vec::new(),
            plc_device_events: Vec::new(),
        }
    }
}

impl HealthResult {
    /// Derive health from the merged snapshot.
    pub fn from_snapshot(snapshot: &TelemetrySnapshot) -> Self {
        Self::derive(
            snapshot.line.as_ref(),
            snapshot.plc.as_ref(),
            snapshot.events.as_deref(),
        )
    }

    /// Derive health from the three independently-polled slices.
    ///
    /// Any slice may be absent; missing data is never alarming on its own.
    /// A missing PLC slice reads as UNKNOWN status, which does not raise
    /// an alert.
    ///
    /// Severity precedence, first match wins:
    /// 1. ALERT - e-stop, latched fault, or PLC in MISCONFIGURED / OFFLINE /
    ///    ERROR.
    /// 2. WARN - line PAUSED, or any safety/fault/PLC-device event in the
    ///    window.
    /// 3. OK otherwise.
    pub fn derive(
        line: Option<&LineState>,
        plc: Option<&PlcHealth>,
        events: Option<&[RuntimeEvent]>,
    ) -> Self {
        let e_stop = line.map_or(false, |l| l.e_stop_active);
        let fault = line.map_or(false, |l| l.fault_active);
        let plc_status = plc.map_or(PlcStatus::Unknown, |p| p.status);
        let paused = line.map_or(false, |l| l.state == "PAUSED");

        let mut safety_events = Vec::new();
        let mut fault_events = Vec::new();
        let mut plc_device_events = Vec::new();
        for event in events.unwrap_or_default() {
            match event.kind {
                EventKind::Safety => safety_events.push(event.clone()),
                EventKind::Fault => fault_events.push(event.clone()),
                EventKind::PlcDevice => plc_device_events.push(event.clone()),
                _ => {}
            }
        }

        // Alert strings in fixed order. The branches are not mutually
        // exclusive; every applicable string is appended.
        let mut alerts = Vec::new();
        if plc_status == PlcStatus::Misconfigured {
            alerts.push("PLC misconfigured".to_string());
        }
        if plc_status == PlcStatus::Offline {
            alerts.push("PLC offline".to_string());
        }
        if plc_status == PlcStatus::Error {
            alerts.push("PLC driver error".to_string());
        }
        if e_stop {
            alerts.push("E-stop active".to_string());
        }
        if fault {
            alerts.push("PLC fault active".to_string());
        }

        let plc_down = matches!(
            plc_status,
            PlcStatus::Misconfigured | PlcStatus::Offline | PlcStatus::Error
        );

        let level = if e_stop || fault || plc_down {
            HealthLevel::Alert
        } else if paused
            || !safety_events.is_empty()
            || !fault_events.is_empty()
            || !plc_device_events.is_empty()
        {
            HealthLevel::Warn
        } else {
            HealthLevel::Ok
        };

        Self {
            level,
            alerts,
            safety_events,
            fault_events,
            plc_device_events,
        }
    }

    /// Total number of events that contributed to the health level.
    pub fn bucketed_event_count(&self) -> usize {
        self.safety_events.len() + self.fault_events.len() + self.plc_device_events.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nominal_line() -> LineState {
        LineState {
            state: "RUNNING".to_string(),
            e_stop_active: false,
            fault_active: false,
        }
    }

    fn plc(status: PlcStatus) -> PlcHealth {
        PlcHealth {
            status,
            connector: None,
            hardware_mode: None,
            real_io_mode: None,
            driver_health: None,
        }
    }

    fn event(id: u64, kind: EventKind) -> RuntimeEvent {
        RuntimeEvent {
            id,
            kind,
            created_at: 1_700_000_000_000,
            message: format!("event {}", id),
            payload: None,
        }
    }

    #[test]
    fn test_all_nominal_is_ok() {
        let line = nominal_line();
        let plc = plc(PlcStatus::Real);
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&[]));
        assert_eq!(result.level, HealthLevel::Ok);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_e_stop_is_alert() {
        let mut line = nominal_line();
        line.e_stop_active = true;
        let plc = plc(PlcStatus::Real);
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&[]));
        assert_eq!(result.level, HealthLevel::Alert);
        assert!(result.alerts.iter().any(|a| a == "E-stop active"));
    }

    #[test]
    fn test_plc_offline_is_alert_regardless_of_buckets() {
        let line = nominal_line();
        let plc = plc(PlcStatus::Offline);
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&[]));
        assert_eq!(result.level, HealthLevel::Alert);
        assert_eq!(result.alerts, vec!["PLC offline".to_string()]);
    }

    #[test]
    fn test_paused_is_warn() {
        let mut line = nominal_line();
        line.state = "PAUSED".to_string();
        let plc = plc(PlcStatus::Real);
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&[]));
        assert_eq!(result.level, HealthLevel::Warn);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_no_data_is_ok() {
        let result = HealthResult::derive(None, None, None);
        assert_eq!(result.level, HealthLevel::Ok);
        assert!(result.alerts.is_empty());
        assert_eq!(result.bucketed_event_count(), 0);
    }

    #[test]
    fn test_single_safety_event_is_warn() {
        let line = nominal_line();
        let plc = plc(PlcStatus::Real);
        let events = [event(1, EventKind::Safety)];
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&events));
        assert_eq!(result.level, HealthLevel::Warn);
        assert_eq!(result.safety_events.len(), 1);
        assert!(result.fault_events.is_empty());
    }

    #[test]
    fn test_plc_conn_and_other_events_ignored_for_health() {
        let line = nominal_line();
        let plc = plc(PlcStatus::Real);
        let events = [event(1, EventKind::PlcConn), event(2, EventKind::Other)];
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&events));
        assert_eq!(result.level, HealthLevel::Ok);
        assert_eq!(result.bucketed_event_count(), 0);
    }

    #[test]
    fn test_missing_plc_is_not_alarming() {
        let line = nominal_line();
        let result = HealthResult::derive(Some(&line), None, Some(&[]));
        assert_eq!(result.level, HealthLevel::Ok);
        assert!(result.alerts.is_empty());
    }

    #[test]
    fn test_alert_strings_keep_fixed_order() {
        let mut line = nominal_line();
        line.e_stop_active = true;
        line.fault_active = true;
        let plc = plc(PlcStatus::Error);
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&[]));
        assert_eq!(
            result.alerts,
            vec![
                "PLC driver error".to_string(),
                "E-stop active".to_string(),
                "PLC fault active".to_string(),
            ]
        );
    }

    #[test]
    fn test_alert_wins_over_warn() {
        let mut line = nominal_line();
        line.state = "PAUSED".to_string();
        line.fault_active = true;
        let plc = plc(PlcStatus::Real);
        let events = [event(1, EventKind::Fault)];
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&events));
        assert_eq!(result.level, HealthLevel::Alert);
        // The fault event still lands in its bucket.
        assert_eq!(result.fault_events.len(), 1);
    }

    #[test]
    fn test_unknown_plc_status_is_not_alert() {
        let line = nominal_line();
        let plc = plc(PlcStatus::Unknown);
        let result = HealthResult::derive(Some(&line), Some(&plc), Some(&[]));
        assert_eq!(result.level, HealthLevel::Ok);
    }

    #[test]
    fn test_idempotent_for_identical_inputs() {
        let mut line = nominal_line();
        line.state = "PAUSED".to_string();
        let plc = plc(PlcStatus::Simulation);
        let events = [event(1, EventKind::PlcDevice), event(2, EventKind::Safety)];
        let a = HealthResult::derive(Some(&line), Some(&plc), Some(&events));
        let b = HealthResult::derive(Some(&line), Some(&plc), Some(&events));
        assert_eq!(a, b);
    }

    #[test]
    fn test_level_ordering() {
        assert!(HealthLevel::Alert > HealthLevel::Warn);
        assert!(HealthLevel::Warn > HealthLevel::Ok);
        assert_eq!(HealthLevel::Alert.symbol(), "ALERT");
    }
}
