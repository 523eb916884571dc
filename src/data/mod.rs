//! Data models and processing for runtime telemetry.
//!
//! This module turns raw telemetry snapshots into the derived health
//! used everywhere in the UI.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "5s", "10m")
//! - [`health`]: The health deriver ([`HealthResult`], [`HealthLevel`])
//!
//! ## Data Flow
//!
//! ```text
//! TelemetrySnapshot (merged slices)
//!        │
//!        ▼
//! HealthResult::from_snapshot()
//!        │
//!        └──▶ level + ordered alerts + SAFETY/FAULT/PLC_DEVICE buckets
//! ```

pub mod duration;
pub mod health;

pub use health::{HealthLevel, HealthResult};
