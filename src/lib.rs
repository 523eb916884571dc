// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # akis-console
//!
//! A diagnostic TUI and library for monitoring an AKIS sorting line runtime.
//!
//! This crate provides tools for watching the health of a sorting line: the
//! line state machine, the PLC connection behind it, and the recent runtime
//! event log. Telemetry can come from the runtime's REST API, a mock JSON
//! file, or an in-process channel, and is displayed in an interactive
//! terminal UI with a derived OK/WARN/ALERT severity.
//!
//! ## Architecture
//!
//! The crate is organized into five main modules:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                        Application                           │
//! │  ┌─────────┐    ┌──────────┐    ┌─────────┐    ┌─────────┐  │
//! │  │  app    │───▶│   data   │───▶│   ui    │───▶│ Terminal│  │
//! │  │ (state) │    │ (health) │    │(rendering)   │         │  │
//! │  └────┬────┘    └──────────┘    └─────────┘    └─────────┘  │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                       ┌────────┐                │
//! │  │ source  │◀── HttpSource ◀───────│ client │──▶ runtime API │
//! │  │ (input) │◀── FileSource | ChannelSource                   │
//! │  └─────────┘                       └────────┘                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: Application state, view navigation, and user interaction logic
//! - **[`source`]**: Data source abstraction ([`TelemetrySource`] trait) with
//!   implementations for HTTP polling, file polling, and channel-based input
//! - **[`client`]**: Async REST client for the runtime API with its error taxonomy
//! - **[`data`]**: Health derivation - collapses a [`TelemetrySnapshot`] into a
//!   [`HealthResult`] with ordered alert strings and event buckets
//! - **[`ui`]**: Terminal rendering using ratatui - overview cards, event table,
//!   alert buckets, and theme support
//!
//! ## Features
//!
//! - **Overview**: Line mode, e-stop and fault flags, PLC health, active alerts
//! - **Events**: Windowed runtime event table with sorting and filtering
//! - **Alerts**: Ordered alert strings with the event buckets behind them
//! - **Line commands**: pause / resume / stop sent back to the runtime
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a mock telemetry JSON file
//! akis-console --file telemetry.json
//!
//! # Watch the live runtime API
//! akis-console --endpoint http://localhost:8080 --site plant-a --line line-1
//! ```
//!
//! ### As a library with file source
//!
//! ```
//! use akis_console::{App, FileSource};
//!
//! let source = Box::new(FileSource::new("telemetry.json"));
//! let app = App::new(source);
//! ```
//!
//! ### As a library with the HTTP polling source
//!
//! ```no_run
//! use akis_console::{PollIntervals, RuntimeClient};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let client = RuntimeClient::builder()
//!     .endpoint("http://localhost:8080")
//!     .site("plant-a")
//!     .line("line-1")
//!     .build();
//! let source = client.into_source(PollIntervals::default(), Duration::from_secs(600));
//! let app = akis_console::App::new(Box::new(source));
//! # });
//! ```
//!
//! ### As a library with channel source (for embedding)
//!
//! ```
//! use akis_console::{App, ChannelSource};
//!
//! // Create a channel for pushing snapshots
//! let (tx, source) = ChannelSource::create("embedded");
//!
//! // Create the app
//! let app = App::new(Box::new(source));
//! ```
//!
//! ### Deriving health without the UI
//!
//! ```
//! use akis_console::{HealthLevel, HealthResult, TelemetrySnapshot};
//!
//! let snapshot = TelemetrySnapshot::default();
//! let health = HealthResult::from_snapshot(&snapshot);
//! assert_eq!(health.level, HealthLevel::Ok);
//! ```

pub mod app;
pub mod client;
pub mod data;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::App;
pub use client::{ClientError, RuntimeClient};
pub use data::{HealthLevel, HealthResult};
pub use source::{
    ChannelSource, EventKind, FileSource, HttpSource, LineAction, LineState, PlcHealth, PlcStatus,
    PollIntervals, RuntimeEvent, TelemetrySnapshot, TelemetrySource,
};
