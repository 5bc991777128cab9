//! lib.rs - telemetry hub building blocks
//!
//! the binary in main.rs wires these together; they are a library so the
//! HTTP contract tests in tests/ can drive a real server in-process.
//!
//! core pieces:
//!     store.rs      latest-reading cache, one slot per meter
//!     freshness.rs  live/offline policy (10 s staleness window)
//!     units.rs      magnitude-based unit promotion for display
//!
//! plumbing:
//!     reading.rs    sample type + lenient ingest coercion
//!     web.rs        POST /readings, GET /latest
//!     clock.rs      injected time source
//!     config.rs     hub.toml schema
//!     spoke.rs      simulated meter (push client)
//!     monitor.rs    dashboard stand-in (poll client)

pub mod clock;
pub mod config;
pub mod freshness;
pub mod monitor;
pub mod reading;
pub mod spoke;
pub mod store;
pub mod units;
pub mod web;
