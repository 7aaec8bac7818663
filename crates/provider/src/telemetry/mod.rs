//! Telemetry setup: structured JSON logs plus optional OTLP trace export.
//!
//! # Telemetry invariants
//!
//! - **No sensitive attribute values** (e.g. `plaintext`) may appear in any span
//!   attribute or log field. Only key identifiers and instance ids are logged.
//! - Log level is configurable via `LOG_LEVEL` (default: `info`).

pub mod init;

pub use init::init_telemetry;
