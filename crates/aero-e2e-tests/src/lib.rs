//! End-to-end integration tests for the Aero telemetry node.
//!
//! All tests live under `tests/`; this crate intentionally exports
//! nothing.
