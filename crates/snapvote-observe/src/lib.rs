//! Observability setup for SnapVote: structured logging and optional
//! OpenTelemetry span export.

pub mod tracing_setup;
