//! Observability for Guriri: tracing subscriber setup with an optional log
//! file and optional OpenTelemetry export.

pub mod tracing_setup;
