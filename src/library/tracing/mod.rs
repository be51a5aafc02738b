//! Tracing module
//!
//! This module contains all the tools necessary to link local processing
//! spans with remote trace contexts in conformance with OpenTelemetry.

pub mod constants;
mod propagation;

pub use propagation::*;

use opentelemetry::global::{self, BoxedTracer};

/// Retrieves the tracer every unit of work in this process reports to
pub fn global_tracer() -> BoxedTracer {
    global::tracer("walletrelay/main")
}
