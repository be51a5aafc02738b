//! Envelopes and events flowing through the data plane queues

mod cdc;
mod wallet;

pub use cdc::*;
pub use wallet::*;

use opentelemetry::propagation::Extractor;
use serde::{Deserialize, Serialize};

/// Constant for the traceparent header name
pub const TRACEPARENT: &str = "traceparent";
/// Constant for the tracestate header name
pub const TRACESTATE: &str = "tracestate";
/// Constant for the baggage header name
pub const BAGGAGE: &str = "baggage";

/// Remote trace context carried alongside a queued event
///
/// Mirrors the W3C trace headers of the producing service so the consumer
/// can link its own processing span to the producer's trace.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingInfo {
    /// Serialized `traceparent` header of the producer
    pub traceparent: Option<String>,
    /// Serialized `tracestate` header of the producer
    pub tracestate: Option<String>,
    /// Serialized `baggage` header of the producer
    pub baggage: Option<String>,
}

impl Extractor for TracingInfo {
    fn get(&self, key: &str) -> Option<&str> {
        match key {
            TRACEPARENT => self.traceparent.as_deref(),
            TRACESTATE => self.tracestate.as_deref(),
            BAGGAGE => self.baggage.as_deref(),
            _ => None,
        }
    }

    fn keys(&self) -> Vec<&str> {
        vec![TRACEPARENT, TRACESTATE, BAGGAGE]
    }
}

/// Envelope wrapping every event delivered through an inbound queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEvent<T> {
    /// The event itself
    pub data: T,
    /// Trace context of the producer, absent when the producer is untraced
    #[serde(default)]
    pub tracing_info: Option<TracingInfo>,
}

#[cfg(test)]
mod does {
    use super::*;

    #[test]
    fn extract_tracing_fields_by_header_name() {
        let info = TracingInfo {
            traceparent: Some("00-abc-def-01".into()),
            tracestate: None,
            baggage: Some("tenant=wallet".into()),
        };

        assert_eq!(info.get(TRACEPARENT), Some("00-abc-def-01"));
        assert_eq!(info.get(TRACESTATE), None);
        assert_eq!(info.get(BAGGAGE), Some("tenant=wallet"));
        assert_eq!(info.get("x-unknown"), None);
    }

    #[test]
    fn tolerate_absent_tracing_info() {
        let parsed: QueueEvent<String> =
            serde_json::from_str(r#"{"data":"payload"}"#).unwrap();

        assert_eq!(parsed.tracing_info, None);
    }
}
