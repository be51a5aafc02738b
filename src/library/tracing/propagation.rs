use super::global_tracer;
use opentelemetry::propagation::Extractor;
use opentelemetry::trace::{FutureExt, Link, SpanKind, TraceContextExt, Tracer};
use opentelemetry::{global, Context};
use std::future::Future;

/// Builds the context for a local unit of work that was caused by a remote one
///
/// The returned context holds a fresh consumer span parented to the current
/// (local) context. When a remote carrier is present and decodes into a valid
/// span context, that remote context is attached as a *link*: the local
/// processing is causally related to, but not nested inside, the producer's
/// trace.
pub fn remote_linked_context(span_name: &'static str, remote: Option<&dyn Extractor>) -> Context {
    let tracer = global_tracer();
    let mut builder = tracer.span_builder(span_name).with_kind(SpanKind::Consumer);

    if let Some(carrier) = remote {
        let remote_context = global::get_text_map_propagator(|propagator| propagator.extract(carrier));
        let remote_span_context = remote_context.span().span_context().clone();

        if remote_span_context.is_valid() {
            builder = builder.with_links(vec![Link::new(remote_span_context, Vec::new())]);
        }
    }

    let span = builder.start_with_context(&tracer, &Context::current());

    Context::current_with_span(span)
}

/// Runs a future to completion with the given context attached
///
/// The context is re-attached at every poll, so downstream asynchronous calls
/// started anywhere inside the future parent to this span even when the
/// runtime migrates the work across threads. The span is ended exactly once,
/// after the future has resolved, regardless of its outcome.
pub async fn in_span<F>(cx: Context, future: F) -> F::Output
where
    F: Future,
{
    let result = future.with_context(cx.clone()).await;
    cx.span().end();

    result
}

#[cfg(test)]
mod does {
    use super::*;
    use opentelemetry::sdk::propagation::TraceContextPropagator;
    use std::collections::HashMap;

    struct MapCarrier(HashMap<&'static str, String>);

    impl Extractor for MapCarrier {
        fn get(&self, key: &str) -> Option<&str> {
            self.0.get(key).map(|value| value.as_str())
        }

        fn keys(&self) -> Vec<&str> {
            self.0.keys().copied().collect()
        }
    }

    #[test]
    fn extract_remote_span_context() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let mut map = HashMap::new();
        map.insert(
            "traceparent",
            "00-0af7651916cd43dd8448eb211c80319c-b7ad6b7169203331-01".to_owned(),
        );
        let carrier = MapCarrier(map);

        let context = global::get_text_map_propagator(|propagator| propagator.extract(&carrier));
        let span_context = context.span().span_context().clone();

        assert!(span_context.is_valid());
        assert_eq!(
            span_context.trace_id().to_string(),
            "0af7651916cd43dd8448eb211c80319c"
        );
    }

    #[test]
    fn tolerate_missing_carrier() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let context = remote_linked_context("unit-of-work", None);

        // Without an exporter the span is a no-op, but the context must still be usable
        assert!(!context.span().span_context().is_remote());
    }

    #[tokio::test]
    async fn close_span_after_future() {
        global::set_text_map_propagator(TraceContextPropagator::new());

        let context = remote_linked_context("unit-of-work", None);
        let value = in_span(context, async { 42 }).await;

        assert_eq!(value, 42);
    }
}
