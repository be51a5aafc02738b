use crate::options::LogFormat;
use anyhow::Result;
use opentelemetry::sdk::propagation::TraceContextPropagator;
use opentelemetry::sdk::trace::{self, Sampler};
use opentelemetry::sdk::Resource;
use opentelemetry::global;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_semantic_conventions as semcov;
use std::time::Duration;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Installs the W3C trace context propagator
///
/// Required for linking consumer spans to remote traces even when no
/// exporter is configured.
pub fn init_propagator() {
    global::set_text_map_propagator(TraceContextPropagator::new());
}

/// Initialises the subscriber stack with an OTLP export pipeline attached
pub fn try_init(log: &str, format: LogFormat, endpoint: &str) -> Result<()> {
    let resource: Vec<KeyValue> = vec![
        semcov::resource::SERVICE_NAME.string("walletrelay"),
        semcov::resource::SERVICE_VERSION.string(env!("CARGO_PKG_VERSION")),
    ];

    let tracer = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(
            opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint)
                .with_timeout(Duration::from_secs(3)),
        )
        .with_trace_config(
            trace::config()
                .with_sampler(Sampler::AlwaysOn)
                .with_max_events_per_span(64)
                .with_max_attributes_per_span(16)
                .with_resource(Resource::new(resource)),
        )
        .install_batch(opentelemetry::runtime::Tokio)?;

    let fmt_layer = match format {
        LogFormat::Text => tracing_subscriber::fmt::layer().boxed(),
        LogFormat::Compact => tracing_subscriber::fmt::layer().compact().boxed(),
        LogFormat::Json => tracing_subscriber::fmt::layer().json().boxed(),
    };

    let telemetry = tracing_opentelemetry::layer().with_tracer(tracer);

    Registry::default()
        .with(EnvFilter::new(log))
        .with(fmt_layer)
        .with(telemetry)
        .try_init()?;

    Ok(())
}

/// Drains any spans still buffered in the export pipeline
pub fn flush() {
    global::shutdown_tracer_provider();
}
