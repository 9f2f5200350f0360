//! Logging for the `catalog` binary
//!
//! Console output is always on. With the `telemetry` feature, `--otel` adds
//! an OTLP span exporter on the same subscriber.
//!
//! Environment:
//!   RUST_LOG                      filter, e.g. `catalog_server=debug,sqlx=warn`
//!   OTEL_EXPORTER_OTLP_ENDPOINT   collector (default `http://localhost:4317`)
//!   OTEL_SERVICE_NAME             reported service (default `catalog`)

use anyhow::{anyhow, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Clone, Default)]
pub struct TracingConfig {
    /// Debug level unless `RUST_LOG` says otherwise
    pub debug: bool,
    /// Export spans over OTLP
    pub otel: bool,
}

impl TracingConfig {
    fn default_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }

    fn filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(self.default_level()))
    }
}

/// Install the global subscriber. Fails if one is already set.
///
/// `otel` is ignored when the binary is built without `telemetry`.
pub fn init(config: &TracingConfig) -> Result<()> {
    let console = tracing_subscriber::fmt::layer()
        .with_target(config.debug)
        .compact();

    let registry = tracing_subscriber::registry()
        .with(config.filter())
        .with(console);

    #[cfg(feature = "telemetry")]
    let registry = registry.with(if config.otel {
        Some(otlp::layer()?)
    } else {
        None
    });

    registry.try_init().map_err(|err| anyhow!(err))?;

    #[cfg(feature = "telemetry")]
    if config.otel {
        tracing::info!(endpoint = %otlp::endpoint(), "exporting spans over OTLP");
    }

    Ok(())
}

#[cfg(feature = "telemetry")]
mod otlp {
    use anyhow::{anyhow, Result};
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::{Tracer, TracerProvider};
    use opentelemetry_sdk::{runtime, Resource};
    use tracing::Subscriber;
    use tracing_opentelemetry::OpenTelemetryLayer;
    use tracing_subscriber::registry::LookupSpan;

    pub(super) fn endpoint() -> String {
        std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .unwrap_or_else(|_| "http://localhost:4317".to_string())
    }

    pub(super) fn layer<S>() -> Result<OpenTelemetryLayer<S, Tracer>>
    where
        S: Subscriber + for<'span> LookupSpan<'span>,
    {
        let service = std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "catalog".to_string());

        let exporter = opentelemetry_otlp::SpanExporter::builder()
            .with_tonic()
            .with_endpoint(endpoint())
            .build()
            .map_err(|e| anyhow!("OTLP exporter: {}", e))?;

        let provider = TracerProvider::builder()
            .with_batch_exporter(exporter, runtime::Tokio)
            .with_resource(Resource::new(vec![KeyValue::new("service.name", service)]))
            .build();
        let tracer = provider.tracer("catalog");

        // The global handle keeps the provider alive until shutdown_otel
        let _ = opentelemetry::global::set_tracer_provider(provider);

        Ok(tracing_opentelemetry::layer().with_tracer(tracer))
    }
}

/// Flush pending spans before exit
#[cfg(feature = "telemetry")]
pub fn shutdown_otel() {
    opentelemetry::global::shutdown_tracer_provider();
}

#[cfg(not(feature = "telemetry"))]
pub fn shutdown_otel() {}
