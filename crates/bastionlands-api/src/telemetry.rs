//! Tracing setup: JSON logs, plus OTLP span export when a collector is
//! configured.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_otlp::{SpanExporter, WithExportConfig};
use opentelemetry_sdk::Resource;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing::warn;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::AppError;

const SERVICE_NAME: &str = "bastionlands-api";

/// Keeps the span exporter alive until shutdown.
#[derive(Debug)]
pub struct Telemetry {
    provider: Option<SdkTracerProvider>,
}

impl Telemetry {
    /// Flushes any buffered spans.
    pub fn shutdown(self) {
        if let Some(provider) = self.provider {
            if let Err(e) = provider.shutdown() {
                warn!(error = %e, "span exporter did not shut down cleanly");
            }
        }
    }
}

fn tracer_provider(endpoint: &str) -> Result<SdkTracerProvider, AppError> {
    let exporter = SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()
        .map_err(|e| AppError::Telemetry(format!("OTLP exporter: {e}")))?;

    Ok(SdkTracerProvider::builder()
        .with_batch_exporter(exporter)
        .with_resource(Resource::builder().with_service_name(SERVICE_NAME).build())
        .build())
}

/// Installs the global subscriber. The filter comes from `RUST_LOG`,
/// defaulting to `info`.
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the exporter cannot be built or a
/// subscriber is already installed.
pub fn init(otlp_endpoint: Option<&str>) -> Result<Telemetry, AppError> {
    let provider = otlp_endpoint.map(tracer_provider).transpose()?;
    let otel_layer = provider.as_ref().map(|provider| {
        tracing_opentelemetry::layer().with_tracer(provider.tracer(SERVICE_NAME))
    });

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().json())
        .with(otel_layer)
        .try_init()
        .map_err(|e| AppError::Telemetry(e.to_string()))?;

    if let Some(provider) = &provider {
        opentelemetry::global::set_tracer_provider(provider.clone());
    }

    Ok(Telemetry { provider })
}
