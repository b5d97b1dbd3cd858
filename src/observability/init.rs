//! Tracing initialization and subscriber setup.

use super::tracer;
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::resource::Resource;
use std::path::PathBuf;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Service name attached to every exported span.
pub const SERVICE_NAME: &str = "eventmap";

/// Span file inside the data directory.
pub const SPAN_FILE: &str = "eventmap-spans.jsonl";

/// Path spans are written to for `config`.
#[must_use]
pub fn span_file_path(config: &Config) -> PathBuf {
    config.data_dir.join(SPAN_FILE)
}

/// Installs the global subscriber.
///
/// The pipeline filters by `RUST_LOG` when set, otherwise by
/// `config.trace_level`, exports spans through OpenTelemetry to a rotating
/// file in `config.data_dir`, and also prints human-readable lines to stderr
/// when `config.log_to_stderr` is set.
///
/// Observability is optional: if the data directory cannot be created the
/// function returns without installing anything, and a second call is a
/// no-op.
///
/// # Example
///
/// ```rust
/// use eventmap::observability::init_tracing;
/// use eventmap::Config;
///
/// let config = Config {
///     trace_level: "debug".to_string(),
///     data_dir: std::env::temp_dir().join("eventmap-doc"),
///     ..Default::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    if std::fs::create_dir_all(&config.data_dir).is_err() {
        return;
    }

    let resource = Resource::new(vec![opentelemetry::KeyValue::new("service.name", SERVICE_NAME)]);
    let provider = tracer::create_tracer_provider(span_file_path(config), resource);
    let otel_layer = OpenTelemetryLayer::new(provider.tracer(SERVICE_NAME));

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.trace_level));
    let stderr_layer = config
        .log_to_stderr
        .then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(otel_layer)
        .with(stderr_layer)
        .try_init();
}
