//! Logging initialization.

use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LoggingConfig;

/// Initializes the tracing subscriber from configuration.
///
/// `RUST_LOG` overrides the configured level filter. The `format` key
/// selects json (for log shippers), compact (terminals), or the
/// default pretty output.
pub fn init_logging(config: &LoggingConfig) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format.as_str() {
        "json" => {
            let layer = fmt::layer()
                .json()
                .with_span_events(FmtSpan::CLOSE)
                .with_current_span(true)
                .with_target(true);
            registry.with(layer).init();
        }
        "compact" => {
            let layer = fmt::layer().compact().with_target(false);
            registry.with(layer).init();
        }
        _ => {
            let layer = fmt::layer().pretty().with_target(true);
            registry.with(layer).init();
        }
    }
}
