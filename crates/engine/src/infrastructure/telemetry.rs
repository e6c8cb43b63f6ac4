use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use super::config::LogFormat;

/// Filter used when `RUST_LOG` is unset
pub const DEFAULT_LOG_FILTER: &str = "limitbook=info,limitbook_engine=info";

/// Install the global subscriber
///
/// `RUST_LOG` wins over the default filter. Fails if a subscriber is
/// already installed.
pub fn init_tracing(format: LogFormat) -> Result<(), tracing_subscriber::util::TryInitError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    let (pretty, json) = match format {
        LogFormat::Pretty => (Some(tracing_subscriber::fmt::layer()), None),
        LogFormat::Json => (None, Some(tracing_subscriber::fmt::layer().json())),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(pretty)
        .with(json)
        .try_init()
}
