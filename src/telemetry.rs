//! # Telemetry
//!
//! `tracing-subscriber` setup for binaries embedding the crate. The library
//! itself only emits events.

use crate::config::{LogFormat, LoggingConfig};
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when neither `RUST_LOG` nor the configured level parses.
const FALLBACK_DIRECTIVE: &str = "info";

/// Installs the global subscriber.
///
/// If a subscriber is already installed it is kept, and the refusal is
/// logged through it at debug level. Use [`try_init`] to handle that case.
pub fn init(config: &LoggingConfig) {
    if let Err(err) = try_init(config) {
        tracing::debug!(error = %err, "global subscriber already installed");
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` overrides the configured level when set. A filter that does
/// not parse is skipped, and a warning naming it is logged once the
/// subscriber is up.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn try_init(config: &LoggingConfig) -> Result<(), TryInitError> {
    let from_env = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (filter, rejected) = build_filter(from_env.as_deref(), &config.level);

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Compact => registry
            .with(fmt::layer().with_target(false).compact())
            .try_init()?,
        LogFormat::Json => registry
            .with(fmt::layer().with_target(true).json())
            .try_init()?,
    }

    for (source, directive, error) in rejected {
        tracing::warn!(source, directive = %directive, error = %error, "ignoring invalid log filter");
    }
    Ok(())
}

/// A filter directive that failed to parse: where it came from, the text,
/// and the parse error.
type RejectedDirective = (&'static str, String, String);

fn build_filter(from_env: Option<&str>, level: &str) -> (EnvFilter, Vec<RejectedDirective>) {
    let mut rejected = Vec::new();
    let candidates = from_env
        .map(|directive| (EnvFilter::DEFAULT_ENV, directive))
        .into_iter()
        .chain([("logging.level", level)]);

    for (source, directive) in candidates {
        match EnvFilter::try_new(directive) {
            Ok(filter) => return (filter, rejected),
            Err(err) => rejected.push((source, directive.to_string(), err.to_string())),
        }
    }
    (EnvFilter::new(FALLBACK_DIRECTIVE), rejected)
}
