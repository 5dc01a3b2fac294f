//! # Logging
//!
//! Structured logging setup via `tracing-subscriber`.
//!
//! `RUST_LOG` always wins; the configured level is the fallback when the
//! environment says nothing.

use tracing_subscriber::EnvFilter;

use crate::config::LoggingConfig;

/// Installs the global tracing subscriber.
///
/// Call once at startup, before anything logs. A second call would panic
/// inside `tracing-subscriber`, so only the binary entry point does this.
pub fn init(config: &LoggingConfig) {
    let fallback = format!("signpost={}", config.log_level.to_string().to_lowercase());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}
