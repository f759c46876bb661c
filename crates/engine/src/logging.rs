//! Logging bootstrap
//!
//! Installs a `tracing-subscriber` formatter. `RUST_LOG` takes precedence
//! over the configured level.

use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

/// Build the log filter for a configuration
pub fn env_filter(config: &ServerConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level))
}

/// Install the global subscriber
///
/// Returns false if a subscriber was already installed.
pub fn init_logging(config: &ServerConfig) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
