//! Logging setup with tracing-subscriber.

use tracing_subscriber::EnvFilter;

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the given binary name is used
/// as the default filter target at `default_level`.
pub fn setup_logger(name: &str, default_level: &str) {
    // Crate names use hyphens, tracing targets use underscores
    let target = name.replace('-', "_");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{target}={default_level},tower_http=debug"))
    });

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
