//! Tracing subscriber initialization.

use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Installs a global fmt subscriber on stderr filtered by `RUST_LOG`.
///
/// Falls back to `default_directive` (for example `"info"` or
/// `"responsio_agent=debug"`) when `RUST_LOG` is unset or invalid. Calling
/// this more than once is harmless; later calls leave the first subscriber in
/// place and return `false`.
pub fn init_tracing(default_directive: &str) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    match tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
    {
        Ok(()) => {
            debug!(default_directive, "Tracing subscriber installed");
            true
        }
        Err(_) => false,
    }
}
