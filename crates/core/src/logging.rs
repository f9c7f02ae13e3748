//! Logging initialization.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Default filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info,marionette=debug,glutin=warn,winit=warn";

/// Initialize the global tracing subscriber.
///
/// Filtering comes from `RUST_LOG` when set, [`DEFAULT_FILTER`] otherwise.
/// Returns `true` if this call installed the subscriber. Later calls keep
/// the existing one and return `false`.
///
/// # Example
/// ```
/// marionette_core::init_logging();
/// tracing::info!("Scene assembled");
/// ```
pub fn init_logging() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    match tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(true))
        .try_init()
    {
        Ok(()) => true,
        Err(e) => {
            tracing::debug!("Keeping existing tracing subscriber: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_keeps_existing_subscriber() {
        init_logging();
        assert!(!init_logging());
    }
}
