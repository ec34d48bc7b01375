use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Initialize the global tracing subscriber.
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g. `"info"` or
/// `"quiz_engine=debug"`. Safe to call repeatedly; only the first call
/// installs a subscriber.
pub fn init_logging(default_filter: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter.to_string()));

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_thread_ids(true)
            .try_init()
            .ok();
    });
}
