//! Logging initialization.

use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise the level defaults to `info`
/// (`debug` with `verbose`). Safe to call when a subscriber is already
/// installed, as in integration tests.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    if std::env::var("RUST_LOG").is_err() {
        std::env::set_var("RUST_LOG", default_level);
    }

    if tracing::subscriber::set_global_default(
        FmtSubscriber::builder().with_env_filter(EnvFilter::from_default_env()).finish(),
    )
    .is_err()
    {
        // Subscriber already set elsewhere; keep it.
    }
}
