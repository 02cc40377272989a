//! Tracing setup for the binaries.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding the log filter.
pub const LOG_ENV: &str = "PORTION_LOG";

/// Default filter for a `-v` count.
pub fn default_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "portion_optimizer_rs=warn",
        1 => "portion_optimizer_rs=info",
        _ => "portion_optimizer_rs=debug",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `PORTION_LOG` (e.g. `PORTION_LOG=portion_optimizer_rs::planner=debug`)
/// takes precedence over the verbosity default. Only the first call has an
/// effect.
pub fn init_logging(verbosity: u8) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new(default_filter(verbosity)));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
