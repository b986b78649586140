//! Diagnostic output on stderr.

use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding an `EnvFilter` directive string.
pub const LOG_ENV: &str = "CLUMPTRAIL_LOG";

/// Level implied by the number of `-v` flags.
pub fn verbosity_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        _ => Level::DEBUG,
    }
}

/// Install the global subscriber. `CLUMPTRAIL_LOG` wins over `-v` when set.
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(verbosity_level(verbose).as_str()));

    let subscriber = tracing_subscriber::registry().with(filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_thread_ids(false),
    );

    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[cfg(test)]
#[path = "logging_test.rs"]
mod tests;
