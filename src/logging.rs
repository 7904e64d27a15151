//! Tracing subscriber setup for the binary.
//!
//! Diagnostics go to stderr so they never mix with the report on stdout.
//! `TIDYUP_LOG` takes any `EnvFilter` directive; without it the level is
//! `warn`, or `debug` with `--verbose`.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "TIDYUP_LOG";

/// Picks the filter: `TIDYUP_LOG` wins, then the verbosity flag.
pub fn env_filter(verbose: bool) -> EnvFilter {
    let default_level = if verbose { "debug" } else { "warn" };
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Installs the global subscriber. Calling it twice is harmless.
pub fn init_logger(verbose: bool) {
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .with(env_filter(verbose))
        .try_init();
}
