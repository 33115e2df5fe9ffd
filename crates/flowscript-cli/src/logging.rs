//! Logging initialization.
//!
//! Logs go to stderr so scripts written to stdout stay clean.
//! `RUST_LOG` overrides the level chosen by `-q`/`-v`.

use crate::config::CliConfig;
use tracing_subscriber::EnvFilter;

/// Filter for `config`, honoring `RUST_LOG` when set.
#[must_use]
pub fn env_filter(config: &CliConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.verbosity.log_directive()))
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &CliConfig) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(config))
        .with_writer(std::io::stderr)
        .with_ansi(config.color.should_color())
        .with_target(false)
        .compact()
        .try_init();
}
