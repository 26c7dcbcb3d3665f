//! Log subscriber setup for the binary.

use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(log_level: &str, verbose: bool) -> &str {
    if verbose { "debug" } else { log_level }
}

/// Install a stderr subscriber. `RUST_LOG` takes precedence over `log_level`.
pub fn init(log_level: &str, verbose: bool) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(log_level, verbose))
            .map_err(|e| anyhow!("Invalid log level '{log_level}': {e}"))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("Failed to install log subscriber: {e}"))
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;

    #[test]
    fn default_directive___verbose___raises_to_debug() {
        assert_eq!(default_directive("warn", true), "debug");
        assert_eq!(default_directive("warn", false), "warn");
    }
}
