//! Tracing initialisation for binaries built on the client.
//!
//! Log lines always go to stderr. Commands built on the client print their
//! results as JSON on stdout, so `medium ... | jq` keeps working with
//! logging enabled. `RUST_LOG` overrides the default level.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

fn env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()))
}

/// Install the global subscriber: plain text, or newline-delimited JSON
/// when `json` is set. Returns `false` if a subscriber was already set.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let (plain, json) = if json {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (None, Some(layer.json()))
    } else {
        let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
        (Some(layer), None)
    };

    tracing_subscriber::registry()
        .with(env_filter(level))
        .with(plain)
        .with(json)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_reports_existing_subscriber() {
        init_tracing(false, Level::DEBUG);
        assert!(!init_tracing(true, Level::INFO));
    }
}
