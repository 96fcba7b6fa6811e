//! Tracing subscriber setup.
//!
//! Filtering follows `RUST_LOG`; without it only this crate's `info` events
//! and above are printed.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset or invalid.
const DEFAULT_FILTER: &str = "dotspaces=info";

/// Installs the global subscriber.
///
/// Returns `false` if a subscriber was already installed, which is the case
/// after a disable/enable cycle or inside a host that set its own.
pub fn init() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_rejected() {
        init();
        assert!(!init());
    }

    #[test]
    fn default_filter_parses() {
        assert!(DEFAULT_FILTER.parse::<EnvFilter>().is_ok());
    }
}
