//! Tracing setup for the binary
//!
//! Events go to stderr so that report output on stdout stays parseable.

use std::sync::Once;

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding a tracing filter, e.g. `budget_planner=debug`
pub const LOG_ENV: &str = "BUDGET_PLANNER_LOG";

/// Level used when neither the environment nor the settings give one
pub const DEFAULT_LEVEL: &str = "warn";

static TRACING_INIT: Once = Once::new();

/// Install the global subscriber; later calls are no-ops
///
/// `configured` is the `log_level` from settings, used when `BUDGET_PLANNER_LOG`
/// is unset or unparseable.
pub fn init_tracing(configured: Option<&str>) {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(std::env::var(LOG_ENV).ok().as_deref(), configured);
        fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    });
}

fn build_filter(from_env: Option<&str>, configured: Option<&str>) -> EnvFilter {
    [from_env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|directive| !directive.is_empty())
        .find_map(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LEVEL))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_takes_precedence() {
        let filter = build_filter(Some("debug"), Some("error"));
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_falls_back_to_settings_then_default() {
        assert_eq!(build_filter(None, Some("info")).to_string(), "info");
        assert_eq!(build_filter(Some("  "), None).to_string(), "warn");
    }
}
