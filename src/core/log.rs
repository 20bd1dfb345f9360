//! Logging setup for the CLI.
//!
//! Logs go to stderr so they never interleave with rendered panels on stdout.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

/// Crate-level filter for a `-v` count.
///
/// `-v` shows the panel lifecycle (mount, fetch, derive, publish); `-vv` adds
/// trace output and the HTTP client's own request logging.
pub fn panel_filter(verbosity: u8) -> Targets {
    match verbosity {
        0 => Targets::new().with_target("finpanel", LevelFilter::OFF),
        1 => Targets::new().with_target("finpanel", LevelFilter::DEBUG),
        _ => Targets::new()
            .with_target("finpanel", LevelFilter::TRACE)
            .with_target("reqwest", LevelFilter::DEBUG),
    }
}

fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "off",
        1 => "debug",
        _ => "trace",
    }
}

/// Installs the global subscriber. `RUST_LOG` narrows what the `-v` count
/// lets through.
pub fn init_logging(verbosity: u8) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let installed = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .pretty()
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(panel_filter(verbosity))
        .with(env_filter)
        .try_init();
    if installed.is_err() {
        tracing::debug!("Logging already initialised");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_quiet_by_default() {
        let filter = panel_filter(0);
        assert!(!filter.would_enable("finpanel::panels::store", &Level::ERROR));
    }

    #[test]
    fn test_single_v_shows_panel_lifecycle() {
        let filter = panel_filter(1);
        assert!(filter.would_enable("finpanel::panels::store", &Level::DEBUG));
        assert!(!filter.would_enable("finpanel::panels::store", &Level::TRACE));
        assert!(!filter.would_enable("reqwest::connect", &Level::DEBUG));
    }

    #[test]
    fn test_double_v_adds_http_client() {
        let filter = panel_filter(2);
        assert!(filter.would_enable("finpanel::providers::http", &Level::TRACE));
        assert!(filter.would_enable("reqwest::connect", &Level::DEBUG));
        assert_eq!(default_directive(3), "trace");
    }
}
