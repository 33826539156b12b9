//! Structured logging via the `tracing` ecosystem.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub const DEFAULT_FILTER: &str = "info";

/// Filter from RUST_LOG if set, otherwise `fallback`, otherwise "info"
pub fn build_filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        fallback
            .filter(|f| !f.trim().is_empty())
            .and_then(|f| EnvFilter::try_new(f).ok())
            .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Install the global subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(filter: Option<&str>) {
    let console_layer = fmt::layer()
        .with_target(true)
        .with_level(true)
        .with_timer(fmt::time::uptime());

    let _ = tracing_subscriber::registry()
        .with(build_filter(filter))
        .with(console_layer)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let filter = build_filter(Some("planetgen=debug"));
        assert!(format!("{}", filter).contains("planetgen=debug"));

        let filter = build_filter(Some("   "));
        assert_eq!(format!("{}", filter), DEFAULT_FILTER);

        let filter = build_filter(None);
        assert_eq!(format!("{}", filter), DEFAULT_FILTER);
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init_logging(Some("warn"));
        init_logging(None);
    }
}
