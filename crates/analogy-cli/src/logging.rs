use analogy_core::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const FALLBACK_LEVEL: &str = "warn";

/// Filter directives in effect: `--verbose`, then `RUST_LOG`, then the
/// configured level
pub fn filter_directives(level: &str, verbose: bool, rust_log: Option<&str>) -> String {
    if verbose {
        return "debug".to_string();
    }
    match rust_log.map(str::trim) {
        Some(directives) if !directives.is_empty() => directives.to_string(),
        _ => level.to_string(),
    }
}

fn build_filter(level: &str, verbose: bool) -> EnvFilter {
    let rust_log = std::env::var("RUST_LOG").ok();
    let directives = filter_directives(level, verbose, rust_log.as_deref());
    EnvFilter::try_new(&directives).unwrap_or_else(|e| {
        eprintln!("Ignoring log filter '{}': {}", directives, e);
        EnvFilter::new(FALLBACK_LEVEL)
    })
}

/// Subscriber used while the configuration itself is being loaded
pub fn bootstrap_subscriber(verbose: bool) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(FALLBACK_LEVEL, verbose))
        .with_writer(std::io::stderr)
        .finish()
}

/// Install the global subscriber. Logs go to stderr so results on stdout
/// stay pipeable.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) {
    let filter = build_filter(&config.level, verbose);

    let registry = tracing_subscriber::registry().with(filter);
    let result = match config.format.as_str() {
        "json" => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "compact" => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        _ => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    if let Err(e) = result {
        eprintln!("Logging already initialized: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rust_log_directives_pass_through() {
        assert_eq!(
            filter_directives("warn", false, Some("info,reqwest=warn")),
            "info,reqwest=warn"
        );
        let directives = filter_directives("warn", false, Some("info,reqwest=warn"));
        assert!(EnvFilter::try_new(directives).is_ok());
    }

    #[test]
    fn test_filter_precedence() {
        assert_eq!(filter_directives("error", false, None), "error");
        assert_eq!(filter_directives("error", false, Some("  ")), "error");
        assert_eq!(filter_directives("error", true, Some("info")), "debug");
    }

    #[test]
    fn test_bootstrap_subscriber_sees_config_load_events() {
        tracing::subscriber::with_default(bootstrap_subscriber(true), || {
            assert!(tracing::enabled!(tracing::Level::WARN));
            assert!(tracing::enabled!(tracing::Level::DEBUG));
        });
    }
}
