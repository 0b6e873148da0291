use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the log level.
const LOG_LEVEL_VAR: &str = "COMPUTE_CLI_LOG";
/// When set, logs from every crate are shown instead of only ours.
const LOG_ALL_VAR: &str = "COMPUTE_CLI_LOG_ALL";

/// Setup logging.
///
/// By default only warnings and above from this crate are shown, so that a successful
/// run prints nothing but its result. `COMPUTE_CLI_LOG` overrides the level and
/// `--debug` forces `debug`. Logs go to stderr, stdout is reserved for command output.
pub fn setup_logging(debug: bool) {
    let log_level = if debug {
        "debug".to_string()
    } else {
        std::env::var(LOG_LEVEL_VAR).unwrap_or_else(|_| "warn".to_string())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .compact()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(EnvFilter::new(filter_directive(
            &log_level,
            std::env::var(LOG_ALL_VAR).is_ok(),
        )))
        .init();
}

/// Either "level" or "compute=level".
fn filter_directive(log_level: &str, show_all_logs: bool) -> String {
    if show_all_logs {
        log_level.to_string()
    } else {
        format!("compute={log_level}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        assert_eq!(filter_directive("debug", false), "compute=debug");
        assert_eq!(filter_directive("trace", true), "trace");
    }
}
