use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (EnvFilter syntax).
pub const LOG_ENV: &str = "GETARGV_LOG";

const DEFAULT_FILTER: &str = "warn";

/// Initialize tracing on stderr.
///
/// Stdout carries the argument bytes and nothing else, so all log output
/// goes to stderr. The filter comes from `GETARGV_LOG`, falling back to
/// `warn`. Returns false if a global subscriber was already installed.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_level(true)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .try_init()
        .is_ok()
}
