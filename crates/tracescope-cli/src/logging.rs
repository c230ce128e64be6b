//! stderr diagnostics. stdout carries command output only.

use is_terminal::IsTerminal;
use tracing_subscriber::EnvFilter;

use crate::types::LogLevel;

/// Environment variable consulted before `RUST_LOG`
pub const LOG_ENV: &str = "TRACESCOPE_LOG";

/// Directive used when neither environment variable is set
pub fn default_directive(level: LogLevel) -> String {
    let level = level.as_directive();
    ["tracescope", "tracescope_runtime", "tracescope_engine"]
        .map(|target| format!("{target}={level}"))
        .join(",")
}

fn filter(level: LogLevel) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_directive(level)))
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init(level: LogLevel) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .without_time()
        .try_init();
}
