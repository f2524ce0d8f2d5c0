use std::io;

use tracing_subscriber::{fmt, EnvFilter};

/// Output shape of the process-wide subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStyle {
    /// Human-readable lines on stdout.
    Compact,
    /// One JSON object per event on stdout.
    Json,
    /// Warnings only, on stderr, leaving stdout to command output.
    Cli,
}

impl LogStyle {
    /// Filter used when `RUST_LOG` is unset.
    pub fn default_directives(self) -> &'static str {
        match self {
            LogStyle::Compact => "info",
            // upstream exchanges are worth keeping in structured logs
            LogStyle::Json => "info,service::prediction=debug",
            LogStyle::Cli => "warn",
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(style: LogStyle) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(style.default_directives()));
    let builder = fmt().with_env_filter(filter).with_target(false);
    let _ = match style {
        LogStyle::Compact => builder.compact().with_writer(io::stdout).try_init(),
        LogStyle::Json => builder.json().with_writer(io::stdout).try_init(),
        LogStyle::Cli => builder.compact().without_time().with_writer(io::stderr).try_init(),
    };
}
