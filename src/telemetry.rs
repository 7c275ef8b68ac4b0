//! Tracing setup for the service binary.
//!
//! `LOG_LEVEL` takes a full filter directive ("debug", or something like
//! "info,navigation=trace"). Without it, resolution decisions under the
//! `navigation` target are logged at debug and everything else at info.
//! `LOG_FORMAT=json` switches to one JSON object per line.

use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

const DEFAULT_DIRECTIVES: &str = "info,navigation=debug,games=info,quizzish_backend=debug,tower_http=info";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    fn from_env() -> Self {
        match std::env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env("LOG_LEVEL").unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));
    let format = LogFormat::from_env();

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true);

    let installed = match format {
        LogFormat::Json => builder.json().finish().try_init(),
        LogFormat::Pretty => builder.finish().try_init(),
    };
    if installed.is_ok() {
        tracing::debug!(target: "quizzish_backend", ?format, "Tracing initialised");
    }
}
