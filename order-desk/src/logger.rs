//! Logging setup
//!
//! Log lines go to stderr so command output on stdout stays machine-readable.

use tracing_subscriber::fmt::time::FormatTime;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Local-time timestamps
struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
    }
}

/// Initialize the global subscriber.
///
/// `RUST_LOG` wins over `level`; without either, debug builds log the crate at
/// `debug` and release builds stay at `warn`.
pub fn init_logger(level: Option<&str>, json: bool) {
    let env_filter = if let Ok(from_env) = EnvFilter::try_from_default_env() {
        from_env
    } else if let Some(level) = level {
        EnvFilter::new(level)
    } else if cfg!(debug_assertions) {
        EnvFilter::new("info,order_desk=debug")
    } else {
        EnvFilter::new("warn")
    };

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_timer(LocalTimer)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .with_timer(LocalTimer)
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    if let Err(e) = result {
        eprintln!("logger already initialized: {}", e);
    }
}
