//! Observability: structured logging initialization.
//!
//! Logging is the crate's only telemetry surface. Everything is emitted
//! through `tracing`; the binary initializes a subscriber here and library
//! embedders bring their own.

use tracing_subscriber::EnvFilter;

/// Options for logging initialization.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitOptions {
    /// Raise the default level to `debug`.
    pub verbose: bool,
}

/// Initializes the global tracing subscriber.
///
/// `RUST_LOG` takes precedence; otherwise the level defaults to `info`, or
/// `debug` when verbose. Logs go to stderr so stdout stays free for hook
/// responses and artifacts. Safe to call more than once; later calls are
/// no-ops.
pub fn init(options: InitOptions) {
    let default_level = if options.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("promptscope={default_level}")));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
