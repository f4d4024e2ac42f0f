use log::{info, log_enabled, Level};

/// Initializes the logger with the `env_logger` crate.
///
/// `debug` raises the default filter to `debug`, `quiet` lowers it to
/// `error`; the `RUST_LOG` environment variable still takes precedence.
pub fn init_logger(debug: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if debug {
        "debug"
    } else {
        "info"
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

/// Logs an informational message.
pub fn log_info(message: &str) {
    if log_enabled!(Level::Info) {
        info!("{message}");
    }
}
