pub mod cli;
pub mod commands;
pub mod core;
mod output;

use tracing_subscriber::EnvFilter;

pub use commands::run;

/// Initialize structured logging.
///
/// `RUST_LOG` wins when set; otherwise `-q` shows errors only and each `-v`
/// raises the level from `info`.
pub fn init_tracing(verbose: u8, quiet: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if quiet {
            EnvFilter::new("error")
        } else {
            match verbose {
                0 => EnvFilter::new("info"),
                1 => EnvFilter::new("debug"),
                _ => EnvFilter::new("trace"),
            }
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}
