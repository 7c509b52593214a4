//! Log output for the CLI.
//!
//! `KILN_LOG` takes an `EnvFilter` directive (`kiln_shelf=debug`, `trace`,
//! ...). Without it the level comes from the number of `-v` flags.

use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "KILN_LOG";

/// Default filter for a `-v` count.
pub fn level_for(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. Calling it twice is a no-op.
pub fn init(verbose: u8) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level_for(verbose)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .try_init();
}
