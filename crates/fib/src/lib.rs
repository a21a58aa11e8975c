pub mod app;
pub mod cli;
pub mod domain;
pub mod infra;

use tracing_subscriber::EnvFilter;

/// Install the stderr log subscriber. `-v` flags win over `RUST_LOG`, which wins over `warn`.
pub fn init(verbosity: u8) {
    let filter = match verbosity {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
