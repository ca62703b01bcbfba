use tracing_subscriber::{EnvFilter, fmt};

/// JSON logs, one flattened object per event, filtered by `RUST_LOG` (default `info`).
pub fn init_normal_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .json()
        .flatten_event(true)
        .init();
}

pub fn init_logging() {
    // tokio-console needs its own subscriber; don't stack the JSON one on top.
    if std::env::var("TOKIO_CONSOLE").is_ok() {
        init_console_logging();
    } else {
        init_normal_logging();
    }
}

fn init_console_logging() {
    console_subscriber::init();
}
