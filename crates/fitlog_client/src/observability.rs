//! Logging setup shared by binaries and examples built on this crate.

/// Install a compact stderr `tracing` subscriber.
///
/// The filter comes from `FITLOG_LOG_LEVEL`, then `RUST_LOG`, then `info`.
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging() -> bool {
    init_logging_with(|k| std::env::var(k).ok())
}

pub fn init_logging_with<F>(mut get: F) -> bool
where
    F: FnMut(&str) -> Option<String>,
{
    let level = log_filter(&mut get);
    let env_filter = tracing_subscriber::EnvFilter::try_new(format!("{level},hyper=warn"))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,hyper=warn"));
    let installed = tracing_subscriber::fmt()
        .compact()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(false)
        .with_env_filter(env_filter)
        .try_init()
        .is_ok();
    if installed {
        tracing::info!("fitlog: log filter: {}", level);
    }
    installed
}

fn log_filter<F>(get: &mut F) -> String
where
    F: FnMut(&str) -> Option<String>,
{
    get("FITLOG_LOG_LEVEL")
        .or_else(|| get("RUST_LOG"))
        .unwrap_or_else(|| "info".to_string())
}
