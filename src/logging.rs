use tracing_subscriber::EnvFilter;

/// `debug` when asked, else `RUST_LOG`, else `default_level`.
pub fn env_filter(enable_debug: bool, default_level: &str) -> EnvFilter {
    if enable_debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    }
}

/// Initialize tracing and bridge `log` to `tracing`.
/// Calling this multiple times is safe (subsequent attempts are ignored).
pub fn init_tracing(enable_debug: bool, default_level: &str) {
    // stderr keeps console plots on stdout clean
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter(enable_debug, default_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_names(true)
        .finish();

    if tracing::subscriber::set_global_default(subscriber).is_ok() {
        let _ = tracing_log::LogTracer::init();
    }
}
