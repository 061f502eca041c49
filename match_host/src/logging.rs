use env_logger::Env;

/// Install the process logger: `info` unless `RUST_LOG` says otherwise.
/// Safe to call more than once.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .try_init();
}
