use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "DROIDBVT_LOG";
const DEFAULT_DIRECTIVES: &str = "info,droidbvt=debug";

/// DROIDBVT_LOG takes precedence, then RUST_LOG; without either the harness
/// crate logs at debug and dependencies at info. Release builds emit JSON
/// lines for the lab log collector.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES));

    if cfg!(debug_assertions) {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .try_init();
    } else {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .json()
            .with_target(false)
            .try_init();
    }
}
