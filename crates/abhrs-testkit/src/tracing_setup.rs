//! Test log output

use tracing_subscriber::EnvFilter;

/// Install a test-writer subscriber once per process
///
/// Honours `RUST_LOG`; defaults to `warn`. Later calls are no-ops.
pub fn init_test_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
