use tracing_subscriber::EnvFilter;

const TEST_FILTER: &str = "dispatch_contract=debug,tower_http=debug";

/// Installs the process-wide subscriber. Later calls are no-ops, so every
/// test may call this.
pub fn init(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init();
}

/// Subscriber for test binaries: output goes through the test harness
/// capture.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(TEST_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .compact()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::TEST_FILTER;

    #[test]
    fn test_filter_is_scoped_to_the_harness() {
        assert!(TEST_FILTER.split(',').all(|directive| {
            directive.starts_with("dispatch_contract=") || directive.starts_with("tower_http=")
        }));
    }
}
