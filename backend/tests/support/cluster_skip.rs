//! `SKIP_TEST_CLUSTER` policy for suites that need embedded PostgreSQL.

/// Whether `SKIP_TEST_CLUSTER` is set to `1`, `true` or `yes`
/// (case-insensitive).
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .is_ok_and(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
}

/// Report a cluster that failed to start.
///
/// With `SKIP_TEST_CLUSTER` set this prints a skip marker and returns `None`;
/// otherwise it panics so CI breakage is not masked.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
