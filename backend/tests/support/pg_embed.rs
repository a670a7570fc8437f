//! Bootstraps embedded PostgreSQL for integration tests.
//!
//! `pg-embed-setup-unpriv` installs into `/var/tmp` unless `PG_RUNTIME_DIR`
//! and `PG_DATA_DIR` say otherwise. Sandboxed runs cannot write there, so
//! when either variable is missing both are pointed at fresh directories
//! under the cargo target directory for the duration of the bootstrap.
//! Bootstraps are serialised because they mutate the process environment.

use std::path::PathBuf;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use pg_embedded_setup_unpriv::TestCluster;
use uuid::Uuid;

static BOOTSTRAP_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

const MAX_RETRIES: u32 = 3;
const RETRY_DELAY: Duration = Duration::from_millis(500);

const TRANSIENT_PATTERNS: [&str; 7] = [
    "error decoding response body",
    "connection reset",
    "connection refused",
    "timed out",
    "temporarily unavailable",
    "dns error",
    "failed to lookup",
];

fn workspace_dirs() -> std::io::Result<(PathBuf, PathBuf)> {
    let target = std::env::var_os("CARGO_TARGET_DIR").map_or_else(
        || PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../target"),
        PathBuf::from,
    );
    let base = target
        .join("pg-embed")
        .join(format!("contactbook-{}-{}", std::process::id(), Uuid::new_v4()));
    let runtime_dir = base.join("install");
    let data_dir = base.join("data");
    cap_std::fs::Dir::create_ambient_dir_all(&runtime_dir, cap_std::ambient_authority())?;
    cap_std::fs::Dir::create_ambient_dir_all(&data_dir, cap_std::ambient_authority())?;
    Ok((runtime_dir, data_dir))
}

fn is_transient(error: &str) -> bool {
    let lower = error.to_lowercase();
    TRANSIENT_PATTERNS.iter().any(|pattern| lower.contains(pattern))
}

/// Start a [`TestCluster`], retrying transient download failures with
/// exponential back-off.
pub fn test_cluster() -> Result<TestCluster, String> {
    let _bootstrap = BOOTSTRAP_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|err| err.into_inner());

    let needs_override =
        std::env::var_os("PG_RUNTIME_DIR").is_none() || std::env::var_os("PG_DATA_DIR").is_none();
    let _env = if needs_override {
        let (runtime_dir, data_dir) = workspace_dirs().map_err(|err| err.to_string())?;
        Some(env_lock::lock_env([
            ("PG_RUNTIME_DIR", Some(runtime_dir.to_string_lossy().into_owned())),
            ("PG_DATA_DIR", Some(data_dir.to_string_lossy().into_owned())),
        ]))
    } else {
        None
    };

    let mut attempt = 0;
    loop {
        match TestCluster::new() {
            Ok(cluster) => return Ok(cluster),
            Err(err) => {
                let message = format!("{err:?}");
                if attempt >= MAX_RETRIES || !is_transient(&message) {
                    return Err(message);
                }
                let delay = RETRY_DELAY * 2_u32.pow(attempt);
                eprintln!(
                    "pg-embed: transient error on attempt {}, retrying in {delay:?}: {message}",
                    attempt + 1
                );
                std::thread::sleep(delay);
                attempt += 1;
            }
        }
    }
}
