// ABOUTME: Test support utilities.
// ABOUTME: Tracing setup and a scratch HOME for tests that touch the state file.

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env()
            .add_directive("rapidctl=debug".parse().unwrap())
            .add_directive("bollard=info".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// A working directory with a rapidctl.yml and a separate HOME.
#[allow(dead_code)]
pub struct Workspace {
    pub dir: tempfile::TempDir,
    pub home: tempfile::TempDir,
}

#[allow(dead_code)]
impl Workspace {
    pub fn new(config: &str) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let home = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("rapidctl.yml"), config).unwrap();
        Self { dir, home }
    }

    pub fn state_file(&self) -> std::path::PathBuf {
        self.home
            .path()
            .join(".local/state/rapidctl/versions.json")
    }
}
