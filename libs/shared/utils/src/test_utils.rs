use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use shared_config::AppConfig;

/// Config with short simulated delays so async flows finish quickly in tests.
pub struct TestConfig {
    pub history_path: PathBuf,
    pub delay: Duration,
    pub timeout: Duration,
    pub idle_timeout: Duration,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            history_path: std::env::temp_dir().join("medsupport-test-history.json"),
            delay: Duration::from_millis(10),
            timeout: Duration::from_millis(1000),
            idle_timeout: Duration::from_secs(60),
        }
    }
}

impl TestConfig {
    pub fn with_history_dir(dir: &Path) -> Self {
        Self {
            history_path: dir.join("blood_donation_history.json"),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            bind_address: "127.0.0.1:0".to_string(),
            donation_history_path: self.history_path.clone(),
            session_rate: 500,
            voice_fill_delay: self.delay,
            acceptor_delay: self.delay,
            scan_delay: self.delay,
            simulation_timeout: self.timeout,
            session_idle_timeout: self.idle_timeout,
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}
