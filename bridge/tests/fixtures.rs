//! Test fixtures for bridge integration tests

#![allow(dead_code)]

use std::path::PathBuf;
use tempfile::TempDir;

use bridge::{BridgeConfig, CorsPolicy};

pub const TEST_URL: &str = "https://www.youtube.com/watch?v=dQw4w9WgXcQ";

pub const INDEX_HTML: &str = "<!doctype html><title>TV Launcher</title>";

/// Fake adb that echoes its device command and exits with code 0
pub const ECHO_ADB: &str = r#"
echo "Starting: Intent { act=android.intent.action.VIEW }"
echo "device command: $2"
echo "Warning: Activity not started, intent has been delivered" >&2
exit 0
"#;

/// Static dir holding a minimal index page
pub fn create_static_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("index.html"), INDEX_HTML).unwrap();
    dir
}

/// Config bound to an ephemeral port, pointed at `static_dir`
pub fn create_test_config(static_dir: &TempDir) -> BridgeConfig {
    BridgeConfig::new("127.0.0.1:0".parse().unwrap(), static_dir.path())
        .with_cors(CorsPolicy::Any)
        .with_adb_binary("/nonexistent/platform-tools/adb")
}

/// Write an executable fake `adb` script into a fresh temp dir
#[cfg(unix)]
pub fn write_fake_adb(body: &str) -> (TempDir, PathBuf) {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("adb");
    std::fs::write(&path, format!("#!/bin/sh\n{body}")).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    (dir, path)
}
