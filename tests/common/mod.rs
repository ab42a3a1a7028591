#![allow(dead_code)]

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;

/// `bitpaint --bare` isolated from the user's config and environment.
pub fn bitpaint() -> Command {
    let mut cmd = Command::cargo_bin("bitpaint").unwrap();
    cmd.timeout(Duration::from_secs(5))
        .env("BITPAINT_CONFIG", "/nonexistent/bitpaint.toml")
        .env_remove("BITPAINT_STORE")
        .env_remove("BITPAINT_MODE")
        .env_remove("BITPAINT_LOG")
        .arg("--bare");
    cmd
}

/// A temp dir holding `savedpresets.json` with `content`.
pub fn store_with(content: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedpresets.json");
    fs::write(&path, content).unwrap();
    (dir, path)
}

pub fn read_store(path: &Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}
