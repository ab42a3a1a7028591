use assert_cmd::prelude::*;
use std::fs;
use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};

#[cfg(unix)]
#[test]
fn sigint_at_size_prompt_exits_130() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("savedpresets.json");
    fs::write(&path, "{}").unwrap();

    let mut child = Command::cargo_bin("bitpaint")
        .unwrap()
        .env("BITPAINT_CONFIG", "/nonexistent/bitpaint.toml")
        .env_remove("BITPAINT_STORE")
        .env_remove("BITPAINT_MODE")
        .env_remove("BITPAINT_LOG")
        .args(["--bare", "--store"])
        .arg(&path)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();

    // Stdin stays open, so the process blocks on the size prompt.
    let stderr = BufReader::new(child.stderr.take().unwrap());
    let mut lines = stderr.lines();
    let prompted = lines
        .by_ref()
        .map_while(Result::ok)
        .any(|line| line.contains("Grid size"));
    assert!(prompted, "size prompt never appeared");

    let killed = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(killed.success());

    let status = child.wait().unwrap();
    assert_eq!(status.code(), Some(130));
    assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
}
