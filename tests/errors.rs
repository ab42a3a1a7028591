mod common;

use assert_cmd::Command;
use common::{bitpaint, store_with};
use predicates::prelude::*;
use std::fs;
use std::time::Duration;

#[test]
fn test_missing_store_is_fatal_without_create() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.json");
    bitpaint()
        .args(["--size", "1,1", "--store"])
        .arg(&path)
        .write_stdin("toggle enter\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot read pattern store"));
    assert!(!path.exists());
}

#[test]
fn test_corrupt_store_shows_the_offending_line() {
    let (_dir, path) = store_with("{\"a\": [[1, 0]],\n \"b\": oops}\n");
    bitpaint()
        .args(["--size", "1,1", "--store"])
        .arg(&path)
        .write_stdin("toggle enter\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("corrupt"))
        .stderr(predicate::str::contains("\"b\": oops"))
        .stderr(predicate::str::contains("^"));
}

#[test]
fn test_store_that_is_not_an_object_is_corrupt() {
    let (_dir, path) = store_with("[[1]]");
    bitpaint()
        .args(["--size", "1,1", "--store"])
        .arg(&path)
        .write_stdin("enter\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("not a JSON object"));
}

#[test]
fn test_unknown_format_tag_is_a_usage_error() {
    let (_dir, path) = store_with("{}");
    bitpaint()
        .args(["name", "xx", "--store"])
        .arg(&path)
        .write_stdin("1,1\nenter\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("xx"))
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_bad_size_flag_is_a_usage_error() {
    let (_dir, path) = store_with("{}");
    bitpaint()
        .args(["--size", "0x3", "--store"])
        .arg(&path)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid --size"));
}

#[test]
fn test_overflowing_size_is_a_usage_error() {
    let (_dir, path) = store_with("{}");
    let side = (1u128 << (usize::BITS / 2)).to_string();
    bitpaint()
        .args(["--size", &format!("{side},{side}"), "--store"])
        .arg(&path)
        .write_stdin("enter\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("too large"));
}

#[test]
fn test_size_prompt_reasks_then_eof_is_a_usage_error() {
    let (_dir, path) = store_with("{}");
    bitpaint()
        .arg("--store")
        .arg(&path)
        .write_stdin("ten,ten\n0,4\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("not a positive whole number"))
        .stderr(predicate::str::contains("no grid size given"));
}

#[test]
fn test_integer_format_rejects_wide_grids() {
    let (_dir, path) = store_with("{}");
    bitpaint()
        .args(["wide", "i", "--size", "65,1", "--store"])
        .arg(&path)
        .write_stdin("enter\n")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("64"));
}

#[test]
fn test_eof_before_confirm_interrupts_without_saving() {
    let original = "{}";
    let (_dir, path) = store_with(original);
    bitpaint()
        .args(["--size", "2,2", "--store"])
        .arg(&path)
        .write_stdin("toggle\nright\n")
        .assert()
        .code(130)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("nothing saved"));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_help_exits_zero() {
    bitpaint()
        .arg("--help")
        .assert()
        .success()
        .stderr(predicate::str::contains("Usage"))
        .stderr(predicate::str::contains("--store"));
}

#[test]
fn test_forced_editor_on_non_tty_errors() {
    let (_dir, path) = store_with("{}");
    Command::cargo_bin("bitpaint")
        .unwrap()
        .timeout(Duration::from_secs(5))
        .env("BITPAINT_CONFIG", "/nonexistent/bitpaint.toml")
        .args(["--editor", "--store"])
        .arg(&path)
        .write_stdin("1,1\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin is not a TTY"));
}

#[test]
fn test_invalid_mode_env_errors() {
    let (_dir, path) = store_with("{}");
    Command::cargo_bin("bitpaint")
        .unwrap()
        .timeout(Duration::from_secs(5))
        .env("BITPAINT_CONFIG", "/nonexistent/bitpaint.toml")
        .env("BITPAINT_MODE", "fancy")
        .arg("--store")
        .arg(&path)
        .write_stdin("1,1\n")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("invalid BITPAINT_MODE"));
}

#[test]
fn test_auto_bare_on_piped_stdin() {
    let (_dir, path) = store_with("{}");
    Command::cargo_bin("bitpaint")
        .unwrap()
        .timeout(Duration::from_secs(5))
        .env("BITPAINT_CONFIG", "/nonexistent/bitpaint.toml")
        .env_remove("BITPAINT_MODE")
        .args(["auto", "--size", "1,1", "--store"])
        .arg(&path)
        .write_stdin("toggle enter\n")
        .assert()
        .success()
        .stdout("#\n");
}
