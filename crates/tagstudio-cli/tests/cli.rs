#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn tagstudio_cmd(library: &std::path::Path) -> Command {
    let mut cmd = Command::new(cargo_bin("tagstudio"));
    cmd.args(["--library", library.to_str().unwrap()]);
    cmd
}

#[test]
fn scan_then_search_finds_new_file() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.txt"), b"hello").unwrap();

    tagstudio_cmd(dir.path())
        .arg("scan")
        .assert()
        .success()
        .stdout(predicate::str::contains("scan:"))
        .stdout(predicate::str::contains("1 new entries saved"));

    tagstudio_cmd(dir.path())
        .args(["search", "notes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt"));
}

#[test]
fn tag_add_list_and_remove_round_trip() {
    let dir = TempDir::new().unwrap();

    tagstudio_cmd(dir.path())
        .args(["tag", "add", "red"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created:"));

    tagstudio_cmd(dir.path())
        .args(["tag", "ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("red"));
}

#[test]
fn search_on_empty_library_reports_zero_matches() {
    let dir = TempDir::new().unwrap();

    tagstudio_cmd(dir.path())
        .args(["search", ""])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 of 0"));
}

#[test]
fn thumb_cache_stats_on_fresh_library_is_empty() {
    let dir = TempDir::new().unwrap();

    tagstudio_cmd(dir.path())
        .args(["thumb-cache", "stats"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0 shards, 0 bytes"));
}

#[test]
fn scan_rejects_nonexistent_library_directory() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("does-not-exist");

    tagstudio_cmd(&missing).arg("scan").assert().failure();
}
