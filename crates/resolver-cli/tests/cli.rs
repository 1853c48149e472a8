use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_help_shows_all_commands() {
    cargo_bin_cmd!("resolver")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("demo"))
        .stdout(predicate::str::contains("trace"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("resolver")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1"));
}

#[test]
fn test_config_path_uses_resolver_home() {
    let dir = tempdir().unwrap();
    let expected = dir.path().join("config.toml");

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .env_remove("RESOLVER_CONFIG")
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(expected.display().to_string()));
}

#[test]
fn test_config_show_prints_defaults_without_file() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .env_remove("RESOLVER_CONFIG")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("delay_ms = 200"))
        .stdout(predicate::str::contains("latency_ms = 800"));
}

#[test]
fn test_config_show_reads_file() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("config.toml"),
        "delay_ms = 0\n\n[demo]\nlatency_ms = 25\n",
    )
    .unwrap();

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .env_remove("RESOLVER_CONFIG")
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("delay_ms = 0"))
        .stdout(predicate::str::contains("latency_ms = 25"));
}

#[test]
fn test_invalid_config_fails() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    fs::write(&path, "delay_ms = \"soon\"").unwrap();

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .arg("--config")
        .arg(&path)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_trace_zero_delay_shows_loading() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .env_remove("RESOLVER_CONFIG")
        .args(["trace", "--delay", "0", "--latency", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("loading=true"))
        .stdout(predicate::str::contains("value=result #1 after 10 ms"));
}

#[test]
fn test_trace_reports_failure() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .env_remove("RESOLVER_CONFIG")
        .args(["trace", "--fail", "--latency", "10"])
        .assert()
        .success()
        .stdout(predicate::str::contains("error=request #1 failed"));
}

#[test]
fn test_trace_drops_superseded_result() {
    let dir = tempdir().unwrap();

    cargo_bin_cmd!("resolver")
        .env("RESOLVER_HOME", dir.path())
        .env_remove("RESOLVER_CONFIG")
        .args(["trace", "--latency", "100", "--supersede-after", "20"])
        .assert()
        .success()
        .stdout(predicate::str::contains("value=result #2 after 100 ms"))
        .stdout(predicate::str::contains("result #1").not());
}
