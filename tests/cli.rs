use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `resto` with config and credentials isolated in a temp home
fn resto(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("resto").unwrap();
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path().join(".config"))
        .env_remove("RESTO_API_URL")
        .env_remove("RESTO_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("orders"))
        .stdout(predicate::str::contains("kitchen"))
        .stdout(predicate::str::contains("restaurants"));
}

#[test]
fn subcommand_help() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .args(["tables", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("merge"));
}

#[test]
fn config_set_then_get() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .args(["config", "set", "poll-interval", "12"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12s"));

    resto(&home)
        .args(["config", "get", "poll-interval"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Poll interval: 12s"));
}

#[test]
fn config_rejects_bad_poll_interval() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .args(["config", "set", "poll-interval", "abc"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Poll interval must be a number"));

    resto(&home)
        .args(["config", "set", "poll-interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 1 second"));
}

#[test]
fn config_get_uses_env_override() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .env("RESTO_API_URL", "https://api.example.test")
        .args(["config", "get", "api-url"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://api.example.test"))
        .stdout(predicate::str::contains("from RESTO_API_URL"));
}

#[test]
fn unknown_order_status_is_rejected() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .args(["orders", "status", "abc123", "bogus"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn merge_needs_two_tables() {
    let home = TempDir::new().unwrap();
    resto(&home)
        .args(["tables", "merge", "t1", "--guests", "6"])
        .assert()
        .failure()
        .code(2);
}
