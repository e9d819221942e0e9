//! Integration tests for the smoke binary that need no container runtime.
use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn list_shows_every_check() {
    Command::cargo_bin("smoke")
        .unwrap()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("CHECK\tSLOW\tDESCRIPTION\n"))
        .stdout(predicate::str::contains("container-running\tno\t"))
        .stdout(predicate::str::contains("clean-exit\tno\t"))
        .stdout(predicate::str::contains("platform-reported\tyes\t"));
}

#[test]
fn run_help_documents_image_tag_and_slow_flag() {
    Command::cargo_bin("smoke")
        .unwrap()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--image-tag"))
        .stdout(predicate::str::contains("local/test-image:latest"))
        .stdout(predicate::str::contains("--run-slow"));
}

#[test]
fn invalid_container_name_is_rejected() {
    Command::cargo_bin("smoke")
        .unwrap()
        .args(["run", "--name", "bad name"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid container name"));
}

#[test]
fn any_github_actions_value_parses() {
    for value in ["1", "", "TRUE", "yes", "true", "false"] {
        Command::cargo_bin("smoke")
            .unwrap()
            .env("GITHUB_ACTIONS", value)
            .args(["run", "--poll-interval=-1"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid poll interval"))
            .stderr(predicate::str::contains("possible values").not());
    }
}
