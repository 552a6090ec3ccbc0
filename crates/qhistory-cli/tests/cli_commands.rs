//! End-to-end tests for the `qhistory` subcommands against a seeded database

use anyhow::Result;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use qhistory_testing::TestWorld;
use qhistory_testing::assertions::{assert_conversation_count, assert_newest_first};

#[test]
fn test_list_json_is_newest_first() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let result = world.run(&mut cargo_bin_cmd!("qhistory"), &["list", "--format", "json"])?;
    assert!(result.success(), "stderr: {}", result.stderr);

    let json = result.json()?;
    // The malformed record is skipped, the other five are listed
    assert_conversation_count(&json, 5)?;
    assert_newest_first(&json)?;
    assert_eq!(json["conversations"][0]["id"], "conv-web");
    assert_eq!(json["conversations"][0]["recency"], "#1 of 5 (order estimate)");
    Ok(())
}

#[test]
fn test_list_limit() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let result = world.run(
        &mut cargo_bin_cmd!("qhistory"),
        &["list", "--limit", "2", "--format", "json"],
    )?;

    assert_conversation_count(&result.json()?, 2)?;
    Ok(())
}

#[test]
fn test_list_rejects_zero_limit() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let mut cmd = cargo_bin_cmd!("qhistory");
    world.configure_command(&mut cmd);
    cmd.args(["list", "--limit", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("must be greater than 0"));
    Ok(())
}

#[test]
fn test_negative_limits_reach_argument_validation() -> Result<()> {
    let world = TestWorld::with_samples()?;

    for args in [
        &["list", "--limit", "-1"][..],
        &["search", "git", "--limit", "-3"][..],
        &["show", "conv-shop", "--turns", "-1"][..],
    ] {
        let mut cmd = cargo_bin_cmd!("qhistory");
        world.configure_command(&mut cmd);
        cmd.args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid argument"))
            .stderr(predicate::str::contains("must be greater than 0"));
    }
    Ok(())
}

#[test]
fn test_list_plain_on_empty_store() -> Result<()> {
    let world = TestWorld::new()?;

    let mut cmd = cargo_bin_cmd!("qhistory");
    world.configure_command(&mut cmd);
    cmd.arg("list")
        .assert()
        .success()
        .stdout("No conversations found.\n");
    Ok(())
}

#[test]
fn test_search_ranks_by_matching_turns() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let result = world.run(
        &mut cargo_bin_cmd!("qhistory"),
        &["search", "git", "--format", "json"],
    )?;
    assert!(result.success(), "stderr: {}", result.stderr);

    let json = result.json()?;
    let ids: Vec<&str> = json["hits"]
        .as_array()
        .expect("hits array")
        .iter()
        .map(|hit| hit["conversation"]["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["conv-shop", "conv-web", "conv-infra"]);
    assert_eq!(json["hits"][0]["matching_turns"], 2);
    Ok(())
}

#[test]
fn test_search_plain_without_hits() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let mut cmd = cargo_bin_cmd!("qhistory");
    world.configure_command(&mut cmd);
    cmd.args(["search", "terraform"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No conversations match \"terraform\""));
    Ok(())
}

#[test]
fn test_show_with_turn_limit() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let result = world.run(
        &mut cargo_bin_cmd!("qhistory"),
        &["show", "conv-shop", "--turns", "1", "--format", "json"],
    )?;
    assert!(result.success(), "stderr: {}", result.stderr);

    let json = result.json()?;
    assert_eq!(json["total_turns"], 2);
    assert_eq!(json["shown_turns"], 1);
    assert_eq!(
        json["conversation"]["turns"][0]["user_text"],
        "show me git status"
    );
    Ok(())
}

#[test]
fn test_show_unknown_id_fails() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let mut cmd = cargo_bin_cmd!("qhistory");
    world.configure_command(&mut cmd);
    cmd.args(["show", "nonexistent-id"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conversation not found: nonexistent-id"));
    Ok(())
}

#[test]
fn test_export_to_stdout() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let mut cmd = cargo_bin_cmd!("qhistory");
    world.configure_command(&mut cmd);
    cmd.args(["export", "conv-k8s"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("# Conversation conv-k8s\n"))
        .stdout(predicate::str::contains("deploy to k8s"));
    Ok(())
}

#[test]
fn test_export_to_file_appends_extension() -> Result<()> {
    let world = TestWorld::with_samples()?;
    let target = world.temp_dir().join("exports/k8s");

    let result = world.run(
        &mut cargo_bin_cmd!("qhistory"),
        &[
            "export",
            "conv-k8s",
            "-o",
            target.to_str().unwrap(),
            "--format",
            "json",
        ],
    )?;
    assert!(result.success(), "stderr: {}", result.stderr);

    let written = world.temp_dir().join("exports/k8s.md");
    let markdown = std::fs::read_to_string(&written)?;
    assert!(markdown.starts_with("# Conversation conv-k8s"));
    assert_eq!(result.json()?["bytes"], markdown.len());
    Ok(())
}

#[test]
fn test_repeated_exports_are_identical() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let first = world.run(&mut cargo_bin_cmd!("qhistory"), &["export", "conv-shop"])?;
    let second = world.run(&mut cargo_bin_cmd!("qhistory"), &["export", "conv-shop"])?;

    assert!(first.success());
    assert_eq!(first.stdout, second.stdout);
    Ok(())
}

#[test]
fn test_doctor_reports_malformed_records() -> Result<()> {
    let world = TestWorld::with_samples()?;

    let result = world.run(&mut cargo_bin_cmd!("qhistory"), &["doctor", "--format", "json"])?;
    assert!(result.success(), "stderr: {}", result.stderr);

    let json = result.json()?;
    assert_eq!(json["record_count"], 6);
    assert_eq!(json["conversation_count"], 5);
    assert_eq!(json["malformed"][0]["key"], "/home/dev/broken");
    Ok(())
}

#[test]
fn test_missing_database_is_reported() -> Result<()> {
    let world = TestWorld::new()?;
    let missing = world.temp_dir().join("nowhere/data.sqlite3");

    cargo_bin_cmd!("qhistory")
        .arg("--db")
        .arg(&missing)
        .arg("--config")
        .arg(world.config_path())
        .env_remove("RUST_LOG")
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Store unavailable"));

    assert!(!missing.exists());
    Ok(())
}

#[test]
fn test_config_init_then_show() -> Result<()> {
    let world = TestWorld::new()?;

    let init = world.run(&mut cargo_bin_cmd!("qhistory"), &["config", "init"])?;
    assert!(init.success(), "stderr: {}", init.stderr);
    assert!(world.config_path().exists());

    let again = world.run(&mut cargo_bin_cmd!("qhistory"), &["config", "init"])?;
    assert!(!again.success());
    assert!(again.stderr.contains("--force"));

    let show = world.run(
        &mut cargo_bin_cmd!("qhistory"),
        &["config", "show", "--format", "json"],
    )?;
    let json = show.json()?;
    assert_eq!(json["config_exists"], true);
    assert_eq!(json["config"]["query"]["list_limit"], 20);
    Ok(())
}

#[test]
fn test_invalid_config_is_rejected() -> Result<()> {
    let world = TestWorld::with_samples()?;
    std::fs::create_dir_all(world.config_path().parent().unwrap())?;
    std::fs::write(world.config_path(), "[query]\nlist_limit = 0\n")?;

    let result = world.run(&mut cargo_bin_cmd!("qhistory"), &["list"])?;
    assert!(!result.success());
    assert!(result.stderr.contains("Failed to load config"));
    Ok(())
}
