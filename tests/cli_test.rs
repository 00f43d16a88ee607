//! Integration tests for the gaedeploy binary.
// The cargo_bin function is marked deprecated in favor of cargo_bin! macro,
// but both work correctly. Suppressing until assert_cmd stabilizes the new API.
#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn setup_project(version: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(
        temp.path().join("app.yaml"),
        format!(
            "application: key-auth\nversion: {}\nruntime: python27\napi_version: 1\n",
            version
        ),
    )
    .unwrap();
    temp
}

/// The binary, run inside `temp` with `temp` as its home directory so no
/// user-level settings or credentials leak in.
fn gaedeploy(temp: &TempDir) -> Command {
    let mut cmd = Command::new(cargo_bin("gaedeploy"));
    cmd.current_dir(temp.path())
        .env("HOME", temp.path())
        .env_remove("GAEDEPLOY_PROJECT")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn cli_shows_help() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    gaedeploy(&temp)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Deployment helpers"))
        .stdout(predicate::str::contains("--dry-run"));
    Ok(())
}

#[test]
fn cli_shows_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    gaedeploy(&temp)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    Ok(())
}

#[test]
fn cli_lists_tasks() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    gaedeploy(&temp)
        .arg("--list")
        .assert()
        .success()
        .stdout(predicate::str::contains("deploy[:tag,export]"))
        .stdout(predicate::str::contains("memcache[:cmd=..]"));
    Ok(())
}

#[test]
fn cli_without_tasks_fails_with_listing() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No task given"))
        .stdout(predicate::str::contains("Available tasks"));
    Ok(())
}

#[test]
fn staging_version_opens_remote_shell_on_that_version() -> Result<(), Box<dyn std::error::Error>>
{
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "staging:1-908ca6a", "shell"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "$ remote_api_shell.py -s 1-908ca6a.latest.key-auth.appspot.com -p /_ah/remote_api key-auth",
        ));
    Ok(())
}

#[test]
fn shell_alone_is_local() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "shell"])
        .assert()
        .success()
        .stdout(predicate::str::contains("$ python"))
        .stdout(predicate::str::contains("remote_api_shell.py").not());
    Ok(())
}

#[test]
fn production_uses_declared_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("v3");
    gaedeploy(&temp)
        .args(["production", "info:format=json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""environment": "production""#))
        .stdout(predicate::str::contains(r#""version": "v3""#))
        .stdout(predicate::str::contains(r#""host": "key-auth.appspot.com""#));
    Ok(())
}

#[test]
fn production_keeps_unquoted_hex_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("0x1a");
    gaedeploy(&temp)
        .args(["production", "info:format=json"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""version": "0x1a""#));
    Ok(())
}

#[test]
fn quiet_still_prints_info() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("v3");
    gaedeploy(&temp)
        .args(["-q", "staging", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Environment: staging"))
        .stdout(predicate::str::contains("Version:     staging"));
    Ok(())
}

#[test]
fn staging_ignores_declared_version() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("v3");
    gaedeploy(&temp)
        .args(["--dry-run", "staging", "deploy"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "$ appcfg.py -A key-auth -V staging update .",
        ));
    Ok(())
}

#[test]
fn conflicting_targets_fail() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "production", "staging", "shell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Conflicting deployment targets"))
        .stdout(predicate::str::contains("$ ").not());
    Ok(())
}

#[test]
fn deploy_without_target_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "deploy"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "A deployment target must be specified",
        ));
    Ok(())
}

#[test]
fn invalid_version_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "staging:Bad_Version", "shell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid version 'Bad_Version'"));
    Ok(())
}

#[test]
fn unknown_task_fails() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "loaddata:fixtures.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown task: loaddata"));
    Ok(())
}

#[test]
fn missing_app_yaml_fails_only_when_a_target_is_needed() -> Result<(), Box<dyn std::error::Error>>
{
    let temp = TempDir::new()?;
    gaedeploy(&temp)
        .args(["--dry-run", "--project", temp.path().to_str().unwrap(), "staging", "shell"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Application config not found"));

    gaedeploy(&temp)
        .args(["--dry-run", "--project", temp.path().to_str().unwrap(), "shell"])
        .assert()
        .success();
    Ok(())
}

#[test]
fn memcache_flush_dry_run() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    gaedeploy(&temp)
        .args(["--dry-run", "staging", "memcache:clear"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Running remote command: memcache.flush_all()",
        ));
    Ok(())
}

#[test]
fn project_settings_are_applied() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    fs::write(
        temp.path().join(".gaedeploy.yml"),
        "appcfg: /opt/sdk/appcfg.py\ntest:\n  modules: [api]\n",
    )?;

    gaedeploy(&temp)
        .args(["--dry-run", "production:v9", "deploy", "test:verbose"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "$ /opt/sdk/appcfg.py -A key-auth -V v9 update .",
        ))
        .stdout(predicate::str::contains(
            "$ python -m unittest -v api.tests",
        ));
    Ok(())
}

#[test]
fn app_yaml_is_found_from_subdirectory() -> Result<(), Box<dyn std::error::Error>> {
    let temp = setup_project("1");
    let nested = temp.path().join("handlers");
    fs::create_dir_all(&nested)?;

    let mut cmd = gaedeploy(&temp);
    cmd.current_dir(&nested)
        .args(["staging", "info"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Host:        staging.latest.key-auth.appspot.com",
        ));
    Ok(())
}

#[test]
fn completions_generate_bash() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    gaedeploy(&temp)
        .arg("completions:bash")
        .assert()
        .success()
        .stdout(predicate::str::contains("gaedeploy"));
    Ok(())
}
