use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

use super::unpacked_bundle;

fn cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_freely-templates"));
    cmd.env_remove("RUST_LOG").env_remove("FREELY_TEMPLATES_CONFIG");
    cmd
}

#[test]
fn test_help_lists_commands() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("unpack"))
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("render"))
        .stdout(predicate::str::contains("--verbose"));
}

#[test]
fn test_unpack_then_check() {
    let dir = TempDir::new().unwrap();

    cmd()
        .args(["--quiet", "unpack", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Unpacked into"));
    assert!(dir.path().join("templates/base.tmpl").is_file());
    assert!(dir.path().join("static/css/write.css").is_file());

    cmd()
        .args(["--quiet", "unpack", "--dir"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("0 directories and 0 files created"));

    cmd()
        .current_dir(dir.path())
        .args(["--quiet", "check"])
        .assert()
        .success()
        .stdout(predicate::str::contains("6 pages, 7 user pages"));
}

#[test]
fn test_check_reports_missing_directory() {
    let dir = TempDir::new().unwrap();

    cmd()
        .current_dir(dir.path())
        .args(["--quiet", "check"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("'templates/' templates does not exist"))
        .stderr(predicate::str::contains("freely-templates unpack"));
}

#[test]
fn test_config_file_points_at_tree() {
    let tree = unpacked_bundle();
    let elsewhere = TempDir::new().unwrap();
    let config = elsewhere.path().join("config.toml");
    let root = tree.path().display().to_string();
    fs::write(
        &config,
        format!("[server]\ntemplates_parent_dir = {root:?}\npages_parent_dir = {root:?}\n"),
    )
    .unwrap();

    cmd()
        .current_dir(elsewhere.path())
        .arg("--quiet")
        .arg("--config")
        .arg(&config)
        .args(["list", "--namespace", "pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("about.tmpl\n"))
        .stdout(predicate::str::contains("markdown.tmpl\n"));
}

#[test]
fn test_list_all_namespaces_with_paths() {
    let tree = unpacked_bundle();

    cmd()
        .current_dir(tree.path())
        .args(["--quiet", "list", "--paths"])
        .assert()
        .success()
        .stdout(predicate::str::contains("templates:"))
        .stdout(predicate::str::contains("user:"))
        .stdout(predicate::str::contains("include/nav.tmpl\t"))
        .stdout(predicate::str::contains("pages/help/markdown.tmpl"));
}

#[test]
fn test_render_page_with_data() {
    let tree = unpacked_bundle();
    let data = tree.path().join("about.json");
    fs::write(&data, r#"{"title": "About us", "users": 42}"#).unwrap();

    cmd()
        .current_dir(tree.path())
        .args(["--quiet", "render", "about.tmpl", "--data"])
        .arg(&data)
        .assert()
        .success()
        .stdout(predicate::str::contains("<h2>About us</h2>"))
        .stdout(predicate::str::contains("42 writers"));
}

#[test]
fn test_render_with_strings() {
    let tree = unpacked_bundle();
    let strings = tree.path().join("strings.toml");
    fs::write(&strings, "[\"\"]\n\"No posts yet.\" = \"Nothing here yet.\"\n").unwrap();

    cmd()
        .current_dir(tree.path())
        .args(["--quiet", "render", "read", "--namespace", "templates", "--strings"])
        .arg(&strings)
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing here yet."));
}

#[test]
fn test_render_unknown_key_suggests_list() {
    let tree = unpacked_bundle();

    cmd()
        .current_dir(tree.path())
        .args(["--quiet", "render", "missing.tmpl"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("no template 'missing.tmpl' in the pages namespace"))
        .stderr(predicate::str::contains("list --namespace pages"));
}

#[test]
fn test_render_failure_prints_nothing_to_stdout() {
    let tree = unpacked_bundle();

    cmd()
        .current_dir(tree.path())
        .args(["--quiet", "render", "settings.tmpl", "--namespace", "user"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("username"));
}

#[test]
fn test_render_shell_template_fails_cleanly() {
    let tree = unpacked_bundle();

    cmd()
        .current_dir(tree.path())
        .args(["--quiet", "render", "base", "--namespace", "templates"])
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty());
}
