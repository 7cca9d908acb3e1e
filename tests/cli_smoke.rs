use assert_cmd::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn has_git() -> bool {
    Command::new("git").arg("--version").output().is_ok()
}

fn init_git_repo(dir: &Path) {
    // init and basic identity
    assert!(Command::new("git")
        .args(["init"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "core.autocrlf", "false"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.email", "you@example.com"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["config", "user.name", "Your Name"])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn commit_file(dir: &Path, name: &str, content: &str, message: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    let mut f = File::create(&path).unwrap();
    f.write_all(content.as_bytes()).unwrap();
    f.sync_all().unwrap();
    assert!(Command::new("git")
        .args(["add", "."])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
    assert!(Command::new("git")
        .args(["commit", "-m", message])
        .current_dir(dir)
        .status()
        .unwrap()
        .success());
}

fn seeded_repo() -> tempfile::TempDir {
    let dir = tempdir().unwrap();
    init_git_repo(dir.path());
    commit_file(dir.path(), "src/ui.rs", "fn ui(){}\n", "Fix modal close button");
    commit_file(dir.path(), "src/api.rs", "fn api(){}\n", "PROJ-7 add api endpoint");
    commit_file(dir.path(), "CHANGELOG", "v1\n", "bump changelog");
    dir
}

#[test]
fn days_export_json_outputs_commits() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["days", "7", "--export", "json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(v["total_commits"], serde_json::json!(3));
    let commits = v["commits"].as_array().unwrap();
    assert_eq!(commits.len(), 3);
    let messages: Vec<&str> = commits.iter().map(|c| c["message"].as_str().unwrap()).collect();
    assert!(messages.contains(&"Fix modal close button"));
    assert!(messages.contains(&"PROJ-7 add api endpoint"));
    assert_eq!(v["metadata"]["title"], serde_json::json!("Commit Report"));
}

#[test]
fn grouped_markdown_export_has_component_headings() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["days", "7", "--export", "markdown", "--group"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8(out).unwrap();

    let console_at = text.find("## Console (1 commits)").unwrap();
    let server_at = text.find("## Server (1 commits)").unwrap();
    let others_at = text.find("## Others (1 commits)").unwrap();
    assert!(console_at < server_at && server_at < others_at);
}

#[test]
fn export_to_output_file_writes_report() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();
    let out_file = dir.path().join("report.html");

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["days", "7", "--export", "html", "--output"])
        .arg(&out_file);
    cmd.assert().success();

    let html = fs::read_to_string(&out_file).unwrap();
    assert!(html.contains("class='hash'"));
    assert!(html.contains("Fix modal close button"));
}

#[test]
fn unsupported_export_format_fails() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["days", "7", "--export", "yaml"]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("Unsupported export format"));
}

#[test]
fn inverted_range_fails_with_invalid_date() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["range", "--from", "2025-02-01", "--to", "2025-01-01"]);
    let out = cmd.assert().failure().get_output().stderr.clone();
    assert!(String::from_utf8_lossy(&out).contains("Invalid date"));
}

#[test]
fn empty_range_is_a_valid_empty_report() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["range", "--from", "1999-01-01", "--to", "1999-01-31"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&out).contains("No commits found"));
}

#[test]
fn stats_json_reports_author_totals() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["stats", "--json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();

    assert_eq!(v["stats"]["total_commits"], serde_json::json!(3));
    let authors = v["stats"]["author_stats"].as_array().unwrap();
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0]["author"], serde_json::json!("Your Name"));
    assert_eq!(authors[0]["total_commits"], serde_json::json!(3));
}

#[test]
fn tickets_groups_by_identifier() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["tickets", "--days", "7"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8_lossy(&out).to_string();
    assert!(text.contains("PROJ-7 (1 commits)"));
    assert!(text.contains("commit(s) without ticket numbers"));
}

#[test]
fn authors_lists_configured_identity() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["authors", "--days", "7"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    assert!(String::from_utf8_lossy(&out).contains("Your Name"));
}

#[test]
fn me_filter_resolves_to_configured_identity() {
    if !has_git() {
        return;
    }
    let dir = seeded_repo();

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(dir.path())
        .arg("--repo")
        .arg(dir.path())
        .args(["--author", "me", "days", "7", "--export", "json"]);
    let out = cmd.assert().success().get_output().stdout.clone();
    let v: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(v["total_commits"], serde_json::json!(3));
}

#[test]
fn multirepo_scans_workspace_subdirectories() {
    if !has_git() {
        return;
    }
    let workspace = tempdir().unwrap();
    for (name, message) in [("alpha", "alpha work"), ("beta", "beta work")] {
        let repo = workspace.path().join(name);
        fs::create_dir_all(&repo).unwrap();
        init_git_repo(&repo);
        commit_file(&repo, "a.txt", "x\n", message);
    }

    let mut cmd = Command::cargo_bin("greport").unwrap();
    cmd.current_dir(workspace.path())
        .args(["multirepo", "--days", "7", "--workspace"])
        .arg(workspace.path());
    let out = cmd.assert().success().get_output().stdout.clone();
    let text = String::from_utf8_lossy(&out).to_string();
    assert!(text.contains("alpha"));
    assert!(text.contains("beta"));
    assert!(text.contains("alpha work"));
    assert!(text.contains("beta work"));
}
