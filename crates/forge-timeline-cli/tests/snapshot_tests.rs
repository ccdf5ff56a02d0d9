// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! End-to-end tests: snapshot file in, timeline out
//!
//! Covers building through [`SnapshotSource`] and running the
//! `forge-timeline` binary against a snapshot written to a temp directory.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use forge_timeline::{FailurePolicy, ProjectId, TimeWindow, TimelineBuilder, TimelineOptions};
use forge_timeline_cli::snapshot::SnapshotSource;
use serde_json::json;
use similar_asserts::assert_eq;

const SNAPSHOT: &str = r#"{
    "project": 42,
    "merge_requests": [
        {
            "iid": 12,
            "author": { "username": "rroe", "name": "Rick Roe" },
            "title": "Fix login redirect",
            "created_at": "2026-03-05T08:00:00Z",
            "web_url": "https://gitlab.example.com/group/app/-/merge_requests/12",
            "commits": ["c3"]
        },
        {
            "iid": 7,
            "author": { "username": "jdoe", "name": "Jane Doe" },
            "title": "Add pagination",
            "created_at": "2026-03-02T10:00:00Z",
            "web_url": "https://gitlab.example.com/group/app/-/merge_requests/7",
            "commits": ["c2", "c1"],
            "changes": [
                { "path": "src/page.rs", "kind": "added", "patch": "+pub struct Page;\n" }
            ]
        }
    ],
    "commits": [
        { "sha": "c1", "message": "Add page type", "author_name": "Jane Doe", "created_at": "2026-03-02T09:00:00Z" },
        { "sha": "c2", "message": "Wire pagination", "author_name": "Jane Doe", "created_at": "2026-03-02T09:30:00Z" },
        { "sha": "c3", "message": "Fix redirect", "author_name": "Rick Roe", "created_at": "2026-03-05T07:00:00Z" },
        { "sha": "o2", "message": "Bump deps", "author_name": "Bot", "created_at": "2026-03-08T00:00:00Z" },
        { "sha": "o1", "message": "Hotfix", "author_name": "Ops", "created_at": "2026-03-03T00:00:00Z" },
        { "sha": "late", "message": "Next month", "author_name": "Ops", "created_at": "2026-04-01T00:00:00Z" }
    ]
}"#;

fn march() -> TimeWindow {
    TimeWindow::new(
        Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap(),
        Utc.with_ymd_and_hms(2026, 4, 1, 0, 0, 0).unwrap(),
    )
    .unwrap()
}

/// Temp directory removed on drop
struct TempDir(PathBuf);

impl TempDir {
    fn new(name: &str) -> Self {
        let path = std::env::temp_dir().join(format!(
            "forge-timeline-{name}-{}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).expect("create temp dir");
        Self(path)
    }

    fn write(&self, file: &str, contents: &str) -> PathBuf {
        let path = self.0.join(file);
        std::fs::write(&path, contents).expect("write temp file");
        path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.0);
    }
}

fn run_binary(snapshot: &Path, extra: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_forge-timeline"))
        .arg("--snapshot")
        .arg(snapshot)
        .args([
            "--project",
            "42",
            "--start",
            "2026-03-01T00:00:00Z",
            "--end",
            "2026-04-01T00:00:00Z",
            "-q",
        ])
        .args(extra)
        .env_remove("FORGE_TIMELINE_CONCURRENCY")
        .output()
        .expect("run forge-timeline")
}

// ============================================================================
// Library
// ============================================================================

#[tokio::test]
async fn test_snapshot_timeline() {
    let source = Arc::new(SnapshotSource::from_json(SNAPSHOT).unwrap());
    let timeline = TimelineBuilder::new(TimelineOptions::default().with_concurrency(2))
        .build(source, ProjectId(42), march())
        .await
        .expect("timeline should build");

    let iids: Vec<_> = timeline.merge_requests.iter().map(|mr| mr.iid()).collect();
    assert_eq!(iids, vec![7, 12]);

    let shas: Vec<_> = timeline.merge_requests[0].commit_shas().collect();
    assert_eq!(shas, vec!["c1", "c2"]);
    assert_eq!(timeline.merge_requests[0].changes[0].path, "src/page.rs");

    let orphans: Vec<_> = timeline.orphan_commits.iter().map(|c| c.sha()).collect();
    assert_eq!(orphans, vec!["o1", "o2"]);
    assert!(timeline.is_complete());
}

#[tokio::test]
async fn test_snapshot_rows() {
    let source = Arc::new(SnapshotSource::from_json(SNAPSHOT).unwrap());
    let timeline = TimelineBuilder::default()
        .build(source, ProjectId(42), march())
        .await
        .unwrap();

    let rows = timeline.merge_request_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1].iid, 12);
    assert_eq!(rows[1].author_username, "rroe");
    assert_eq!(rows[1].project, ProjectId(42));
}

#[tokio::test]
async fn test_wrong_project_fails() {
    let source = Arc::new(SnapshotSource::from_json(SNAPSHOT).unwrap());
    let result = TimelineBuilder::new(
        TimelineOptions::default().with_policy(FailurePolicy::SkipFailed),
    )
    .build(source, ProjectId(7), march())
    .await;
    assert!(result.is_err(), "listing failures are fatal under any policy");
}

// ============================================================================
// Binary
// ============================================================================

#[test]
fn test_binary_json_output() {
    let dir = TempDir::new("json");
    let snapshot = dir.write("snapshot.json", SNAPSHOT);

    let output = run_binary(&snapshot, &[]);
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));

    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should be JSON");
    assert_eq!(value["project"], json!(42));
    assert_eq!(value["merge_requests"][0]["iid"], json!(7));
    assert_eq!(value["merge_requests"][1]["iid"], json!(12));
    assert_eq!(value["orphan_commits"][0]["sha"], json!("o1"));
    assert!(value.get("skipped").is_none());
}

#[test]
fn test_binary_summary_output() {
    let dir = TempDir::new("summary");
    let snapshot = dir.write("snapshot.json", SNAPSHOT);

    let output = run_binary(&snapshot, &["--format", "summary"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("2 merge requests, 2 orphan commits, 5 commits total"));
    assert!(stdout.contains("!7 Add pagination (@jdoe)"));
    assert!(stdout.contains("!12 Fix login redirect (@rroe)"));
}

#[test]
fn test_binary_missing_snapshot_fails() {
    let output = run_binary(Path::new("/nonexistent/snapshot.json"), &[]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_binary_invalid_snapshot_fails() {
    let dir = TempDir::new("invalid");
    let snapshot = dir.write("snapshot.json", "{ \"project\": ");

    let output = run_binary(&snapshot, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid snapshot JSON"));
}
