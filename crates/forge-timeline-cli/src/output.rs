//! Rendering of finished timelines

use std::fmt::Write;

use forge_timeline::{EnrichedCommit, SkipTarget, Timeline};

use crate::config::OutputFormat;

/// Render a timeline in the requested format
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn render(timeline: &Timeline, format: OutputFormat) -> Result<String, serde_json::Error> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(timeline),
        OutputFormat::Summary => Ok(render_summary(timeline)),
    }
}

/// Plain-text summary: one line per merge request, commit, and skipped item
#[must_use]
pub fn render_summary(timeline: &Timeline) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Project {} {}", timeline.project, timeline.window);
    let _ = writeln!(
        out,
        "{} merge requests, {} orphan commits, {} commits total",
        timeline.merge_requests.len(),
        timeline.orphan_commits.len(),
        timeline.commit_count()
    );

    for mr in &timeline.merge_requests {
        let record = &mr.merge_request;
        let stats = mr.diff_stats();
        let _ = writeln!(
            out,
            "\n!{} {} (@{}) {}",
            record.iid,
            record.title,
            record.author.username,
            record.created_at.format("%Y-%m-%d %H:%M")
        );
        let _ = writeln!(
            out,
            "    {} commits, {} files, +{} -{}",
            mr.commits.len(),
            stats.files_changed,
            stats.insertions,
            stats.deletions
        );
        for commit in &mr.commits {
            write_commit(&mut out, "    ", commit);
        }
    }

    if !timeline.orphan_commits.is_empty() {
        let _ = writeln!(out, "\nOrphan commits");
        for commit in &timeline.orphan_commits {
            write_commit(&mut out, "  ", commit);
        }
    }

    if !timeline.skipped.is_empty() {
        let _ = writeln!(out, "\nSkipped");
        for item in &timeline.skipped {
            let target = match &item.target {
                SkipTarget::MergeRequest { iid } => format!("merge request !{iid}"),
                SkipTarget::Commit { sha } => format!("commit {sha}"),
            };
            let _ = writeln!(out, "  {target}: {}", item.reason);
        }
    }

    out
}

fn write_commit(out: &mut String, indent: &str, commit: &EnrichedCommit) {
    let stats = commit.diff_stats();
    let _ = writeln!(
        out,
        "{indent}{} {} {} +{} -{}",
        commit.commit.short_sha(),
        commit.created_at().format("%Y-%m-%d %H:%M"),
        commit.commit.subject(),
        stats.insertions,
        stats.deletions
    );
}
