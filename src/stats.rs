//! Per-author and repository-wide commit statistics.

use crate::cli::CommonArgs;
use crate::error::Result;
use crate::git::GitRepo;
use crate::model::{AuthorStats, CommitRecord, DateRange, RepoStats, StatsOutput};
use anyhow::Context;
use chrono::Utc;
use console::style;
use std::collections::{BTreeSet, HashMap};

#[derive(Default)]
struct AuthorAccum {
    commits: usize,
    files: BTreeSet<String>,
    insertions: u64,
    deletions: u64,
}

/// Fold commit records (with diff stats) into per-author buckets keyed by
/// the exact author string. File counts are distinct-path set sizes: a file
/// touched by three commits counts once.
pub fn aggregate(commits: &[CommitRecord]) -> RepoStats {
    let mut buckets: HashMap<String, AuthorAccum> = HashMap::new();
    let mut all_files: BTreeSet<String> = BTreeSet::new();

    for commit in commits {
        let accum = buckets.entry(commit.author.clone()).or_default();
        accum.commits += 1;
        if let Some(stats) = &commit.stats {
            for file in &stats.files {
                accum.files.insert(file.clone());
                all_files.insert(file.clone());
            }
            accum.insertions += stats.insertions as u64;
            accum.deletions += stats.deletions as u64;
        }
    }

    let mut author_stats: Vec<AuthorStats> = buckets
        .into_iter()
        .map(|(author, accum)| AuthorStats {
            author,
            total_commits: accum.commits,
            files_changed: accum.files.len(),
            insertions: accum.insertions,
            deletions: accum.deletions,
            net_lines: accum.insertions as i64 - accum.deletions as i64,
        })
        .collect();

    // Most active first; name tiebreak keeps the order reproducible.
    author_stats.sort_by(|a, b| {
        b.total_commits
            .cmp(&a.total_commits)
            .then_with(|| a.author.cmp(&b.author))
    });

    let total_insertions: u64 = author_stats.iter().map(|a| a.insertions).sum();
    let total_deletions: u64 = author_stats.iter().map(|a| a.deletions).sum();

    RepoStats {
        total_commits: commits.len(),
        total_authors: author_stats.len(),
        total_files_changed: all_files.len(),
        total_insertions,
        total_deletions,
        net_lines: total_insertions as i64 - total_deletions as i64,
        author_stats,
    }
}

/// Retrieve commits with diff metadata and aggregate them. Zero qualifying
/// commits yields an all-zero result, not an error.
pub fn compute_stats(
    repo: &GitRepo,
    range: &DateRange,
    author_filter: Option<&str>,
) -> Result<RepoStats> {
    let commits = repo.list_commits(range, author_filter, true)?;
    Ok(aggregate(&commits))
}

pub fn exec(common: &CommonArgs, range: DateRange, json: bool) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let stats = compute_stats(&repo, &range, common.author.as_deref())
        .context("Failed to compute commit statistics")?;

    if json {
        output_json(&stats, &repo, &range, common)?;
    } else {
        output_table(&stats, &range);
    }
    Ok(())
}

fn output_json(
    stats: &RepoStats,
    repo: &GitRepo,
    range: &DateRange,
    common: &CommonArgs,
) -> anyhow::Result<()> {
    let output = StatsOutput {
        generated_at: Utc::now(),
        repository: repo.path().to_string_lossy().to_string(),
        since: range.start.format("%Y-%m-%d").to_string(),
        until: range.end.format("%Y-%m-%d").to_string(),
        author: common.author.clone(),
        stats: stats.clone(),
    };
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_table(stats: &RepoStats, range: &DateRange) {
    println!("{} ({})", style("Commit Statistics").bold(), range.label());
    println!("{}", "─".repeat(86));
    println!(
        "{:<25} {:>8} {:>8} {:>10} {:>10} {:>10}",
        style("Author").bold(),
        style("Commits").bold(),
        style("Files").bold(),
        style("Added").bold(),
        style("Deleted").bold(),
        style("Net").bold()
    );
    for a in &stats.author_stats {
        println!(
            "{:<25} {:>8} {:>8} {:>10} {:>10} {:>10}",
            a.author, a.total_commits, a.files_changed, a.insertions, a.deletions, a.net_lines
        );
    }
    println!("{}", "─".repeat(86));
    println!(
        "{:<25} {:>8} {:>8} {:>10} {:>10} {:>10}",
        style("Total").bold(),
        stats.total_commits,
        stats.total_files_changed,
        stats.total_insertions,
        stats.total_deletions,
        stats.net_lines
    );
    println!(
        "{} author(s), {} commit(s)",
        stats.total_authors, stats.total_commits
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DiffStats;
    use chrono::Utc;

    fn record(author: &str, files: &[&str], insertions: u32, deletions: u32) -> CommitRecord {
        CommitRecord {
            hash: "0000000".to_string(),
            author: author.to_string(),
            timestamp: Utc::now(),
            subject: "work".to_string(),
            stats: Some(DiffStats {
                files: files.iter().map(|f| f.to_string()).collect(),
                insertions,
                deletions,
            }),
        }
    }

    #[test]
    fn distinct_files_count_once_per_author() {
        let commits = vec![
            record("Ana", &["a.go"], 10, 2),
            record("Ben", &["c.go"], 1, 1),
            record("Ana", &["a.go", "b.go"], 5, 1),
        ];
        let stats = aggregate(&commits);

        let ana = &stats.author_stats[0];
        assert_eq!(ana.author, "Ana");
        assert_eq!(ana.total_commits, 2);
        assert_eq!(ana.files_changed, 2);
        assert_eq!(ana.insertions, 15);
        assert_eq!(ana.deletions, 3);
        assert_eq!(ana.net_lines, 12);

        assert_eq!(stats.total_commits, 3);
        assert_eq!(stats.total_authors, 2);
        assert_eq!(stats.total_files_changed, 3);
        assert_eq!(stats.total_insertions, 16);
        assert_eq!(stats.total_deletions, 4);
        assert_eq!(stats.net_lines, 12);
    }

    #[test]
    fn authors_sorted_by_commits_then_name() {
        let commits = vec![
            record("Zoe", &["z"], 1, 0),
            record("Ana", &["a"], 1, 0),
            record("Ben", &["b"], 2, 0),
            record("Ben", &["b"], 0, 0),
        ];
        let stats = aggregate(&commits);
        let names: Vec<&str> = stats.author_stats.iter().map(|a| a.author.as_str()).collect();
        assert_eq!(names, ["Ben", "Ana", "Zoe"]);
    }

    #[test]
    fn empty_input_yields_zeroed_stats() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_commits, 0);
        assert_eq!(stats.total_authors, 0);
        assert_eq!(stats.total_files_changed, 0);
        assert_eq!(stats.net_lines, 0);
        assert!(stats.author_stats.is_empty());
    }

    #[test]
    fn commits_without_diff_stats_still_count() {
        let mut commit = record("Ana", &[], 0, 0);
        commit.stats = None;
        let stats = aggregate(&[commit]);
        assert_eq!(stats.total_commits, 1);
        assert_eq!(stats.author_stats[0].files_changed, 0);
    }
}
