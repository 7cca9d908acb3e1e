//! Multi-repository scanning: fan out independent repository reads on a
//! bounded worker pool, then merge results back into a stable order so a
//! parallel run is indistinguishable from a sequential one.

use crate::error::{ReportError, Result};
use crate::git::GitRepo;
use crate::model::{CommitRecord, DateRange};
use log::debug;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

const MAX_SCAN_THREADS: usize = 8;

/// Immediate subdirectories of `workspace` that are repository roots,
/// sorted by path.
pub fn discover_repos(workspace: &Path) -> Result<Vec<PathBuf>> {
    let mut repos = Vec::new();
    for entry in std::fs::read_dir(workspace)? {
        let path = entry?.path();
        if path.is_dir() && path.join(".git").exists() {
            repos.push(path);
        }
    }
    repos.sort();
    debug!("discovered {} repositories under {}", repos.len(), workspace.display());
    Ok(repos)
}

/// Scan every repository in `paths` for commits in `range` and return each
/// commit tagged with its repository name. Scans run in parallel; the merged
/// result is ordered by repository path, then newest first within each
/// repository. A failure in any repository fails the whole scan.
pub fn scan_repos(
    paths: &[PathBuf],
    range: &DateRange,
    author_filter: Option<&str>,
    with_stats: bool,
) -> Result<Vec<(String, CommitRecord)>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(MAX_SCAN_THREADS.min(paths.len().max(1)))
        .build()
        .map_err(|e| ReportError::ThreadPool(e.to_string()))?;

    let mut results: Vec<(PathBuf, String, Vec<CommitRecord>)> = pool.install(|| {
        paths
            .par_iter()
            .map(|p| {
                let repo = GitRepo::open(Some(p))?;
                let commits = repo.list_commits(range, author_filter, with_stats)?;
                Ok((p.clone(), repo.name(), commits))
            })
            .collect::<Result<Vec<_>>>()
    })?;

    // Completion order is nondeterministic; the merge order is not.
    results.sort_by(|a, b| a.0.cmp(&b.0));

    let mut merged = Vec::new();
    for (_, name, commits) in results {
        merged.extend(commits.into_iter().map(|c| (name.clone(), c)));
    }
    Ok(merged)
}
