use crate::error::{ReportError, Result};
use crate::model::{CommitRecord, DateRange, DiffStats};
use chrono::DateTime;
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use log::{debug, warn};
use std::collections::{BTreeSet, HashSet, VecDeque};
use std::path::{Path, PathBuf};

const SHORT_HASH_LEN: usize = 7;

/// How an author filter string is interpreted. `"me"` resolves to the
/// configured committer identity and matches it exactly; any other string is
/// a case-insensitive substring match against the display name.
enum AuthorMatch {
    Any,
    Exact(String),
    Substring(String),
}

impl AuthorMatch {
    fn matches(&self, name: &str) -> bool {
        match self {
            AuthorMatch::Any => true,
            AuthorMatch::Exact(identity) => name == identity,
            AuthorMatch::Substring(needle) => name.to_lowercase().contains(needle),
        }
    }
}

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open the repository at `path` (or the current dir if `None`),
    /// searching ancestor directories upward for a repository root.
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = match path {
            Some(p) => p.as_ref().to_path_buf(),
            None => std::env::current_dir()?,
        };

        let repo = discover(&repo_path)
            .map_err(|_| ReportError::NotARepository(repo_path.display().to_string()))?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory name used to tag commits in multi-repository reports.
    pub fn name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    fn user_name(&self) -> Option<String> {
        self.repo
            .config_snapshot()
            .string("user.name")
            .map(|v| v.to_string())
    }

    fn author_matcher(&self, filter: Option<&str>) -> AuthorMatch {
        match filter {
            None => AuthorMatch::Any,
            Some(f) if f.eq_ignore_ascii_case("me") => match self.user_name() {
                Some(identity) => AuthorMatch::Exact(identity),
                None => {
                    warn!("user.name is not configured; 'me' filter matches all authors");
                    AuthorMatch::Any
                }
            },
            Some(f) => AuthorMatch::Substring(f.to_lowercase()),
        }
    }

    /// Walk the history reachable from `HEAD` and return the commits inside
    /// `range`, newest first. Merge commits are always excluded. When
    /// `with_stats` is set, each record carries changed files and line
    /// counts diffed against the first parent.
    ///
    /// An empty result is a valid report input, not an error.
    pub fn list_commits(
        &self,
        range: &DateRange,
        author_filter: Option<&str>,
        with_stats: bool,
    ) -> Result<Vec<CommitRecord>> {
        let matcher = self.author_matcher(author_filter);

        let mut head = self.repo.head()?;
        let head_commit = head.peel_to_commit_in_place()?;

        let mut records = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| ReportError::InvalidDate(format!("invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            let qualifies = range.contains(&timestamp) && parents.len() <= 1;
            if qualifies {
                // BStr display is lossy UTF-8, so one malformed message never
                // fails the whole retrieval.
                let author = commit.author()?.name.to_string();
                if matcher.matches(&author) {
                    let subject = commit.message()?.title.to_string().trim().to_string();
                    let stats = if with_stats {
                        Some(self.diff_stats(commit_id, parents.first().copied())?)
                    } else {
                        None
                    };
                    records.push(CommitRecord {
                        hash: commit_id.to_hex_with_len(SHORT_HASH_LEN).to_string(),
                        author,
                        timestamp,
                        subject,
                        stats,
                    });
                }
            }

            for pid in parents {
                stack.push_back(pid);
            }
        }

        // Newest first; hash tiebreak keeps the order reproducible when
        // commits share a timestamp.
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(a.hash.cmp(&b.hash)));
        debug!(
            "collected {} commits from {} in {}",
            records.len(),
            self.name(),
            range.label()
        );
        Ok(records)
    }

    /// Distinct author display names in `range`, alphabetically sorted.
    /// Dedup is by exact string match; no identity merging is attempted.
    pub fn list_authors(&self, range: &DateRange) -> Result<Vec<String>> {
        let commits = self.list_commits(range, None, false)?;
        let names: BTreeSet<String> = commits.into_iter().map(|c| c.author).collect();
        Ok(names.into_iter().collect())
    }

    fn diff_stats(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<DiffStats> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let parent_tree = match parent_id {
            Some(pid) => Some(self.repo.find_commit(pid)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)?;

        let mut stats = DiffStats {
            files: BTreeSet::new(),
            insertions: 0,
            deletions: 0,
        };
        for change in changes {
            self.accumulate_change(change, &mut stats)?;
        }
        Ok(stats)
    }

    fn accumulate_change(&self, change: ChangeDetached, stats: &mut DiffStats) -> Result<()> {
        match change {
            ChangeDetached::Addition { id, location, .. } => {
                stats.files.insert(location.to_string());
                if let Ok(obj) = self.repo.find_object(id) {
                    if !is_binary_object(&obj) {
                        stats.insertions += count_lines(&obj);
                    }
                }
            }
            ChangeDetached::Deletion { id, location, .. } => {
                stats.files.insert(location.to_string());
                if let Ok(obj) = self.repo.find_object(id) {
                    if !is_binary_object(&obj) {
                        stats.deletions += count_lines(&obj);
                    }
                }
            }
            ChangeDetached::Modification {
                previous_id,
                id,
                location,
                ..
            } => {
                stats.files.insert(location.to_string());
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(previous_id), self.repo.find_object(id))
                {
                    if !is_binary_object(&old_obj) && !is_binary_object(&new_obj) {
                        let (added, deleted) = compute_line_diff(&old_obj, &new_obj);
                        stats.insertions += added;
                        stats.deletions += deleted;
                    }
                }
            }
            ChangeDetached::Rewrite {
                source_id,
                id,
                source_location,
                location,
                copy,
                ..
            } => {
                stats.files.insert(source_location.to_string());
                stats.files.insert(location.to_string());
                if let (Ok(old_obj), Ok(new_obj)) =
                    (self.repo.find_object(source_id), self.repo.find_object(id))
                {
                    if !is_binary_object(&old_obj) && !is_binary_object(&new_obj) {
                        let (added, deleted) = compute_line_diff(&old_obj, &new_obj);
                        stats.insertions += added;
                        if !copy {
                            stats.deletions += deleted;
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

fn is_binary_object(object: &gix::Object) -> bool {
    object.data.as_slice().iter().take(8192).any(|&b| b == 0)
}

fn count_lines(object: &gix::Object) -> u32 {
    std::str::from_utf8(object.data.as_slice())
        .map(|t| t.lines().count() as u32)
        .unwrap_or(0)
}

fn compute_line_diff(old_object: &gix::Object, new_object: &gix::Object) -> (u32, u32) {
    let old_text = std::str::from_utf8(old_object.data.as_slice()).unwrap_or("");
    let new_text = std::str::from_utf8(new_object.data.as_slice()).unwrap_or("");

    let old_lines: Vec<&str> = old_text.lines().collect();
    let new_lines: Vec<&str> = new_text.lines().collect();

    let mut added = 0usize;
    let mut deleted = 0usize;
    let (mut oi, mut ni) = (0usize, 0usize);

    while oi < old_lines.len() || ni < new_lines.len() {
        if oi >= old_lines.len() {
            added += new_lines.len() - ni;
            break;
        }
        if ni >= new_lines.len() {
            deleted += old_lines.len() - oi;
            break;
        }

        if old_lines[oi] == new_lines[ni] {
            oi += 1;
            ni += 1;
            continue;
        }

        let mut found = false;
        for look_ahead in 1..=3 {
            if oi + look_ahead < old_lines.len() && old_lines[oi + look_ahead] == new_lines[ni] {
                deleted += look_ahead;
                oi += look_ahead;
                found = true;
                break;
            }
            if ni + look_ahead < new_lines.len() && old_lines[oi] == new_lines[ni + look_ahead] {
                added += look_ahead;
                ni += look_ahead;
                found = true;
                break;
            }
        }

        if !found {
            deleted += 1;
            added += 1;
            oi += 1;
            ni += 1;
        }
    }

    (added as u32, deleted as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matcher_is_case_insensitive() {
        let matcher = AuthorMatch::Substring("dan".to_string());
        assert!(matcher.matches("Dan Smith"));
        assert!(matcher.matches("DANIELLE"));
        assert!(!matcher.matches("Eve"));
    }

    #[test]
    fn exact_matcher_does_not_substring_match() {
        let matcher = AuthorMatch::Exact("Dan".to_string());
        assert!(matcher.matches("Dan"));
        assert!(!matcher.matches("Danielle"));
        assert!(!matcher.matches("dan"));
    }
}
