//! Ticket identifier extraction and grouping.
//!
//! Patterns are an ordered table tried first-match-wins; custom patterns
//! replace the defaults entirely rather than merging with them.

use crate::cli::CommonArgs;
use crate::error::{ReportError, Result};
use crate::git::GitRepo;
use crate::model::{CommitRecord, DateRange, TicketGroup};
use crate::report::print_commits_table;
use anyhow::Context;
use console::style;
use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;

/// Default patterns for common issue trackers, in match priority order.
pub const DEFAULT_PATTERNS: &[&str] = &[
    r"([A-Z]{2,10}-\d+)",            // JIRA, Linear: PROJECT-123
    r"#(\d+)",                       // GitHub: #123
    r"GH-(\d+)",                     // GitHub: GH-123
    r"(?:ticket|issue)[:\s]+#?(\d+)", // Generic: ticket #123, issue: 123
];

/// A compiled, ordered pattern table. Each pattern is expected to carry one
/// capturing group yielding the identifier; without a group the full match
/// is used.
#[derive(Debug)]
pub struct TicketPatterns {
    patterns: Vec<Regex>,
}

impl TicketPatterns {
    pub fn default_set() -> Result<Self> {
        Self::compile(DEFAULT_PATTERNS.iter().copied())
    }

    /// Compile custom patterns, which fully replace the default set.
    pub fn custom<'a, I: IntoIterator<Item = &'a str>>(patterns: I) -> Result<Self> {
        Self::compile(patterns)
    }

    fn compile<'a, I: IntoIterator<Item = &'a str>>(patterns: I) -> Result<Self> {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                RegexBuilder::new(p)
                    .case_insensitive(true)
                    .build()
                    .map_err(|e| ReportError::InvalidArgument(format!("bad ticket pattern '{p}': {e}")))
            })
            .collect::<Result<Vec<Regex>>>()?;
        Ok(Self { patterns })
    }

    /// Extract the first matching ticket identifier, uppercased for
    /// normalization.
    pub fn extract(&self, message: &str) -> Option<String> {
        for pattern in &self.patterns {
            if let Some(caps) = pattern.captures(message) {
                let id = caps
                    .get(1)
                    .or_else(|| caps.get(0))
                    .map(|m| m.as_str().to_uppercase());
                if id.is_some() {
                    return id;
                }
            }
        }
        None
    }

    /// Partition commits into per-ticket groups (ordered by ticket id) and
    /// an unmatched remainder. Every commit appears exactly once across the
    /// two collections.
    pub fn group(&self, commits: &[CommitRecord]) -> (Vec<TicketGroup>, Vec<CommitRecord>) {
        let mut groups: BTreeMap<String, Vec<CommitRecord>> = BTreeMap::new();
        let mut unmatched = Vec::new();

        for commit in commits {
            match self.extract(&commit.subject) {
                Some(ticket_id) => groups.entry(ticket_id).or_default().push(commit.clone()),
                None => unmatched.push(commit.clone()),
            }
        }

        let grouped = groups
            .into_iter()
            .map(|(ticket_id, commits)| TicketGroup { ticket_id, commits })
            .collect();
        (grouped, unmatched)
    }
}

pub fn exec(common: &CommonArgs, range: DateRange, patterns: Option<&str>) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let commits = repo
        .list_commits(&range, common.author.as_deref(), false)
        .context("Failed to collect commits")?;

    if commits.is_empty() {
        println!("No commits found for {}.", range.label());
        return Ok(());
    }

    let patterns = match patterns {
        Some(p) => TicketPatterns::custom(p.split(',').map(str::trim))?,
        None => TicketPatterns::default_set()?,
    };
    let (grouped, unmatched) = patterns.group(&commits);

    println!("{} ({})\n", style("Tickets Report").bold(), range.label());

    if grouped.is_empty() {
        println!("No tickets found in commits.");
    } else {
        let grouped_total: usize = grouped.iter().map(|g| g.commits.len()).sum();
        println!("Found {} ticket(s) with {} commits:\n", grouped.len(), grouped_total);
        for group in &grouped {
            let heading = format!("{} ({} commits)", group.ticket_id, group.commits.len());
            print_commits_table(&group.commits, Some(&heading));
        }
    }

    if !unmatched.is_empty() {
        println!("{} commit(s) without ticket numbers:", unmatched.len());
        print_commits_table(&unmatched, None);
    }
    Ok(())
}
