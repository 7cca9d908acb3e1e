//! Report command execution: fetch commits for a range, render tables,
//! hand off to the exporter or the summarizer.

use crate::categorize::group_by_component;
use crate::cli::CommonArgs;
use crate::export::{export, ExportFormat};
use crate::git::{discover_repos, scan_repos, GitRepo};
use crate::model::{CommitRecord, DateRange, ReportMetadata};
use crate::summarize::{GroqSummarizer, ReportKind, Summarize, SummaryRequest};
use anyhow::{bail, Context};
use chrono::Utc;
use console::style;
use std::path::PathBuf;

const MESSAGE_WIDTH: usize = 50;

pub struct ReportOptions {
    pub summarize: bool,
    pub group: bool,
    pub team: bool,
    pub export: Option<String>,
    pub output: Option<PathBuf>,
}

pub fn exec_period(
    common: &CommonArgs,
    range: DateRange,
    title: &str,
    kind: ReportKind,
    opts: &ReportOptions,
) -> anyhow::Result<()> {
    let team_requested = opts.team
        || common
            .author
            .as_deref()
            .is_some_and(|a| a.eq_ignore_ascii_case("all"));
    if team_requested {
        return exec_team(common, range, kind, opts.summarize);
    }

    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let commits = repo
        .list_commits(&range, common.author.as_deref(), false)
        .context("Failed to collect commits")?;

    if commits.is_empty() {
        println!("No commits found for {}.", range.label());
        return Ok(());
    }

    if let Some(format) = &opts.export {
        let format: ExportFormat = format.parse()?;
        let metadata = ReportMetadata::new(title, &range, common.author.as_deref());
        let grouped = opts
            .group
            .then(|| group_by_component(&commits).into_named());
        let content = export(&commits, format, &metadata, grouped.as_deref(), Utc::now())?;
        return write_output(&content, opts.output.as_deref());
    }

    print_report(&commits, title, opts.group);

    if opts.summarize {
        let summarizer = GroqSummarizer::from_env()?;
        print_summary(&summarizer, &commits, kind, opts.group)?;
    }
    Ok(())
}

fn exec_team(
    common: &CommonArgs,
    range: DateRange,
    kind: ReportKind,
    summarize: bool,
) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let authors = repo
        .list_authors(&range)
        .context("Failed to list authors")?;

    if authors.is_empty() {
        println!("No team members found in this time period.");
        return Ok(());
    }

    println!(
        "{} ({})\n",
        style("Team Report").bold(),
        range.label()
    );
    println!("Team members ({}):", authors.len());

    let mut all_commits: Vec<CommitRecord> = Vec::new();
    let mut commits_by_author: Vec<(String, Vec<CommitRecord>)> = Vec::new();

    for author in &authors {
        let commits = repo
            .list_commits(&range, Some(author), false)
            .context("Failed to collect commits")?;
        if !commits.is_empty() {
            println!("  {}: {} commits", author, commits.len());
            all_commits.extend(commits.iter().cloned());
            commits_by_author.push((author.clone(), commits));
        }
    }
    println!();

    if all_commits.is_empty() {
        println!("No commits found for any team member.");
        return Ok(());
    }

    for (author, commits) in &commits_by_author {
        print_commits_table(commits, Some(author));
    }

    if summarize {
        let summarizer = GroqSummarizer::from_env()?;
        // Weekly team reports get the component breakdown.
        print_summary(&summarizer, &all_commits, kind, kind == ReportKind::Weekly)?;
    }
    Ok(())
}

pub fn exec_authors(common: &CommonArgs, range: DateRange) -> anyhow::Result<()> {
    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let authors = repo
        .list_authors(&range)
        .context("Failed to list authors")?;

    if authors.is_empty() {
        println!("No authors found for {}.", range.label());
        return Ok(());
    }

    println!("{} ({})", style("Authors").bold(), range.label());
    for author in &authors {
        println!("  {author}");
    }
    Ok(())
}

pub fn exec_multirepo(
    common: &CommonArgs,
    range: DateRange,
    workspace: Option<PathBuf>,
    repos: Option<String>,
) -> anyhow::Result<()> {
    let paths: Vec<PathBuf> = if let Some(list) = repos {
        list.split(',').map(|p| PathBuf::from(p.trim())).collect()
    } else if let Some(workspace) = workspace {
        let found = discover_repos(&workspace).context("Failed to scan workspace")?;
        if found.is_empty() {
            bail!("no repositories found in {}", workspace.display());
        }
        println!("Found {} repositories in {}:", found.len(), workspace.display());
        for path in &found {
            println!("  {}", path.display());
        }
        println!();
        found
    } else {
        bail!("specify --workspace or --repos");
    };

    let tagged = scan_repos(&paths, &range, common.author.as_deref(), false)
        .context("Failed to scan repositories")?;

    if tagged.is_empty() {
        println!("No commits found across all repositories.");
        return Ok(());
    }

    println!(
        "{} ({}): {} commits\n",
        style("Multi-Repository Report").bold(),
        range.label(),
        tagged.len()
    );

    // Already ordered by repository; render one section per repo.
    let mut current: Option<&str> = None;
    let mut section: Vec<CommitRecord> = Vec::new();
    for (name, commit) in &tagged {
        if current != Some(name.as_str()) {
            if let Some(repo_name) = current {
                print_commits_table(&section, Some(repo_name));
                section.clear();
            }
            current = Some(name.as_str());
        }
        section.push(commit.clone());
    }
    if let Some(repo_name) = current {
        print_commits_table(&section, Some(repo_name));
    }
    Ok(())
}

fn print_report(commits: &[CommitRecord], title: &str, group: bool) {
    println!("{}\n", style(title).bold());
    if group {
        let groups = group_by_component(commits);
        for (component, bucket) in groups.iter() {
            println!("{} ({} commits)", style(component.as_str()).bold(), bucket.len());
            if !bucket.is_empty() {
                print_commits_table(bucket, None);
            }
        }
    } else {
        print_commits_table(commits, None);
    }
}

fn print_summary(
    summarizer: &dyn Summarize,
    commits: &[CommitRecord],
    kind: ReportKind,
    group: bool,
) -> anyhow::Result<()> {
    let messages: Vec<String> = commits.iter().map(|c| c.subject.clone()).collect();
    let groups = group.then(|| {
        group_by_component(commits)
            .into_named()
            .into_iter()
            .map(|(name, bucket)| (name, bucket.into_iter().map(|c| c.subject).collect()))
            .collect()
    });

    let request = SummaryRequest {
        commits: messages,
        kind,
        groups,
    };
    let summary = summarizer.summarize(&request)?;
    println!("\n{}\n", style("AI Summary").bold());
    println!("{summary}");
    Ok(())
}

pub fn print_commits_table(commits: &[CommitRecord], title: Option<&str>) {
    if commits.is_empty() {
        return;
    }

    if let Some(title) = title {
        println!("{}", style(title).bold());
    }

    let author_width = commits
        .iter()
        .map(|c| c.author.chars().count())
        .max()
        .unwrap_or(6)
        .max(6);

    println!(
        "{:<7} {:<width$} {:<16} {:<50}",
        style("Hash").bold(),
        style("Author").bold(),
        style("Date").bold(),
        style("Message").bold(),
        width = author_width
    );
    println!("{}", "─".repeat(7 + 1 + author_width + 1 + 16 + 1 + MESSAGE_WIDTH));
    for c in commits {
        println!(
            "{:<7} {:<width$} {:<16} {:<50}",
            c.hash,
            c.author,
            c.date_str(),
            truncate(&c.subject, MESSAGE_WIDTH),
            width = author_width
        );
    }
    println!();
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max - 3).collect();
        format!("{cut}...")
    }
}

pub fn write_output(content: &str, output: Option<&std::path::Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Report exported to {}", path.display());
        }
        None => println!("{content}"),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_leaves_short_messages_alone() {
        assert_eq!(truncate("short", 50), "short");
    }

    #[test]
    fn truncate_cuts_long_messages_with_ellipsis() {
        let long = "x".repeat(60);
        let cut = truncate(&long, 50);
        assert_eq!(cut.chars().count(), 50);
        assert!(cut.ends_with("..."));
    }
}
