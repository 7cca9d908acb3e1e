use crate::error::{ReportError, Result};
use crate::model::DateRange;
use crate::report::{self, ReportOptions};
use crate::summarize::ReportKind;
use crate::{dates, stats, tickets};
use anyhow::Result as AnyResult;
use chrono::{Datelike, Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "greport")]
#[command(about = "Git commit reports: date-scoped summaries, statistics, ticket grouping, and exports")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        short,
        help = "Filter by author ('me' for the configured git user, 'all' for a team report)"
    )]
    pub author: Option<String>,
}

#[derive(Args, Clone)]
pub struct ReportArgs {
    #[arg(long, short, help = "Summarize commits with the configured AI service")]
    pub summarize: bool,

    #[arg(long, short, help = "Group commits by component (Console/Server/Others)")]
    pub group: bool,

    #[arg(long, short, help = "Show a team report covering every author")]
    pub team: bool,

    #[arg(long, short, help = "Export format: json, markdown, html, email")]
    pub export: Option<String>,

    #[arg(long, short, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,
}

impl From<ReportArgs> for ReportOptions {
    fn from(args: ReportArgs) -> Self {
        ReportOptions {
            summarize: args.summarize,
            group: args.group,
            team: args.team,
            export: args.export,
            output: args.output,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Commits from today
    Daily {
        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Commits from yesterday
    Yesterday {
        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Commits from this ISO week (Monday through Sunday)
    Weekly {
        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Commits from the previous ISO week
    Lastweek {
        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Commits in a custom date range
    Range {
        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        from: String,

        #[arg(long, help = "End date (YYYY-MM-DD)")]
        to: String,

        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Commits from the last N days (including today)
    Days {
        #[arg(help = "Number of days")]
        n: i64,

        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Commits in a calendar month
    Month {
        #[arg(help = "Month number (1-12)")]
        month: u32,

        #[arg(long, help = "Year (defaults to the current year)")]
        year: Option<i32>,

        #[clap(flatten)]
        report: ReportArgs,
    },
    /// Per-author commit statistics
    Stats {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long, help = "End date (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long, short, default_value_t = 7, help = "Last N days (when no range given)")]
        days: i64,
    },
    /// Commits grouped by ticket/issue identifiers
    Tickets {
        #[arg(long, help = "Start date (YYYY-MM-DD)")]
        from: Option<String>,

        #[arg(long, help = "End date (YYYY-MM-DD)")]
        to: Option<String>,

        #[arg(long, short, default_value_t = 7, help = "Last N days (when no range given)")]
        days: i64,

        #[arg(long, short, help = "Custom ticket regex patterns (comma-separated, replace the defaults)")]
        patterns: Option<String>,
    },
    /// Distinct commit authors in range
    Authors {
        #[arg(long, short, default_value_t = 30, help = "Last N days")]
        days: i64,
    },
    /// Report across multiple repositories
    Multirepo {
        #[arg(long, short, help = "Workspace directory to scan for repositories")]
        workspace: Option<PathBuf>,

        #[arg(long, short, help = "Comma-separated list of repository paths")]
        repos: Option<String>,

        #[arg(long, short, default_value_t = 7, help = "Last N days")]
        days: i64,
    },
}

fn resolve_range(
    now: NaiveDate,
    days: i64,
    from: Option<&str>,
    to: Option<&str>,
) -> Result<DateRange> {
    match (from, to) {
        (Some(from), Some(to)) => dates::custom_range(from, to),
        (None, None) => dates::last_n_days(now, days),
        _ => Err(ReportError::InvalidArgument(
            "--from and --to must be used together".to_string(),
        )),
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> AnyResult<()> {
        let now = Local::now().date_naive();
        match self.command {
            Commands::Daily { report } => report::exec_period(
                &self.common,
                dates::today(now),
                "Today's Commits",
                ReportKind::Daily,
                &report.into(),
            ),
            Commands::Yesterday { report } => report::exec_period(
                &self.common,
                dates::yesterday(now),
                "Yesterday's Commits",
                ReportKind::Daily,
                &report.into(),
            ),
            Commands::Weekly { report } => report::exec_period(
                &self.common,
                dates::this_week(now),
                "This Week's Commits",
                ReportKind::Weekly,
                &report.into(),
            ),
            Commands::Lastweek { report } => report::exec_period(
                &self.common,
                dates::last_week(now),
                "Last Week's Commits",
                ReportKind::Weekly,
                &report.into(),
            ),
            Commands::Range { from, to, report } => {
                let range = dates::custom_range(&from, &to)?;
                report::exec_period(
                    &self.common,
                    range,
                    "Commit Report",
                    ReportKind::Weekly,
                    &report.into(),
                )
            }
            Commands::Days { n, report } => {
                let range = dates::last_n_days(now, n)?;
                let kind = if n == 1 { ReportKind::Daily } else { ReportKind::Weekly };
                report::exec_period(&self.common, range, "Commit Report", kind, &report.into())
            }
            Commands::Month { month, year, report } => {
                let range = dates::month_range(year.unwrap_or_else(|| now.year()), month)?;
                report::exec_period(
                    &self.common,
                    range,
                    "Monthly Commits",
                    ReportKind::Weekly,
                    &report.into(),
                )
            }
            Commands::Stats { json, from, to, days } => {
                let range = resolve_range(now, days, from.as_deref(), to.as_deref())?;
                stats::exec(&self.common, range, json)
            }
            Commands::Tickets { from, to, days, patterns } => {
                let range = resolve_range(now, days, from.as_deref(), to.as_deref())?;
                tickets::exec(&self.common, range, patterns.as_deref())
            }
            Commands::Authors { days } => {
                let range = dates::last_n_days(now, days)?;
                report::exec_authors(&self.common, range)
            }
            Commands::Multirepo { workspace, repos, days } => {
                let range = dates::last_n_days(now, days)?;
                report::exec_multirepo(&self.common, range, workspace, repos)
            }
        }
    }
}
