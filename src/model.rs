use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One commit as it appears in reports. `stats` is only populated when the
/// caller asked for diff statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRecord {
    pub hash: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<DiffStats>,
}

impl CommitRecord {
    /// Timestamp rendered the way every output format shows it.
    pub fn date_str(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M").to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffStats {
    pub files: BTreeSet<String>,
    pub insertions: u32,
    pub deletions: u32,
}

/// Inclusive date window at day granularity: `start` is 00:00:00 of the
/// first day, `end` is 23:59:59 of the last day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
        Self {
            start: DateTime::from_naive_utc_and_offset(first.and_time(NaiveTime::MIN), Utc),
            end: DateTime::from_naive_utc_and_offset(last.and_time(end_of_day), Utc),
        }
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        timestamp >= &self.start && timestamp <= &self.end
    }

    pub fn label(&self) -> String {
        format!(
            "{} to {}",
            self.start.format("%Y-%m-%d"),
            self.end.format("%Y-%m-%d")
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorStats {
    pub author: String,
    pub total_commits: usize,
    pub files_changed: usize,
    pub insertions: u64,
    pub deletions: u64,
    pub net_lines: i64,
}

/// Repository-wide totals plus the per-author breakdown, ordered by commit
/// count descending with ties broken by author name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepoStats {
    pub total_commits: usize,
    pub total_authors: usize,
    pub total_files_changed: usize,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub net_lines: i64,
    pub author_stats: Vec<AuthorStats>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatsOutput {
    pub generated_at: DateTime<Utc>,
    pub repository: String,
    pub since: String,
    pub until: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub stats: RepoStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    Console,
    Server,
    Others,
}

impl Component {
    /// Fixed bucket order used everywhere a grouped report is rendered.
    pub const ORDER: [Component; 3] = [Component::Console, Component::Server, Component::Others];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Console => "Console",
            Component::Server => "Server",
            Component::Others => "Others",
        }
    }
}

impl std::fmt::Display for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exhaustive partition of a commit list by component. Empty buckets are
/// kept so rendering can show zero-count sections.
#[derive(Debug, Clone, Default)]
pub struct ComponentGroups {
    pub console: Vec<CommitRecord>,
    pub server: Vec<CommitRecord>,
    pub others: Vec<CommitRecord>,
}

impl ComponentGroups {
    pub fn bucket_mut(&mut self, component: Component) -> &mut Vec<CommitRecord> {
        match component {
            Component::Console => &mut self.console,
            Component::Server => &mut self.server,
            Component::Others => &mut self.others,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Component, &[CommitRecord])> + '_ {
        Component::ORDER.into_iter().map(move |c| {
            let bucket = match c {
                Component::Console => &self.console,
                Component::Server => &self.server,
                Component::Others => &self.others,
            };
            (c, bucket.as_slice())
        })
    }

    pub fn total(&self) -> usize {
        self.console.len() + self.server.len() + self.others.len()
    }

    /// Named groups in the fixed Console/Server/Others order, the shape the
    /// exporter and the summarizer consume.
    pub fn into_named(self) -> Vec<(String, Vec<CommitRecord>)> {
        vec![
            (Component::Console.as_str().to_string(), self.console),
            (Component::Server.as_str().to_string(), self.server),
            (Component::Others.as_str().to_string(), self.others),
        ]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketGroup {
    pub ticket_id: String,
    pub commits: Vec<CommitRecord>,
}

/// Report header fields shared by every export format. Optional fields are
/// omitted rather than rendered empty.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub title: String,
    pub date_range: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub team_members: Option<Vec<String>>,
}

impl ReportMetadata {
    pub fn new(title: impl Into<String>, range: &DateRange, author: Option<&str>) -> Self {
        Self {
            title: title.into(),
            date_range: range.label(),
            author: Some(author.unwrap_or("All authors").to_string()),
            team_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn date_range_bounds_are_inclusive() {
        let range = DateRange::days(
            NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 11).unwrap(),
        );
        assert!(range.contains(&Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap()));
        assert!(range.contains(&Utc.with_ymd_and_hms(2025, 3, 11, 23, 59, 59).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2025, 3, 12, 0, 0, 0).unwrap()));
        assert!(!range.contains(&Utc.with_ymd_and_hms(2025, 3, 9, 23, 59, 59).unwrap()));
    }

    #[test]
    fn commit_date_renders_with_minute_precision() {
        let record = CommitRecord {
            hash: "abc1234".to_string(),
            author: "Ana".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 14, 30, 59).unwrap(),
            subject: "Fix parser".to_string(),
            stats: None,
        };
        assert_eq!(record.date_str(), "2025-06-01 14:30");
    }

    #[test]
    fn component_groups_keep_fixed_order() {
        let groups = ComponentGroups::default();
        let order: Vec<Component> = groups.iter().map(|(c, _)| c).collect();
        assert_eq!(order, Component::ORDER.to_vec());
    }
}
