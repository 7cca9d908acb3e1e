//! Keyword-based component classification of commit subjects.
//!
//! The keyword sets are plain data so they stay inspectable and testable.
//! Console is checked before Server: a message matching both classifies as
//! Console. That tie-break is a documented contract, not an accident.

use crate::model::{CommitRecord, Component, ComponentGroups};

const CONSOLE_KEYWORDS: &[&str] = &[
    "console", "ui-block", "ui block", "frontend", "react", "detail", "icon", "style", "css",
    "component", "button", "modal", "dialog", "form", "layout", "page", "view", "screen", "ui",
    "ux",
];

const SERVER_KEYWORDS: &[&str] = &[
    "server", "nest-core", "nestcore", "backend", "api", "endpoint", "controller", "service",
    "repository", "database", "db", "query", "migration",
];

/// Classify a commit message into exactly one component by case-insensitive
/// keyword membership.
pub fn categorize(message: &str) -> Component {
    let lower = message.to_lowercase();
    if CONSOLE_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Component::Console;
    }
    if SERVER_KEYWORDS.iter().any(|k| lower.contains(k)) {
        return Component::Server;
    }
    Component::Others
}

/// Partition commits into Console/Server/Others buckets. Every commit lands
/// in exactly one bucket; empty buckets are retained for rendering.
pub fn group_by_component(commits: &[CommitRecord]) -> ComponentGroups {
    let mut groups = ComponentGroups::default();
    for commit in commits {
        groups.bucket_mut(categorize(&commit.subject)).push(commit.clone());
    }
    groups
}
