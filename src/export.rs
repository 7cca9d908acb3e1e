//! Report serialization into the fixed set of output formats.
//!
//! Every renderer is a pure function of its inputs; the generation timestamp
//! is injected by the caller so everything else is byte-stable and testable
//! for exact equality. Field names, column order, and structural class names
//! are a compatibility surface for downstream consumers.

use crate::error::{ReportError, Result};
use crate::model::{CommitRecord, ReportMetadata};
use chrono::{DateTime, Utc};
use serde_json::{json, Map, Value};
use std::fmt::Write;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Markdown,
    Html,
    Email,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Markdown => "markdown",
            ExportFormat::Html => "html",
            ExportFormat::Email => "email",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = ReportError;

    /// Unknown formats are an error, never a silent fallback.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "json" => Ok(ExportFormat::Json),
            "markdown" => Ok(ExportFormat::Markdown),
            "html" => Ok(ExportFormat::Html),
            "email" => Ok(ExportFormat::Email),
            other => Err(ReportError::UnsupportedFormat(other.to_string())),
        }
    }
}

pub type NamedGroups = [(String, Vec<CommitRecord>)];

/// Serialize a report. `grouped`, when present, replaces the flat commit
/// list with one section per group, rendered in input order with empty
/// groups retained.
pub fn export(
    commits: &[CommitRecord],
    format: ExportFormat,
    metadata: &ReportMetadata,
    grouped: Option<&NamedGroups>,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    match format {
        ExportFormat::Json => to_json(commits, metadata, grouped, exported_at),
        ExportFormat::Markdown => Ok(to_markdown(commits, metadata, grouped, exported_at)),
        ExportFormat::Html => Ok(to_html(commits, metadata, grouped, exported_at)),
        ExportFormat::Email => Ok(to_email(commits, metadata, grouped, exported_at)),
    }
}

fn commit_value(c: &CommitRecord) -> Value {
    json!({
        "hash": c.hash,
        "author": c.author,
        "date": c.date_str(),
        "message": c.subject,
    })
}

fn to_json(
    commits: &[CommitRecord],
    metadata: &ReportMetadata,
    grouped: Option<&NamedGroups>,
    exported_at: DateTime<Utc>,
) -> Result<String> {
    let mut root = Map::new();
    root.insert("metadata".to_string(), serde_json::to_value(metadata)?);

    if let Some(groups) = grouped {
        let mut group_map = Map::new();
        for (name, group_commits) in groups {
            group_map.insert(
                name.clone(),
                Value::Array(group_commits.iter().map(commit_value).collect()),
            );
        }
        root.insert("groups".to_string(), Value::Object(group_map));
    } else {
        root.insert(
            "commits".to_string(),
            Value::Array(commits.iter().map(commit_value).collect()),
        );
    }

    root.insert("total_commits".to_string(), json!(commits.len()));
    root.insert("exported_at".to_string(), json!(exported_at.to_rfc3339()));
    Ok(serde_json::to_string_pretty(&Value::Object(root))?)
}

fn push_markdown_table(out: &mut String, commits: &[CommitRecord]) {
    out.push_str("| Hash | Author | Date | Message |\n");
    out.push_str("|------|--------|------|---------|\n");
    for c in commits {
        let _ = writeln!(out, "| `{}` | {} | {} | {} |", c.hash, c.author, c.date_str(), c.subject);
    }
}

fn to_markdown(
    commits: &[CommitRecord],
    metadata: &ReportMetadata,
    grouped: Option<&NamedGroups>,
    exported_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", metadata.title);
    let _ = writeln!(out, "**Period:** {}\n", metadata.date_range);
    if let Some(author) = &metadata.author {
        let _ = writeln!(out, "**Author:** {author}\n");
    }
    if let Some(members) = &metadata.team_members {
        let _ = writeln!(out, "**Team Members:** {}\n", members.join(", "));
    }
    let _ = writeln!(out, "**Total Commits:** {}\n", commits.len());
    let _ = writeln!(out, "**Generated:** {}\n", exported_at.format("%Y-%m-%d %H:%M"));
    out.push_str("---\n\n");

    if let Some(groups) = grouped {
        for (name, group_commits) in groups {
            let _ = writeln!(out, "## {} ({} commits)\n", name, group_commits.len());
            push_markdown_table(&mut out, group_commits);
            out.push('\n');
        }
    } else {
        out.push_str("## Commits\n\n");
        push_markdown_table(&mut out, commits);
    }
    out
}

const HTML_STYLE: &str = "\
        body { font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Arial, sans-serif; max-width: 1200px; margin: 40px auto; padding: 0 20px; }
        h1 { color: #333; border-bottom: 3px solid #007bff; padding-bottom: 10px; }
        h2 { color: #555; margin-top: 30px; border-bottom: 2px solid #ddd; padding-bottom: 8px; }
        .metadata { background: #f8f9fa; padding: 15px; border-radius: 5px; margin: 20px 0; }
        .metadata p { margin: 5px 0; }
        table { width: 100%; border-collapse: collapse; margin: 20px 0; }
        th { background: #007bff; color: white; padding: 12px; text-align: left; }
        td { padding: 10px; border-bottom: 1px solid #ddd; }
        tr:hover { background: #f8f9fa; }
        .hash { font-family: 'Courier New', monospace; background: #e9ecef; padding: 2px 6px; border-radius: 3px; }
        .footer { margin-top: 40px; padding-top: 20px; border-top: 1px solid #ddd; color: #6c757d; text-align: center; }";

fn push_html_table(out: &mut String, commits: &[CommitRecord]) {
    out.push_str("    <table>\n");
    out.push_str("        <tr><th>Hash</th><th>Author</th><th>Date</th><th>Message</th></tr>\n");
    for c in commits {
        out.push_str("        <tr>\n");
        let _ = writeln!(out, "            <td><span class='hash'>{}</span></td>", c.hash);
        let _ = writeln!(out, "            <td>{}</td>", c.author);
        let _ = writeln!(out, "            <td>{}</td>", c.date_str());
        let _ = writeln!(out, "            <td>{}</td>", c.subject);
        out.push_str("        </tr>\n");
    }
    out.push_str("    </table>\n");
}

fn to_html(
    commits: &[CommitRecord],
    metadata: &ReportMetadata,
    grouped: Option<&NamedGroups>,
    exported_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head>\n    <meta charset='UTF-8'>\n");
    let _ = writeln!(out, "    <title>{}</title>", metadata.title);
    let _ = writeln!(out, "    <style>\n{HTML_STYLE}\n    </style>");
    out.push_str("</head>\n<body>\n");
    let _ = writeln!(out, "    <h1>{}</h1>", metadata.title);

    out.push_str("    <div class='metadata'>\n");
    let _ = writeln!(out, "        <p><strong>Period:</strong> {}</p>", metadata.date_range);
    if let Some(author) = &metadata.author {
        let _ = writeln!(out, "        <p><strong>Author:</strong> {author}</p>");
    }
    if let Some(members) = &metadata.team_members {
        let _ = writeln!(out, "        <p><strong>Team Members:</strong> {}</p>", members.join(", "));
    }
    let _ = writeln!(out, "        <p><strong>Total Commits:</strong> {}</p>", commits.len());
    let _ = writeln!(
        out,
        "        <p><strong>Generated:</strong> {}</p>",
        exported_at.format("%Y-%m-%d %H:%M")
    );
    out.push_str("    </div>\n");

    if let Some(groups) = grouped {
        for (name, group_commits) in groups {
            let _ = writeln!(out, "    <h2>{} ({} commits)</h2>", name, group_commits.len());
            push_html_table(&mut out, group_commits);
        }
    } else {
        out.push_str("    <h2>Commits</h2>\n");
        push_html_table(&mut out, commits);
    }

    out.push_str("    <div class='footer'>\n");
    let _ = writeln!(
        out,
        "        <p>Generated by greport on {}</p>",
        exported_at.format("%Y-%m-%d %H:%M")
    );
    out.push_str("    </div>\n</body>\n</html>\n");
    out
}

fn push_email_list(out: &mut String, commits: &[CommitRecord]) {
    out.push_str("    <ul style='list-style-type: none; padding-left: 0;'>\n");
    for c in commits {
        out.push_str(
            "        <li style='margin: 10px 0; padding: 10px; background: #f9f9f9; border-left: 3px solid #007bff;'>\n",
        );
        let _ = writeln!(out, "            <strong>{}</strong><br>", c.subject);
        let _ = writeln!(
            out,
            "            <small style='color: #666;'>{} | {} | <code>{}</code></small>",
            c.author,
            c.date_str(),
            c.hash
        );
        out.push_str("        </li>\n");
    }
    out.push_str("    </ul>\n");
}

/// Email variant: same logical structure as `html` but every style is an
/// inline attribute, because many mail renderers strip head-level CSS.
fn to_email(
    commits: &[CommitRecord],
    metadata: &ReportMetadata,
    grouped: Option<&NamedGroups>,
    exported_at: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html>\n<head><meta charset='UTF-8'></head>\n");
    out.push_str("<body style='font-family: Arial, sans-serif; color: #333; line-height: 1.6;'>\n");
    let _ = writeln!(
        out,
        "    <h2 style='color: #007bff; border-bottom: 2px solid #007bff; padding-bottom: 10px;'>{}</h2>",
        metadata.title
    );

    out.push_str(
        "    <div style='background: #f0f0f0; padding: 15px; border-radius: 5px; margin: 15px 0;'>\n",
    );
    let _ = writeln!(
        out,
        "        <p style='margin: 5px 0;'><strong>Period:</strong> {}</p>",
        metadata.date_range
    );
    if let Some(author) = &metadata.author {
        let _ = writeln!(
            out,
            "        <p style='margin: 5px 0;'><strong>Author:</strong> {author}</p>"
        );
    }
    if let Some(members) = &metadata.team_members {
        let _ = writeln!(
            out,
            "        <p style='margin: 5px 0;'><strong>Team Members:</strong> {}</p>",
            members.join(", ")
        );
    }
    let _ = writeln!(
        out,
        "        <p style='margin: 5px 0;'><strong>Total Commits:</strong> {}</p>",
        commits.len()
    );
    out.push_str("    </div>\n");

    if let Some(groups) = grouped {
        for (name, group_commits) in groups {
            let _ = writeln!(
                out,
                "    <h3 style='color: #555; margin-top: 25px;'>{} ({} commits)</h3>",
                name,
                group_commits.len()
            );
            push_email_list(&mut out, group_commits);
        }
    } else {
        push_email_list(&mut out, commits);
    }

    out.push_str("    <hr style='margin-top: 30px; border: none; border-top: 1px solid #ddd;'>\n");
    let _ = writeln!(
        out,
        "    <p style='color: #999; text-align: center;'><small>Generated by greport on {}</small></p>",
        exported_at.format("%Y-%m-%d %H:%M")
    );
    out.push_str("</body>\n</html>\n");
    out
}
