//! Narrative summary generation via an external language-model service.
//!
//! The pipeline only ever sees the [`Summarize`] capability; the production
//! implementation talks to the Groq OpenAI-compatible endpoint, tests use a
//! deterministic fake. One request, fixed timeout, no retries: a failure is
//! terminal for the invocation.

use crate::error::{ReportError, Result};
use log::debug;
use serde_json::{json, Value};
use std::fmt::Write;
use std::time::Duration;

const GROQ_ENDPOINT: &str = "https://api.groq.com/openai/v1/chat/completions";
const GROQ_MODEL: &str = "llama-3.3-70b-versatile";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const SYSTEM_PROMPT: &str = "You are a helpful assistant that summarizes git commit messages \
into concise, professional reports. Focus on key achievements, features, fixes, and improvements.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Daily,
    Weekly,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Daily => "daily",
            ReportKind::Weekly => "weekly",
        }
    }
}

/// Commit text to summarize, optionally pre-grouped under named buckets.
#[derive(Debug, Clone)]
pub struct SummaryRequest {
    pub commits: Vec<String>,
    pub kind: ReportKind,
    pub groups: Option<Vec<(String, Vec<String>)>>,
}

pub trait Summarize {
    fn summarize(&self, request: &SummaryRequest) -> Result<String>;
}

pub struct GroqSummarizer {
    api_key: String,
    client: reqwest::blocking::Client,
}

impl GroqSummarizer {
    /// Build a summarizer from the `GROQ_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY").map_err(|_| {
            ReportError::SummarizerConfig(
                "GROQ_API_KEY not set; export it or add it to your environment".to_string(),
            )
        })?;
        Self::new(api_key)
    }

    pub fn new(api_key: String) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ReportError::SummarizerTransport(e.to_string()))?;
        Ok(Self { api_key, client })
    }

    fn build_prompt(request: &SummaryRequest) -> String {
        let kind = request.kind.as_str();

        if let Some(groups) = &request.groups {
            let mut commits_text = String::new();
            for (name, group_commits) in groups {
                if group_commits.is_empty() {
                    continue;
                }
                let _ = writeln!(commits_text, "\n## {name}");
                for commit in group_commits {
                    let _ = writeln!(commits_text, "- {commit}");
                }
            }
            format!(
                "Please summarize the following {kind} git commits into a concise report.\n\n\
                 The commits are already grouped by component (Console, Server, Others).\n\n\
                 For each component:\n\
                 1. Summarize the main achievements and changes\n\
                 2. Group by categories (Features, Bug Fixes, Improvements, Refactoring, etc.) if there are many commits\n\
                 3. Keep it concise and professional\n\n\
                 Commits by Component:\n{commits_text}\n\n\
                 Please provide a clear, professional summary in markdown format, maintaining the Console/Server/Others structure."
            )
        } else {
            let mut commits_text = String::new();
            for commit in &request.commits {
                let _ = writeln!(commits_text, "- {commit}");
            }
            format!(
                "Please summarize the following {kind} git commits into a concise report.\n\n\
                 Organize the summary by categories (e.g., Features, Bug Fixes, Improvements, Refactoring, Documentation, etc.).\n\n\
                 Commits:\n{commits_text}\n\
                 Please provide a clear, professional summary in markdown format."
            )
        }
    }
}

impl Summarize for GroqSummarizer {
    fn summarize(&self, request: &SummaryRequest) -> Result<String> {
        if request.commits.is_empty() {
            return Ok("No commits to summarize.".to_string());
        }

        let prompt = Self::build_prompt(request);
        debug!("summarizing {} commits ({})", request.commits.len(), request.kind.as_str());

        let body = json!({
            "model": GROQ_MODEL,
            "messages": [
                { "role": "system", "content": SYSTEM_PROMPT },
                { "role": "user", "content": prompt },
            ],
            "temperature": 0.7,
            "max_tokens": 1500,
        });

        let response = self
            .client
            .post(GROQ_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| ReportError::SummarizerTransport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().unwrap_or_default();
            return Err(ReportError::SummarizerUpstream(format!(
                "service returned {status}: {detail}"
            )));
        }

        let payload: Value = response
            .json()
            .map_err(|e| ReportError::SummarizerUpstream(format!("malformed response: {e}")))?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .ok_or_else(|| {
                ReportError::SummarizerUpstream("response is missing summary content".to_string())
            })
    }
}
