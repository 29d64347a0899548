//! Mocked AI bug analysis.
//!
//! Per analyze request: for each uploaded file descriptor, fabricate a code
//! sample, send it to the text-generation collaborator once, extract a bug
//! list from the free-text reply, and emit one BugReport per bug. Files are
//! processed strictly sequentially; the call for file N (including its
//! timeout) finishes before file N+1 starts. A failed generate call is
//! downgraded to a low-confidence result, never surfaced.

pub mod assignee;
pub mod extractor;
pub mod mock_source;
pub mod ollama;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use extractor::Extraction;
use ollama::TextGenerator;

/// Severity threshold: a quality score below this makes extracted bugs High.
const HIGH_SEVERITY_BELOW: i64 = 6;

/// Hardcoded placeholder line for AI-detected bugs. The mock source has no
/// real line mapping.
const AI_DETECTED_LINE: i64 = 7;

// ─── Wire types ───────────────────────────────────────────────────────────────

/// One uploaded file, as described by the browser. Only `name` is consulted.
#[derive(Debug, Clone, Deserialize)]
pub struct FileDescriptor {
    pub name: String,
    #[serde(default)]
    pub size: i64,
    #[serde(default, rename = "type")]
    pub content_type: String,
    #[serde(default)]
    pub path: String,
}

/// One detected or summarized issue. Built fresh per request, never
/// persisted, never mutated after creation.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BugReport {
    /// Sequence number starting at 1, shared across the whole batch.
    pub id: u32,
    pub file: String,
    pub line: i64,
    #[serde(rename = "type")]
    pub bug_type: String,
    pub severity: String,
    pub description: String,
    #[serde(rename = "assignedTo", skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

// ─── Orchestration ────────────────────────────────────────────────────────────

/// Analyze a batch of file descriptors in input order.
///
/// The `developers` list from the request is accepted by the endpoint but
/// not consulted here. Returns the concatenation, in file-then-bug order, of
/// all emitted reports. Only errors outside the generate/extract path (none
/// in the current flow) abort the batch.
pub async fn analyze_files(
    generator: &dyn TextGenerator,
    model: &str,
    files: &[FileDescriptor],
) -> Result<Vec<BugReport>> {
    let mut reports = Vec::new();
    let mut next_id: u32 = 1;

    for file in files {
        let source = mock_source::generate(&file.name);
        let prompt = build_prompt(&file.name, source);

        let extraction = match generator.generate(model, &prompt).await {
            Ok(reply) => extractor::extract(&reply),
            Err(e) => {
                warn!(file = %file.name, "text generation failed: {e}");
                Extraction::service_unavailable(&e.to_string())
            }
        };

        // No author metadata travels with the upload, so no hint.
        let assigned = assignee::select(None);

        if extraction.bugs.is_empty() {
            reports.push(BugReport {
                id: next_id,
                file: file.name.clone(),
                line: 0,
                bug_type: "Code Review".to_string(),
                severity: "Low".to_string(),
                description: format!(
                    "Code review completed. Quality score: {}/10. {}",
                    extraction.quality_score, extraction.explanation
                ),
                assigned_to: Some(assigned),
            });
            next_id += 1;
            continue;
        }

        let severity = if extraction.quality_score < HIGH_SEVERITY_BELOW {
            "High"
        } else {
            "Medium"
        };
        for bug in &extraction.bugs {
            reports.push(BugReport {
                id: next_id,
                file: file.name.clone(),
                line: AI_DETECTED_LINE,
                bug_type: "AI Detected".to_string(),
                severity: severity.to_string(),
                description: bug.clone(),
                assigned_to: Some(assigned.clone()),
            });
            next_id += 1;
        }
    }

    info!(files = files.len(), reports = reports.len(), "analysis batch complete");
    Ok(reports)
}

fn build_prompt(file_name: &str, source: &str) -> String {
    format!(
        "You are a senior code reviewer. Analyze the following code from the file \
         `{file_name}` and report every bug you find.\n\n\
         ```\n{source}\n```\n\n\
         Respond in exactly this format:\n\
         Bugs Found:\n\
         - <one bug per line>\n\
         Suggestions:\n\
         - <one suggestion per line>\n\
         Code Quality Score: <integer 1-10>\n\
         Explanation: <short summary>"
    )
}
