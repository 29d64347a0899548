//! Extraction of structured fields from the free-text model reply.
//!
//! The model is prompted to answer in four sections, in order:
//! `Bugs Found:`, `Suggestions:`, `Code Quality Score:`, `Explanation:`.
//! Each field is pulled out independently by an anchored, case-insensitive
//! search over the whole reply; a missing or unparsable section falls back
//! to its default instead of erroring. The leniency is deliberate — the
//! reply has no schema and the sections may be reordered or dropped by the
//! model.

use once_cell::sync::Lazy;
use regex::Regex;

pub const DEFAULT_QUALITY_SCORE: i64 = 5;

static BUGS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)Bugs Found:(.*?)(?:Suggestions:|Code Quality Score:|$)").unwrap());
static SUGGESTIONS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)Suggestions:(.*?)(?:Code Quality Score:|$)").unwrap());
static SCORE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)Code Quality Score:\D*(\d+)").unwrap());
static EXPLANATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)Explanation:(.*)").unwrap());

const MARKERS: [&str; 4] = [
    "bugs found:",
    "suggestions:",
    "code quality score:",
    "explanation:",
];

/// Fields parsed out of one text-generation reply.
///
/// `suggestions` is extracted but not surfaced in any output record; it is
/// kept as-is rather than dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub bugs: Vec<String>,
    pub suggestions: Vec<String>,
    /// Nominally 1–10 but not range-checked; out-of-range values pass
    /// through unchanged.
    pub quality_score: i64,
    pub explanation: String,
}

impl Default for Extraction {
    fn default() -> Self {
        Self {
            bugs: Vec::new(),
            suggestions: Vec::new(),
            quality_score: DEFAULT_QUALITY_SCORE,
            explanation: String::new(),
        }
    }
}

impl Extraction {
    /// Fixed low-confidence result substituted when the text-generation
    /// service cannot be reached.
    pub fn service_unavailable(reason: &str) -> Self {
        Self {
            bugs: vec![format!("Ollama service unavailable: {reason}")],
            ..Self::default()
        }
    }

    /// Single-synthetic-bug result for a reply that could not be processed.
    pub fn parse_failure(reason: &str) -> Self {
        Self {
            bugs: vec![format!("Failed to parse AI analysis response: {reason}")],
            ..Self::default()
        }
    }
}

/// Split one marker-delimited segment into one extraction field apiece.
pub fn extract(response: &str) -> Extraction {
    let bugs = BUGS_RE
        .captures(response)
        .map(|c| clean_lines(&c[1]))
        .unwrap_or_default();

    let suggestions = SUGGESTIONS_RE
        .captures(response)
        .map(|c| clean_lines(&c[1]))
        .unwrap_or_default();

    let quality_score = SCORE_RE
        .captures(response)
        .and_then(|c| c[1].parse::<i64>().ok())
        .unwrap_or(DEFAULT_QUALITY_SCORE);

    let explanation = EXPLANATION_RE
        .captures(response)
        .map(|c| c[1].trim().to_string())
        .unwrap_or_default();

    Extraction {
        bugs,
        suggestions,
        quality_score,
        explanation,
    }
}

/// Strip list bullets and whitespace; drop empty lines and stray marker
/// lines the model sometimes repeats inside a section.
fn clean_lines(segment: &str) -> Vec<String> {
    segment
        .lines()
        .map(|line| {
            line.trim_start_matches(|c: char| c == '-' || c == '*' || c.is_whitespace())
                .trim()
        })
        .filter(|line| !line.is_empty())
        .filter(|line| {
            let lower = line.to_lowercase();
            !MARKERS.iter().any(|m| lower == *m)
        })
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const WELL_FORMED: &str = "Here is my review.\n\
        Bugs Found:\n\
        - Unescaped HTML interpolation\n\
        * Missing null check\n\
        Suggestions:\n\
        - Escape user input\n\
        Code Quality Score: 4\n\
        Explanation: The rendering path trusts user data.";

    #[test]
    fn well_formed_reply() {
        let got = extract(WELL_FORMED);
        assert_eq!(
            got.bugs,
            vec!["Unescaped HTML interpolation", "Missing null check"]
        );
        assert_eq!(got.suggestions, vec!["Escape user input"]);
        assert_eq!(got.quality_score, 4);
        assert_eq!(got.explanation, "The rendering path trusts user data.");
    }

    #[test]
    fn markers_are_case_insensitive() {
        let got = extract("BUGS FOUND:\n- a\nSUGGESTIONS:\n- b\ncode quality score: 7\nEXPLANATION: ok");
        assert_eq!(got.bugs, vec!["a"]);
        assert_eq!(got.suggestions, vec!["b"]);
        assert_eq!(got.quality_score, 7);
        assert_eq!(got.explanation, "ok");
    }

    #[test]
    fn missing_suggestions_extends_bugs_to_end() {
        let got = extract("Bugs Found:\n- one\n- two");
        assert_eq!(got.bugs, vec!["one", "two"]);
        assert!(got.suggestions.is_empty());
        assert_eq!(got.quality_score, DEFAULT_QUALITY_SCORE);
    }

    #[test]
    fn bugs_section_stops_at_score_when_suggestions_missing() {
        let got = extract("Bugs Found:\n- one\nCode Quality Score: 8\nExplanation: fine");
        assert_eq!(got.bugs, vec!["one"]);
        assert_eq!(got.quality_score, 8);
        assert_eq!(got.explanation, "fine");
    }

    #[test]
    fn score_takes_first_digit_run() {
        let got = extract("Code Quality Score: around 8 out of 10");
        assert_eq!(got.quality_score, 8);
    }

    #[test]
    fn score_out_of_range_passes_through() {
        assert_eq!(extract("Code Quality Score: 42").quality_score, 42);
        assert_eq!(extract("Code Quality Score: 0").quality_score, 0);
    }

    #[test]
    fn score_defaults_when_missing_or_not_numeric() {
        assert_eq!(extract("no markers at all").quality_score, DEFAULT_QUALITY_SCORE);
        assert_eq!(
            extract("Code Quality Score: excellent").quality_score,
            DEFAULT_QUALITY_SCORE
        );
    }

    #[test]
    fn explanation_takes_everything_after_marker() {
        let got = extract("Explanation:  spans\nmultiple lines  ");
        assert_eq!(got.explanation, "spans\nmultiple lines");
    }

    #[test]
    fn empty_input_yields_defaults() {
        assert_eq!(extract(""), Extraction::default());
    }

    #[test]
    fn marker_lines_inside_sections_are_dropped() {
        let got = extract("Bugs Found:\nBugs Found:\n- real bug\nSuggestions:");
        assert_eq!(got.bugs, vec!["real bug"]);
    }

    #[test]
    fn synthetic_results_carry_one_bug_and_default_score() {
        let sick = Extraction::service_unavailable("connection refused");
        assert_eq!(sick.bugs.len(), 1);
        assert!(sick.bugs[0].starts_with("Ollama service unavailable"));
        assert_eq!(sick.quality_score, DEFAULT_QUALITY_SCORE);
        assert!(sick.explanation.is_empty());

        let bad = Extraction::parse_failure("unexpected payload");
        assert_eq!(bad.bugs.len(), 1);
        assert_eq!(bad.quality_score, DEFAULT_QUALITY_SCORE);
    }
}
