//! Citation extraction
//!
//! Pulls `[Title](URL)` markdown links out of a finished report and
//! classifies each by source.

use crate::types::SourceType;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// A citation pulled from a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedCitation {
    pub title: String,
    pub url: String,
    pub source_type: SourceType,
}

static CITATION_PATTERN: OnceLock<Regex> = OnceLock::new();

fn citation_pattern() -> &'static Regex {
    CITATION_PATTERN
        .get_or_init(|| Regex::new(r"\[([^\]]+)\]\((https?://[^\)]+)\)").unwrap())
}

/// Extracts unique citations from a report. First occurrence of a URL wins.
///
/// URLs containing `arxiv` (case-insensitive) classify as Arxiv sources,
/// everything else as web. Only absolute http(s) links count; relative
/// links and bare URLs are ignored.
pub fn extract_citations(report: &str) -> Vec<ExtractedCitation> {
    let mut seen = HashSet::new();
    let mut citations = Vec::new();

    for capture in citation_pattern().captures_iter(report) {
        let title = capture[1].to_string();
        let url = capture[2].to_string();

        if !seen.insert(url.clone()) {
            continue;
        }

        let source_type = if url.to_lowercase().contains("arxiv") {
            SourceType::Arxiv
        } else {
            SourceType::Web
        };

        citations.push(ExtractedCitation {
            title,
            url,
            source_type,
        });
    }

    citations
}
