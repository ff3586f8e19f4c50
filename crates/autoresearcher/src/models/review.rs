//! Reference lists and the final literature review document.

use serde::{Deserialize, Serialize};

/// Separator between the narrative and the numbered references.
pub const REFERENCES_HEADER: &str = "\n\nReferences:\n";

/// Marker appended to the rendered document so streaming callers can detect the end.
pub const RESULT_END_MARKER: &str = "resultEnd";

/// Narrative used when no paper yielded a finding.
pub const NO_FINDINGS_NARRATIVE: &str =
    "No research findings relevant to the research question were found in the reviewed papers.";

/// Ordered citations, in order of first appearance among the answers.
///
/// Identical citations from different answers are kept as separate entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceList(Vec<String>);

impl ReferenceList {
    /// Wrap an ordered list of citations.
    #[must_use]
    pub fn new(citations: Vec<String>) -> Self {
        Self(citations)
    }

    /// Citations in display order.
    #[must_use]
    pub fn citations(&self) -> &[String] {
        &self.0
    }

    /// Number of references.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if there are no references.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Render as `"1. first\n2. second"`; empty list renders as `""`.
    #[must_use]
    pub fn render(&self) -> String {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, citation)| format!("{}. {citation}", idx + 1))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The generated literature review.
///
/// Serializes as a structured envelope; [`LiteratureReview::render`] produces
/// the text document with the references section and end marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiteratureReview {
    /// The question the review answers.
    pub research_question: String,

    /// Synthesized narrative, exactly as returned by the completion service.
    pub narrative: String,

    /// Numbered references.
    pub references: ReferenceList,
}

impl LiteratureReview {
    /// Render the full text document.
    #[must_use]
    pub fn render(&self) -> String {
        format!(
            "{}{REFERENCES_HEADER}{}{RESULT_END_MARKER}",
            self.narrative,
            self.references.render()
        )
    }
}

impl std::fmt::Display for LiteratureReview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
