//! Extracted answers and the text protocol that carries their citations.

use serde::{Deserialize, Serialize};

/// Exact completion text meaning "this abstract does not answer the question".
pub const NO_ANSWER_SENTINEL: &str = "No answer found.";

/// Marker preceding the citation in a rendered answer.
///
/// The citation is everything after the *last* occurrence of this marker.
pub const SOURCE_MARKER: &str = "SOURCE: ";

/// Separator placed between finding and citation when rendering.
pub const SOURCE_SEPARATOR: &str = " SOURCE: ";

/// A finding extracted from one paper, paired with that paper's citation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    finding: String,
    citation: String,
}

impl Answer {
    /// Build an answer from a finding and a citation.
    #[must_use]
    pub fn new(finding: impl Into<String>, citation: impl Into<String>) -> Self {
        Self { finding: finding.into(), citation: citation.into() }
    }

    /// Whether completion text counts as a finding.
    ///
    /// Blank text and the no-answer sentinel do not.
    #[must_use]
    pub fn is_finding(text: &str) -> bool {
        let text = text.trim();
        !text.is_empty() && text != NO_ANSWER_SENTINEL
    }

    /// The extracted finding.
    #[must_use]
    pub fn finding(&self) -> &str {
        &self.finding
    }

    /// The citation for the paper the finding came from.
    #[must_use]
    pub fn citation(&self) -> &str {
        &self.citation
    }

    /// Render as `"<finding> SOURCE: <citation>"`.
    #[must_use]
    pub fn render(&self) -> String {
        format!("{}{SOURCE_SEPARATOR}{}", self.finding, self.citation)
    }
}

impl std::fmt::Display for Answer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}
