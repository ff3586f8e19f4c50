//! Reference list assembly from rendered answers.

use crate::models::{ReferenceList, SOURCE_MARKER};

/// Citation carried by a rendered answer: everything after the last source marker.
#[must_use]
pub fn citation_of(answer: &str) -> Option<&str> {
    answer.rfind(SOURCE_MARKER).map(|start| &answer[start + SOURCE_MARKER.len()..])
}

/// Build the reference list from rendered answers, in answer order.
///
/// Answers without a source marker contribute nothing. Duplicates are kept.
#[must_use]
pub fn assemble<S: AsRef<str>>(answers: &[S]) -> ReferenceList {
    let citations = answers
        .iter()
        .enumerate()
        .filter_map(|(index, answer)| {
            let citation = citation_of(answer.as_ref());
            if citation.is_none() {
                tracing::warn!(index, "Answer has no source marker, skipping its reference");
            }
            citation.map(str::to_string)
        })
        .collect();

    ReferenceList::new(citations)
}
