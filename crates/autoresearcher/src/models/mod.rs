//! Data models for papers, answers and the generated review.
//!
//! Paper models use `#[serde(default)]` for optional fields and
//! camelCase renames to match the Semantic Scholar API.

mod answer;
mod enums;
mod paper;
mod review;

pub use answer::{Answer, NO_ANSWER_SENTINEL, SOURCE_MARKER, SOURCE_SEPARATOR};
pub use enums::{FailurePolicy, ModelTier};
pub use paper::{ExternalIds, Paper, SearchResult};
pub use review::{
    LiteratureReview, NO_FINDINGS_NARRATIVE, REFERENCES_HEADER, RESULT_END_MARKER, ReferenceList,
};
