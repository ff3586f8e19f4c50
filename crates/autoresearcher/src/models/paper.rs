//! Papers as returned by Semantic Scholar search and saved by `search`.

use serde::{Deserialize, Serialize};

/// A paper to review: a search hit or a manually supplied document.
///
/// Field names follow the Graph API (`paperId`, `citationCount`, ...), so a
/// search response deserializes directly and saved files read back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Graph API identifier; empty for manual documents.
    #[serde(default)]
    pub paper_id: String,

    #[serde(default)]
    pub title: Option<String>,

    /// The only text answer extraction ever reads.
    #[serde(default)]
    pub r#abstract: Option<String>,

    /// Landing page, or the document name for manual documents.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,

    #[serde(default)]
    pub year: Option<i32>,

    /// Ranking key for search results.
    #[serde(default)]
    pub citation_count: Option<i32>,

    #[serde(default)]
    pub external_ids: Option<ExternalIds>,
}

impl Paper {
    /// Title for log lines; `"Untitled"` when missing.
    #[must_use]
    pub fn title_or_default(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }

    /// Abstract text, `""` when the paper has none.
    #[must_use]
    pub fn abstract_text(&self) -> &str {
        self.r#abstract.as_deref().unwrap_or("")
    }

    /// DOI, ignoring blank values.
    #[must_use]
    pub fn doi(&self) -> Option<&str> {
        self.external_ids.as_ref()?.doi.as_deref().filter(|doi| !doi.trim().is_empty())
    }

    #[must_use]
    pub fn citations(&self) -> i32 {
        self.citation_count.unwrap_or(0)
    }

    /// Identifier cited verbatim when no DOI can be resolved.
    #[must_use]
    pub fn fallback_citation(&self) -> &str {
        if self.url.is_empty() { self.title_or_default() } else { &self.url }
    }
}

/// Identifiers from other registries; only the DOI is used for citations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalIds {
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

/// One page of `/paper/search` results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// Estimated number of matches.
    #[serde(default)]
    pub total: Option<i64>,

    #[serde(default)]
    pub data: Vec<Paper>,
}

// Semantic Scholar returns `"url": null` for some records.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
