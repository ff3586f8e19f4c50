//! Manually supplied documents (already extracted page text).

use std::path::Path;

use anyhow::Context;

use crate::models::Paper;

/// Page break emitted by common PDF-to-text tools.
const PAGE_BREAK: char = '\u{c}';

const ABSTRACT_MARKER: &[u8] = b"abstract";

/// A user-supplied document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualDocument {
    /// Storage key or path; its last segment names the document.
    pub key: String,

    /// Extracted text, pages separated by form feeds.
    pub text: String,
}

impl ManualDocument {
    /// Create a document from a key and its text.
    #[must_use]
    pub fn new(key: impl Into<String>, text: impl Into<String>) -> Self {
        Self { key: key.into(), text: text.into() }
    }

    /// Read a text file; the path becomes the key.
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read as UTF-8.
    pub fn read(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read document {}", path.display()))?;
        Ok(Self::new(path.to_string_lossy(), text))
    }

    /// Document name used as its citation.
    #[must_use]
    pub fn name(&self) -> &str {
        document_name(&self.key)
    }

    /// Convert into a paper with no DOI, cited by document name.
    #[must_use]
    pub fn into_paper(self) -> Paper {
        let abstract_text = locate_abstract(&self.text).map(str::to_string);
        if abstract_text.is_none() {
            tracing::warn!(document = self.name(), "Abstract not found on the first page");
        }

        Paper {
            title: Some(self.name().to_string()),
            r#abstract: abstract_text,
            url: self.name().to_string(),
            ..Paper::default()
        }
    }
}

/// Trailing `/`-separated segment of a key.
#[must_use]
pub fn document_name(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Text of the first page from the first "abstract" marker onward (case-insensitive).
#[must_use]
pub fn locate_abstract(text: &str) -> Option<&str> {
    let first_page = text.split(PAGE_BREAK).next().unwrap_or(text);
    let start = first_page
        .as_bytes()
        .windows(ABSTRACT_MARKER.len())
        .position(|window| window.eq_ignore_ascii_case(ABSTRACT_MARKER))?;
    Some(&first_page[start..])
}
