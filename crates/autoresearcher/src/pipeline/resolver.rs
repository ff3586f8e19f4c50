//! Citation resolution: DOI lookups with verbatim fallback.

use std::sync::Arc;

use serde::Deserialize;

use crate::error::ClientResult;
use crate::models::Paper;
use crate::services::CitationMetadataService;

/// What a citation is resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CitationSource {
    /// Looked up through the metadata service.
    Doi(String),
    /// Used as the citation unchanged (URL or document name).
    Fallback(String),
}

impl CitationSource {
    /// The DOI when the paper has one, otherwise its fallback identifier.
    #[must_use]
    pub fn for_paper(paper: &Paper) -> Self {
        match paper.doi() {
            Some(doi) => Self::Doi(doi.to_string()),
            None => Self::Fallback(paper.fallback_citation().to_string()),
        }
    }
}

#[derive(Deserialize)]
struct CitationProduct {
    #[serde(default)]
    citations: Vec<CitationEntry>,
}

#[derive(Deserialize)]
struct CitationEntry {
    citation: String,
}

/// Extract `citations[0].citation` from a lookup body, or return the body verbatim.
#[must_use]
pub fn citation_from_body(body: &str) -> String {
    match serde_json::from_str::<CitationProduct>(body) {
        Ok(product) => match product.citations.into_iter().next() {
            Some(entry) => entry.citation,
            None => {
                tracing::warn!("Citation response has no entries, using raw body");
                body.to_string()
            }
        },
        Err(err) => {
            tracing::warn!(error = %err, "Malformed citation response, using raw body");
            body.to_string()
        }
    }
}

/// Turns papers into human-readable citations.
///
/// Lookups are not cached: a DOI shared by two papers is looked up twice.
#[derive(Clone)]
pub struct CitationResolver {
    metadata: Arc<dyn CitationMetadataService>,
}

impl CitationResolver {
    /// Create a resolver over a metadata service.
    #[must_use]
    pub fn new(metadata: Arc<dyn CitationMetadataService>) -> Self {
        Self { metadata }
    }

    /// Resolve a citation source.
    ///
    /// # Errors
    ///
    /// Returns error only when the DOI lookup fails in transport.
    pub async fn resolve(&self, source: &CitationSource) -> ClientResult<String> {
        match source {
            CitationSource::Doi(doi) => {
                let body = self.metadata.lookup(doi).await?;
                Ok(citation_from_body(&body))
            }
            CitationSource::Fallback(identifier) => Ok(identifier.clone()),
        }
    }

    /// Resolve the citation for a paper, falling back to its URL if the lookup fails.
    pub async fn resolve_paper(&self, paper: &Paper) -> String {
        let source = CitationSource::for_paper(paper);
        match self.resolve(&source).await {
            Ok(citation) => citation,
            Err(err) => {
                tracing::warn!(
                    paper = paper.title_or_default(),
                    error = %err,
                    "Citation lookup failed, citing paper URL instead"
                );
                paper.fallback_citation().to_string()
            }
        }
    }
}

impl std::fmt::Debug for CitationResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationResolver").finish()
    }
}
