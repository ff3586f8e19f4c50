//! Paper sources: Semantic Scholar search and manual documents.

mod manual;

pub use manual::{ManualDocument, document_name, locate_abstract};

use std::cmp::Reverse;
use std::collections::HashSet;
use std::path::Path;

use anyhow::Context;

use crate::client::SemanticScholarClient;
use crate::config::{Config, fields};
use crate::error::{PipelineError, PipelineResult};
use crate::models::Paper;
use crate::pipeline::KeywordGenerator;
use crate::services::PaperSource;

/// Merge search batches, keep the first copy of each paper, rank by citations.
///
/// Ties keep their merge order. At most `max_papers` are returned.
#[must_use]
pub fn merge_and_rank(batches: Vec<Vec<Paper>>, max_papers: usize) -> Vec<Paper> {
    let mut seen = HashSet::new();
    let mut papers: Vec<Paper> = batches
        .into_iter()
        .flatten()
        .filter(|paper| {
            let key = if paper.paper_id.is_empty() { &paper.url } else { &paper.paper_id };
            seen.insert(key.clone())
        })
        .collect();

    papers.sort_by_key(|paper| Reverse(paper.citations()));
    papers.truncate(max_papers);
    papers
}

/// Searches Semantic Scholar for the question and generated keyword combinations.
#[derive(Debug, Clone)]
pub struct SemanticScholarSource {
    client: SemanticScholarClient,
    keywords: KeywordGenerator,
    max_papers: usize,
    search_limit: i32,
    year_range: Option<String>,
}

impl SemanticScholarSource {
    /// Create a source.
    #[must_use]
    pub fn new(config: &Config, client: SemanticScholarClient, keywords: KeywordGenerator) -> Self {
        Self {
            client,
            keywords,
            max_papers: config.max_papers,
            search_limit: config.search_limit,
            year_range: config.year_range.clone(),
        }
    }
}

#[async_trait::async_trait]
impl PaperSource for SemanticScholarSource {
    async fn fetch_papers(&self, research_question: &str) -> PipelineResult<Vec<Paper>> {
        let combinations = self.keywords.generate(research_question).await?;

        let mut queries = vec![research_question.to_string()];
        queries.extend(combinations.iter().map(|keywords| keywords.replace(',', " ")));

        tracing::info!(queries = queries.len(), max_papers = self.max_papers, "Fetching papers");

        let mut batches = Vec::with_capacity(queries.len());
        let year = self.year_range.as_deref();
        for (index, query) in queries.iter().enumerate() {
            let result =
                self.client.search_papers(query, 0, self.search_limit, fields::DEFAULT, year).await;

            match result {
                Ok(result) => {
                    tracing::debug!(query, found = result.data.len(), "Search completed");
                    batches.push(result.data);
                }
                Err(err) if index > 0 => {
                    tracing::warn!(query, error = %err, "Keyword search failed, skipping");
                }
                Err(err) => return Err(PipelineError::PaperSource(err)),
            }
        }

        let papers = merge_and_rank(batches, self.max_papers);
        tracing::info!(papers = papers.len(), "Top papers fetched");
        Ok(papers)
    }
}

/// Read a JSON array of papers.
///
/// # Errors
///
/// Returns error if the file cannot be read or parsed.
pub fn read_papers(path: &Path) -> anyhow::Result<Vec<Paper>> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read papers from {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse papers in {}", path.display()))
}

/// Write papers as a JSON array, creating parent directories.
///
/// # Errors
///
/// Returns error if the file cannot be written.
pub fn write_papers(path: &Path, papers: &[Paper]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let data = serde_json::to_string_pretty(papers)?;
    std::fs::write(path, data).with_context(|| format!("failed to write {}", path.display()))
}
