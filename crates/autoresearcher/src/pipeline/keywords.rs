//! Keyword combination generation for paper search.

use std::sync::Arc;

use super::prompts;
use crate::config::api;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::ModelTier;
use crate::services::{CompletionRequest, CompletionService};

/// Parse `"Label: keyword,keyword"` lines; lines without `": "` are ignored.
#[must_use]
pub fn parse_keyword_combinations(response: &str) -> Vec<String> {
    response
        .lines()
        .filter_map(|line| line.split_once(": "))
        .map(|(_, keywords)| keywords.trim().to_string())
        .filter(|keywords| !keywords.is_empty())
        .collect()
}

/// Asks the completion service for search keyword combinations.
#[derive(Clone)]
pub struct KeywordGenerator {
    completion: Arc<dyn CompletionService>,
}

impl KeywordGenerator {
    /// Create a generator.
    #[must_use]
    pub fn new(completion: Arc<dyn CompletionService>) -> Self {
        Self { completion }
    }

    /// Generate keyword combinations for a research question.
    ///
    /// # Errors
    ///
    /// Returns error if the completion call fails.
    pub async fn generate(&self, research_question: &str) -> PipelineResult<Vec<String>> {
        tracing::info!("Generating keyword combinations");

        let request = CompletionRequest::new(
            prompts::keyword_prompt(research_question),
            ModelTier::Default,
            api::KEYWORD_MAX_TOKENS,
        );

        let response = self
            .completion
            .complete(&request)
            .await
            .map_err(|source| PipelineError::completion(Stage::Keywords, source))?;

        let combinations = parse_keyword_combinations(&response);
        tracing::info!(combinations = ?combinations, "Keyword combinations generated");
        Ok(combinations)
    }
}

impl std::fmt::Debug for KeywordGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordGenerator").finish()
    }
}
