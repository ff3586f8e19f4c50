//! Per-paper answer extraction.

use std::sync::Arc;

use futures::{StreamExt, stream};

use super::prompts;
use super::resolver::CitationResolver;
use crate::config::Config;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::{Answer, FailurePolicy, ModelTier, Paper};
use crate::services::{CompletionRequest, CompletionService};

/// Settings for answer extraction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractionOptions {
    /// Model tier for extraction calls.
    pub tier: ModelTier,

    /// Sampling temperature.
    pub temperature: f32,

    /// Output token cap per paper.
    pub max_tokens: u32,

    /// Behaviour when a paper's completion fails.
    pub failure_policy: FailurePolicy,

    /// Papers in flight at once. Results are always consumed in input order.
    pub concurrency: usize,
}

impl ExtractionOptions {
    /// Options taken from the configuration.
    #[must_use]
    pub fn from_config(config: &Config) -> Self {
        Self {
            tier: config.extraction_tier,
            max_tokens: config.extraction_max_tokens,
            failure_policy: config.failure_policy,
            concurrency: config.extraction_concurrency,
            ..Self::default()
        }
    }
}

impl Default for ExtractionOptions {
    fn default() -> Self {
        Self {
            tier: ModelTier::Default,
            temperature: 0.0,
            max_tokens: crate::config::api::EXTRACTION_MAX_TOKENS,
            failure_policy: FailurePolicy::Skip,
            concurrency: 1,
        }
    }
}

/// Outcome of extracting from one paper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// The abstract answered the question.
    Found(Answer),
    /// The completion returned the no-answer sentinel (or nothing).
    NoAnswer,
}

/// Extracts answers to a research question from paper abstracts.
#[derive(Clone)]
pub struct AnswerExtractor {
    completion: Arc<dyn CompletionService>,
    resolver: CitationResolver,
    options: ExtractionOptions,
}

impl AnswerExtractor {
    /// Create an extractor.
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionService>,
        resolver: CitationResolver,
        options: ExtractionOptions,
    ) -> Self {
        Self { completion, resolver, options }
    }

    /// Extract answers from every paper.
    ///
    /// The result is a subsequence of `papers` in input order; papers without an
    /// answer are absent. Failed papers are skipped or abort the batch according
    /// to the failure policy, except that a batch where every paper failed is
    /// an error under either policy.
    ///
    /// # Errors
    ///
    /// Returns the first paper failure under [`FailurePolicy::Abort`], or the
    /// last one when no paper in a non-empty batch succeeded.
    pub async fn extract(
        &self,
        papers: &[Paper],
        research_question: &str,
    ) -> PipelineResult<Vec<Answer>> {
        tracing::info!(papers = papers.len(), "Extracting research findings from papers");

        let mut outcomes = stream::iter(papers.iter().enumerate())
            .map(move |(index, paper)| async move {
                (index, paper, self.extract_paper(paper, research_question).await)
            })
            .buffered(self.options.concurrency.max(1));

        let mut answers = Vec::new();
        let mut failures = 0;
        let mut last_error = None;
        while let Some((index, paper, outcome)) = outcomes.next().await {
            match outcome {
                Ok(Extraction::Found(answer)) => {
                    tracing::info!(index, paper = paper.title_or_default(), "Answer found");
                    tracing::debug!(answer = %answer, "Extracted answer");
                    answers.push(answer);
                }
                Ok(Extraction::NoAnswer) => {
                    tracing::debug!(index, paper = paper.title_or_default(), "No answer found");
                }
                Err(err) => match self.options.failure_policy {
                    FailurePolicy::Skip => {
                        tracing::warn!(
                            index,
                            paper = paper.title_or_default(),
                            error = %err,
                            "Extraction failed, skipping paper"
                        );
                        failures += 1;
                        last_error = Some(err);
                    }
                    FailurePolicy::Abort => return Err(err),
                },
            }
        }

        if failures == papers.len() {
            if let Some(err) = last_error {
                tracing::error!(failures, "Extraction failed for every paper");
                return Err(err);
            }
        }

        tracing::info!(answers = answers.len(), "Research findings extracted");
        Ok(answers)
    }

    /// Extract from a single paper.
    ///
    /// The citation is resolved only when the paper yields an answer.
    ///
    /// # Errors
    ///
    /// Returns error if the completion call fails.
    pub async fn extract_paper(
        &self,
        paper: &Paper,
        research_question: &str,
    ) -> PipelineResult<Extraction> {
        tracing::debug!(paper = paper.title_or_default(), "Processing paper");

        let prompt = prompts::extraction_prompt(research_question, paper.abstract_text());
        let request = CompletionRequest::new(prompt, self.options.tier, self.options.max_tokens)
            .with_temperature(self.options.temperature);

        let text = self
            .completion
            .complete(&request)
            .await
            .map_err(|source| PipelineError::completion(Stage::Extraction, source))?;

        if !Answer::is_finding(&text) {
            return Ok(Extraction::NoAnswer);
        }

        let citation = self.resolver.resolve_paper(paper).await;
        Ok(Extraction::Found(Answer::new(text.trim(), citation)))
    }
}

impl std::fmt::Debug for AnswerExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnswerExtractor").field("options", &self.options).finish()
    }
}
