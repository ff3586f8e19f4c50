//! The literature review pipeline.
//!
//! Papers flow through four stages:
//! 1. [`AnswerExtractor`] asks the completion service for each abstract's answer
//!    and pairs it with a citation from the [`CitationResolver`]
//! 2. [`ReviewSynthesizer`] turns the answers into a narrative
//! 3. [`assemble`] derives the reference list from the same answers
//! 4. [`LiteratureReviewPipeline`] joins narrative and references

mod assembler;
mod extractor;
mod keywords;
pub mod prompts;
mod resolver;
mod synthesizer;

pub use assembler::{assemble, citation_of};
pub use extractor::{AnswerExtractor, Extraction, ExtractionOptions};
pub use keywords::{KeywordGenerator, parse_keyword_combinations};
pub use resolver::{CitationResolver, CitationSource, citation_from_body};
pub use synthesizer::{FINDINGS_SEPARATOR, ReviewSynthesizer, output_token_budget};

use std::sync::Arc;

use crate::client::{CiteAsClient, OpenAiClient};
use crate::config::Config;
use crate::error::PipelineResult;
use crate::models::{LiteratureReview, ModelTier, NO_FINDINGS_NARRATIVE, Paper};
use crate::services::{CitationMetadataService, CompletionService, Tokenizer};
use crate::tokenizer::TiktokenTokenizer;

/// End-to-end literature review generation over a set of papers.
#[derive(Debug, Clone)]
pub struct LiteratureReviewPipeline {
    extractor: AnswerExtractor,
    synthesizer: ReviewSynthesizer,
    synthesis_tier: ModelTier,
    synthesis_temperature: f32,
}

impl LiteratureReviewPipeline {
    /// Assemble a pipeline from its stages.
    #[must_use]
    pub fn new(
        extractor: AnswerExtractor,
        synthesizer: ReviewSynthesizer,
        synthesis_tier: ModelTier,
        synthesis_temperature: f32,
    ) -> Self {
        Self { extractor, synthesizer, synthesis_tier, synthesis_temperature }
    }

    /// Build a pipeline over the given services using the configured settings.
    #[must_use]
    pub fn with_services(
        config: &Config,
        completion: Arc<dyn CompletionService>,
        metadata: Arc<dyn CitationMetadataService>,
        tokenizer: Arc<dyn Tokenizer>,
    ) -> Self {
        let resolver = CitationResolver::new(metadata);
        let extractor = AnswerExtractor::new(
            Arc::clone(&completion),
            resolver,
            ExtractionOptions::from_config(config),
        );
        let synthesizer = ReviewSynthesizer::new(completion, tokenizer, config.context_budget);

        Self::new(extractor, synthesizer, config.synthesis_tier, config.synthesis_temperature)
    }

    /// Build a pipeline over the production services.
    ///
    /// # Errors
    ///
    /// Returns error if a client cannot be created (missing key or email) or
    /// the tokenizer cannot be loaded.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let completion: Arc<dyn CompletionService> = Arc::new(OpenAiClient::new(config)?);
        let metadata: Arc<dyn CitationMetadataService> = Arc::new(CiteAsClient::new(config)?);
        let tokenizer: Arc<dyn Tokenizer> = Arc::new(TiktokenTokenizer::new(config)?);

        Ok(Self::with_services(config, completion, metadata, tokenizer))
    }

    /// Generate the literature review for a research question.
    ///
    /// With no extracted answers the synthesis call is skipped and the review
    /// carries [`NO_FINDINGS_NARRATIVE`] with an empty reference list.
    ///
    /// # Errors
    ///
    /// Returns the first unrecovered stage error; no partial review is produced.
    pub async fn run(
        &self,
        research_question: &str,
        papers: &[Paper],
    ) -> PipelineResult<LiteratureReview> {
        tracing::info!(research_question, papers = papers.len(), "Literature review started");

        let answers = self.extractor.extract(papers, research_question).await?;
        let rendered: Vec<String> = answers.iter().map(|answer| answer.render()).collect();

        let narrative = if rendered.is_empty() {
            tracing::warn!("No answers extracted, skipping synthesis");
            NO_FINDINGS_NARRATIVE.to_string()
        } else {
            self.synthesizer
                .synthesize(
                    rendered.as_slice(),
                    research_question,
                    self.synthesis_tier,
                    self.synthesis_temperature,
                )
                .await?
        };

        let references = assemble(rendered.as_slice());

        tracing::info!(references = references.len(), "Literature review generated");

        Ok(LiteratureReview {
            research_question: research_question.to_string(),
            narrative,
            references,
        })
    }
}
