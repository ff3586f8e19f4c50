//! Capability traits for the external services the pipeline talks to.
//!
//! Production implementations live in [`crate::client`] and
//! [`crate::tokenizer`]; tests substitute deterministic fakes.

use crate::error::{ClientResult, PipelineResult};
use crate::models::{ModelTier, Paper};

/// A single text-completion call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Prompt sent as the sole user message.
    pub prompt: String,

    /// Model tier to use.
    pub tier: ModelTier,

    /// Sampling temperature (0 = deterministic).
    pub temperature: f32,

    /// Maximum tokens to generate.
    pub max_tokens: u32,
}

impl CompletionRequest {
    /// Create a request with temperature 0 and the given output cap.
    #[must_use]
    pub fn new(prompt: impl Into<String>, tier: ModelTier, max_tokens: u32) -> Self {
        Self { prompt: prompt.into(), tier, temperature: 0.0, max_tokens }
    }

    /// Set the sampling temperature.
    #[must_use]
    pub const fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text-completion service.
#[async_trait::async_trait]
pub trait CompletionService: Send + Sync {
    /// Complete the prompt and return the generated text.
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<String>;
}

/// Citation metadata lookup by DOI.
#[async_trait::async_trait]
pub trait CitationMetadataService: Send + Sync {
    /// Return the raw response body for a DOI, whatever its shape.
    ///
    /// Only transport failures are errors.
    async fn lookup(&self, doi: &str) -> ClientResult<String>;
}

/// Model-specific token counting.
pub trait Tokenizer: Send + Sync {
    /// Number of tokens `text` occupies under the tier's model.
    fn count_tokens(&self, text: &str, tier: ModelTier) -> usize;
}

/// Supplier of candidate papers for a research question.
#[async_trait::async_trait]
pub trait PaperSource: Send + Sync {
    /// Fetch papers, in the order they should be reviewed.
    async fn fetch_papers(&self, research_question: &str) -> PipelineResult<Vec<Paper>>;
}
