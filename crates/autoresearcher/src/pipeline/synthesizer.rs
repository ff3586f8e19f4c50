//! Literature review synthesis under a fixed context budget.

use std::sync::Arc;

use super::prompts;
use crate::error::{PipelineError, PipelineResult, Stage};
use crate::models::ModelTier;
use crate::services::{CompletionRequest, CompletionService, Tokenizer};

/// Separator between findings in the synthesis prompt.
pub const FINDINGS_SEPARATOR: &str = "\n\n";

/// Output tokens left once the prompt is placed in the context budget.
///
/// Never negative: a prompt at or over the budget leaves 0.
#[must_use]
pub const fn output_token_budget(context_budget: usize, prompt_tokens: usize) -> usize {
    context_budget.saturating_sub(prompt_tokens)
}

/// Synthesizes extracted answers into a narrative review.
#[derive(Clone)]
pub struct ReviewSynthesizer {
    completion: Arc<dyn CompletionService>,
    tokenizer: Arc<dyn Tokenizer>,
    context_budget: usize,
}

impl ReviewSynthesizer {
    /// Create a synthesizer with a total context budget (prompt + output).
    #[must_use]
    pub fn new(
        completion: Arc<dyn CompletionService>,
        tokenizer: Arc<dyn Tokenizer>,
        context_budget: usize,
    ) -> Self {
        Self { completion, tokenizer, context_budget }
    }

    /// Synthesize a narrative from rendered answers.
    ///
    /// The narrative is returned exactly as the completion service produced it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::TokenBudgetExhausted`] without calling the service
    /// when the prompt leaves no output budget, or a completion error.
    pub async fn synthesize<S: AsRef<str>>(
        &self,
        answers: &[S],
        research_question: &str,
        tier: ModelTier,
        temperature: f32,
    ) -> PipelineResult<String> {
        let findings =
            answers.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(FINDINGS_SEPARATOR);
        let prompt = prompts::synthesis_prompt(research_question, &findings);
        tracing::debug!(prompt = %prompt, "Rendered synthesis prompt");

        let prompt_tokens = self.tokenizer.count_tokens(&prompt, tier);
        let max_tokens = output_token_budget(self.context_budget, prompt_tokens);
        if max_tokens == 0 {
            return Err(PipelineError::TokenBudgetExhausted {
                prompt_tokens,
                budget: self.context_budget,
            });
        }

        tracing::info!(
            findings = answers.len(),
            prompt_tokens,
            max_tokens,
            "Synthesizing answers"
        );

        let max_tokens = u32::try_from(max_tokens).unwrap_or(u32::MAX);
        let request =
            CompletionRequest::new(prompt, tier, max_tokens).with_temperature(temperature);

        self.completion
            .complete(&request)
            .await
            .map_err(|source| PipelineError::completion(Stage::Synthesis, source))
    }
}

impl std::fmt::Debug for ReviewSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReviewSynthesizer").field("context_budget", &self.context_budget).finish()
    }
}
