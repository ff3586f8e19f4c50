//! BPE token counting for the synthesis budget.

use tiktoken_rs::CoreBPE;

use crate::config::Config;
use crate::models::ModelTier;
use crate::services::Tokenizer;

/// Token counter using tiktoken BPE encodings, one per model tier.
pub struct TiktokenTokenizer {
    default_bpe: CoreBPE,
    strong_bpe: CoreBPE,
}

impl TiktokenTokenizer {
    /// Load the encodings for the configured models.
    ///
    /// Unknown model names fall back to `cl100k_base`.
    ///
    /// # Errors
    ///
    /// Returns error if no encoding can be loaded.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            default_bpe: bpe_for_model(config.model_for(ModelTier::Default))?,
            strong_bpe: bpe_for_model(config.model_for(ModelTier::Strong))?,
        })
    }
}

fn bpe_for_model(model: &str) -> anyhow::Result<CoreBPE> {
    match tiktoken_rs::get_bpe_from_model(model) {
        Ok(bpe) => Ok(bpe),
        Err(_) => {
            tracing::debug!(model, "No tokenizer registered for model, using cl100k_base");
            tiktoken_rs::cl100k_base()
                .map_err(|e| anyhow::anyhow!("failed to load cl100k_base: {e}"))
        }
    }
}

impl Tokenizer for TiktokenTokenizer {
    fn count_tokens(&self, text: &str, tier: ModelTier) -> usize {
        let bpe = match tier {
            ModelTier::Default => &self.default_bpe,
            ModelTier::Strong => &self.strong_bpe,
        };
        bpe.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for TiktokenTokenizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TiktokenTokenizer").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_tokens() {
        let tokenizer = TiktokenTokenizer::new(&Config::default()).unwrap();
        assert_eq!(tokenizer.count_tokens("", ModelTier::Default), 0);
        let short = tokenizer.count_tokens("hello world", ModelTier::Strong);
        let long = tokenizer.count_tokens(&"hello world ".repeat(50), ModelTier::Strong);
        assert!(short > 0);
        assert!(long > short);
    }

    #[test]
    fn test_unknown_model_falls_back() {
        let config = Config { default_model: "no-such-model".to_string(), ..Config::default() };
        let tokenizer = TiktokenTokenizer::new(&config).unwrap();
        assert!(tokenizer.count_tokens("literature review", ModelTier::Default) > 0);
    }
}
