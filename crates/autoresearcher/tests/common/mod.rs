//! Deterministic fakes for the service traits.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use autoresearcher::error::{ClientError, ClientResult};
use autoresearcher::models::{ExternalIds, ModelTier, Paper};
use autoresearcher::services::{
    CitationMetadataService, CompletionRequest, CompletionService, Tokenizer,
};

type Responder = Box<dyn Fn(&CompletionRequest) -> ClientResult<String> + Send + Sync>;

/// Completion service answering through a closure and recording every request.
pub struct FakeCompletion {
    respond: Responder,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeCompletion {
    pub fn new(
        respond: impl Fn(&CompletionRequest) -> ClientResult<String> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self { respond: Box::new(respond), requests: Mutex::new(Vec::new()) })
    }

    /// Answers with the text mapped to the first key found in the prompt,
    /// or the no-answer sentinel.
    pub fn by_prompt(answers: &[(&str, &str)]) -> Arc<Self> {
        let answers: Vec<(String, String)> =
            answers.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        Self::new(move |request| {
            Ok(answers
                .iter()
                .find(|(key, _)| request.prompt.contains(key.as_str()))
                .map(|(_, answer)| answer.clone())
                .unwrap_or_else(|| "No answer found.".to_string()))
        })
    }

    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CompletionService for FakeCompletion {
    async fn complete(&self, request: &CompletionRequest) -> ClientResult<String> {
        self.requests.lock().unwrap().push(request.clone());
        (self.respond)(request)
    }
}

/// Metadata service with canned bodies; unknown DOIs fail in transport.
#[derive(Default)]
pub struct FakeMetadata {
    bodies: HashMap<String, String>,
    lookups: Mutex<Vec<String>>,
}

impl FakeMetadata {
    pub fn with(entries: &[(&str, &str)]) -> Arc<Self> {
        Arc::new(Self {
            bodies: entries.iter().map(|(d, b)| ((*d).to_string(), (*b).to_string())).collect(),
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl CitationMetadataService for FakeMetadata {
    async fn lookup(&self, doi: &str) -> ClientResult<String> {
        self.lookups.lock().unwrap().push(doi.to_string());
        self.bodies
            .get(doi)
            .cloned()
            .ok_or(ClientError::Timeout(std::time::Duration::from_secs(5)))
    }
}

/// Tokenizer reporting a fixed count.
pub struct FixedTokenizer(pub usize);

impl Tokenizer for FixedTokenizer {
    fn count_tokens(&self, _text: &str, _tier: ModelTier) -> usize {
        self.0
    }
}

/// Tokenizer counting whitespace-separated words.
pub struct WordTokenizer;

impl Tokenizer for WordTokenizer {
    fn count_tokens(&self, text: &str, _tier: ModelTier) -> usize {
        text.split_whitespace().count()
    }
}

/// CiteAs body for a citation.
pub fn citeas_body(citation: &str) -> String {
    serde_json::json!({"citations": [{"citation": citation}]}).to_string()
}

pub fn paper_with_doi(title: &str, abstract_text: &str, doi: &str) -> Paper {
    Paper {
        paper_id: title.to_lowercase().replace(' ', "-"),
        title: Some(title.to_string()),
        r#abstract: Some(abstract_text.to_string()),
        url: format!("https://www.semanticscholar.org/paper/{}", title.replace(' ', "")),
        external_ids: Some(ExternalIds { doi: Some(doi.to_string()) }),
        ..Default::default()
    }
}

pub fn paper_without_doi(title: &str, abstract_text: &str, url: &str) -> Paper {
    Paper {
        paper_id: title.to_lowercase().replace(' ', "-"),
        title: Some(title.to_string()),
        r#abstract: Some(abstract_text.to_string()),
        url: url.to_string(),
        ..Default::default()
    }
}
