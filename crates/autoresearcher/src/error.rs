//! Errors for service calls and pipeline runs.
//!
//! [`ClientError`] covers one HTTP exchange; [`PipelineError`] is what a
//! pipeline stage gives up with. Conditions the pipeline recovers from
//! (no answer, malformed citation body, missing source marker) are not errors.

use std::time::Duration;

/// Failure of a single request to an external service.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// Connection, DNS, TLS or body read failure.
    #[error("HTTP transport failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failure inside the retry middleware.
    #[error("HTTP middleware failed: {0}")]
    Middleware(#[from] reqwest_middleware::Error),

    /// 429 from the service.
    #[error("Rate limited; retry in {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// 401 or 403: key missing, wrong or without access.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// 400, usually a parameter the service rejected.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Timed out after {0:?}")]
    Timeout(Duration),

    /// Body was not the JSON we expected.
    #[error("Could not parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// Any 5xx.
    #[error("Service error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Unexpected status {status}: {message}")]
    UnexpectedStatus { status: u16, message: String },

    /// Valid JSON missing the content we need (e.g. no completion choices).
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl ClientError {
    #[must_use]
    pub fn rate_limited(seconds: u64) -> Self {
        Self::RateLimited { retry_after: Duration::from_secs(seconds) }
    }

    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized { message: message.into() }
    }

    #[must_use]
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound { resource: resource.into() }
    }

    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest { message: message.into() }
    }

    #[must_use]
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server { status, message: message.into() }
    }

    #[must_use]
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedResponse(message.into())
    }

    /// Whether the same request may succeed if sent again later.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::Timeout(_) | Self::Server { .. })
    }

    /// Wait suggested by a 429.
    #[must_use]
    pub const fn retry_after(&self) -> Option<Duration> {
        if let Self::RateLimited { retry_after } = self { Some(*retry_after) } else { None }
    }
}

/// Pipeline stage that issued a completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Keyword combination generation.
    Keywords,
    /// Per-paper answer extraction.
    Extraction,
    /// Literature review synthesis.
    Synthesis,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Keywords => "keyword generation",
            Self::Extraction => "answer extraction",
            Self::Synthesis => "synthesis",
        };
        f.write_str(name)
    }
}

/// Errors that abort a literature review run.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    /// The completion service failed.
    #[error("Completion service failed during {stage}: {source}")]
    Completion {
        /// Stage that issued the call
        stage: Stage,
        /// Underlying client error
        #[source]
        source: ClientError,
    },

    /// The synthesis prompt leaves no room for output.
    #[error(
        "Synthesis prompt uses {prompt_tokens} tokens, leaving no output budget \
         within the {budget}-token context"
    )]
    TokenBudgetExhausted {
        /// Tokens in the rendered prompt
        prompt_tokens: usize,
        /// Total context budget
        budget: usize,
    },

    /// The paper source failed.
    #[error("Paper source failed: {0}")]
    PaperSource(#[source] ClientError),
}

impl PipelineError {
    /// Wrap a completion failure for a stage.
    #[must_use]
    pub fn completion(stage: Stage, source: ClientError) -> Self {
        Self::Completion { stage, source }
    }

    /// Convert to a user-friendly error message.
    #[must_use]
    pub fn to_user_message(&self) -> String {
        match self {
            Self::Completion { source: ClientError::Unauthorized { .. }, .. } => {
                "The completion service rejected the API key. Check OPENAI_API_KEY.".to_string()
            }
            Self::Completion { source: ClientError::RateLimited { retry_after }, stage } => {
                format!(
                    "Rate limited by the completion service during {stage}. \
                     Please wait {:?} before retrying.",
                    retry_after
                )
            }
            Self::TokenBudgetExhausted { prompt_tokens, budget } => format!(
                "Too many findings to synthesize: the prompt needs {prompt_tokens} tokens \
                 but the budget is {budget}. Use fewer papers."
            ),
            _ => self.to_string(),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

pub type PipelineResult<T> = Result<T, PipelineError>;
