//! Configuration for the literature review pipeline.
//!
//! One [`Config`] is built at process start and handed by reference to every
//! client and pipeline stage constructor.

use std::time::Duration;

use crate::models::{FailurePolicy, ModelTier};

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Semantic Scholar Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// OpenAI-compatible API base (chat completions live under it).
    pub const OPENAI_API: &str = "https://api.openai.com/v1";

    /// CiteAs citation metadata API.
    pub const CITEAS_API: &str = "https://api.citeas.org";

    /// Model used for the default tier.
    pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

    /// Model used for the strong tier.
    pub const STRONG_MODEL: &str = "gpt-4";

    /// Total context headroom shared by the synthesis prompt and its output.
    pub const TOTAL_CONTEXT_BUDGET: usize = 4080;

    /// Output token cap for per-paper answer extraction.
    pub const EXTRACTION_MAX_TOKENS: u32 = 150;

    /// Output token cap for keyword generation.
    pub const KEYWORD_MAX_TOKENS: u32 = 200;

    /// Synthesis temperature.
    pub const SYNTHESIS_TEMPERATURE: f32 = 0.1;

    /// Number of top-ranked papers kept by the paper source.
    pub const MAX_PAPERS: usize = 20;

    /// Results requested per search query.
    pub const SEARCH_LIMIT: i32 = 100;

    /// Publication year range passed to paper search.
    pub const YEAR_RANGE: &str = "2000-2023";

    /// Request timeout (completions over long prompts are slow).
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Maximum retries for transient HTTP failures.
    pub const MAX_RETRIES: u32 = 3;

    /// Rate limit delay between Semantic Scholar requests without API key (200ms = 5 req/s).
    pub const RATE_LIMIT_DELAY: Duration = Duration::from_millis(200);

    /// Rate limit delay between Semantic Scholar requests with API key (10ms = 100 req/s).
    pub const RATE_LIMIT_DELAY_WITH_KEY: Duration = Duration::from_millis(10);

    /// Search cache TTL (5 minutes).
    pub const CACHE_TTL: Duration = Duration::from_secs(300);

    /// Maximum cache size.
    pub const CACHE_MAX_SIZE: u64 = 1000;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Paper field sets for Semantic Scholar requests.
pub mod fields {
    /// Fields the pipeline reads from a paper.
    pub const DEFAULT: &[&str] =
        &["paperId", "title", "abstract", "url", "year", "citationCount", "externalIds"];
}

/// Pipeline configuration.
#[derive(Clone)]
pub struct Config {
    /// OpenAI API key.
    pub openai_api_key: Option<String>,

    /// Contact email sent to the citation metadata service.
    pub contact_email: Option<String>,

    /// Semantic Scholar API key (optional).
    pub semantic_scholar_api_key: Option<String>,

    /// Base URL for chat completions (for testing with mock servers).
    pub openai_api_url: String,

    /// Base URL for citation metadata lookups.
    pub citeas_api_url: String,

    /// Base URL for Graph API.
    pub graph_api_url: String,

    /// Model name for [`ModelTier::Default`].
    pub default_model: String,

    /// Model name for [`ModelTier::Strong`].
    pub strong_model: String,

    /// Tier used for per-paper extraction.
    pub extraction_tier: ModelTier,

    /// Tier used for synthesis.
    pub synthesis_tier: ModelTier,

    /// Output token cap for extraction.
    pub extraction_max_tokens: u32,

    /// Synthesis temperature.
    pub synthesis_temperature: f32,

    /// Context budget shared by synthesis prompt and output.
    pub context_budget: usize,

    /// What to do when a single paper's extraction fails.
    pub failure_policy: FailurePolicy,

    /// Papers in flight during extraction (1 = sequential).
    pub extraction_concurrency: usize,

    /// Papers kept by the search source.
    pub max_papers: usize,

    /// Results requested per search query.
    pub search_limit: i32,

    /// Year range filter for search (`None` disables it).
    pub year_range: Option<String>,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Retries for transient failures.
    pub max_retries: u32,

    /// Delay before each Semantic Scholar request.
    pub rate_limit_delay: Duration,

    /// Search cache TTL.
    pub cache_ttl: Duration,

    /// Maximum cache size.
    pub cache_max_size: u64,
}

impl Config {
    /// Create a configuration with production endpoints.
    ///
    /// The Semantic Scholar rate limit is relaxed when an API key is present.
    #[must_use]
    pub fn new(
        openai_api_key: Option<String>,
        contact_email: Option<String>,
        semantic_scholar_api_key: Option<String>,
    ) -> Self {
        let has_key = semantic_scholar_api_key.is_some();
        Self {
            openai_api_key,
            contact_email,
            semantic_scholar_api_key,
            openai_api_url: api::OPENAI_API.to_string(),
            citeas_api_url: api::CITEAS_API.to_string(),
            graph_api_url: api::GRAPH_API.to_string(),
            default_model: api::DEFAULT_MODEL.to_string(),
            strong_model: api::STRONG_MODEL.to_string(),
            extraction_tier: ModelTier::Default,
            synthesis_tier: ModelTier::Default,
            extraction_max_tokens: api::EXTRACTION_MAX_TOKENS,
            synthesis_temperature: api::SYNTHESIS_TEMPERATURE,
            context_budget: api::TOTAL_CONTEXT_BUDGET,
            failure_policy: FailurePolicy::default(),
            extraction_concurrency: 1,
            max_papers: api::MAX_PAPERS,
            search_limit: api::SEARCH_LIMIT,
            year_range: Some(api::YEAR_RANGE.to_string()),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            max_retries: api::MAX_RETRIES,
            rate_limit_delay: if has_key {
                api::RATE_LIMIT_DELAY_WITH_KEY
            } else {
                api::RATE_LIMIT_DELAY
            },
            cache_ttl: api::CACHE_TTL,
            cache_max_size: api::CACHE_MAX_SIZE,
        }
    }

    /// Create a test configuration pointing every service at one mock server.
    ///
    /// Completions live under `/v1`, CiteAs under `/citeas`, Semantic Scholar
    /// under `/graph/v1`.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            openai_api_key: Some("test-openai-key".to_string()),
            contact_email: Some("test@example.com".to_string()),
            semantic_scholar_api_key: None,
            openai_api_url: format!("{}/v1", base_url),
            citeas_api_url: format!("{}/citeas", base_url),
            graph_api_url: format!("{}/graph/v1", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            max_retries: 0,
            rate_limit_delay: Duration::from_millis(0), // No delay in tests
            cache_ttl: Duration::from_secs(0),          // No caching in tests
            cache_max_size: 0,
            ..Self::new(None, None, None)
        }
    }

    /// Create configuration from environment variables (and `.env`, if present).
    ///
    /// # Errors
    ///
    /// Returns error if an override is not a valid value or a URL does not parse.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        let mut config = Self::new(
            non_empty_var("OPENAI_API_KEY"),
            non_empty_var("EMAIL"),
            non_empty_var("SEMANTIC_SCHOLAR_API_KEY"),
        );

        if let Some(url) = non_empty_var("OPENAI_API_BASE") {
            config.openai_api_url = url.trim_end_matches('/').to_string();
        }
        if let Some(model) = non_empty_var("AUTORESEARCHER_DEFAULT_MODEL") {
            config.default_model = model;
        }
        if let Some(model) = non_empty_var("AUTORESEARCHER_STRONG_MODEL") {
            config.strong_model = model;
        }
        if let Some(budget) = non_empty_var("AUTORESEARCHER_CONTEXT_BUDGET") {
            config.context_budget = budget.parse().map_err(|e| {
                anyhow::anyhow!("AUTORESEARCHER_CONTEXT_BUDGET must be an integer: {e}")
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check that every base URL parses.
    ///
    /// # Errors
    ///
    /// Returns error naming the first invalid URL.
    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, value) in [
            ("openai_api_url", &self.openai_api_url),
            ("citeas_api_url", &self.citeas_api_url),
            ("graph_api_url", &self.graph_api_url),
        ] {
            url::Url::parse(value).map_err(|e| anyhow::anyhow!("invalid {name} '{value}': {e}"))?;
        }
        if self.extraction_concurrency == 0 {
            anyhow::bail!("extraction_concurrency must be at least 1");
        }
        Ok(())
    }

    /// Model name for a tier.
    #[must_use]
    pub fn model_for(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Default => &self.default_model,
            ModelTier::Strong => &self.strong_model,
        }
    }

    /// Check if a Semantic Scholar API key is configured.
    #[must_use]
    pub const fn has_semantic_scholar_key(&self) -> bool {
        self.semantic_scholar_api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("has_openai_api_key", &self.openai_api_key.is_some())
            .field("contact_email", &self.contact_email)
            .field("has_semantic_scholar_key", &self.has_semantic_scholar_key())
            .field("openai_api_url", &self.openai_api_url)
            .field("citeas_api_url", &self.citeas_api_url)
            .field("graph_api_url", &self.graph_api_url)
            .field("default_model", &self.default_model)
            .field("strong_model", &self.strong_model)
            .field("context_budget", &self.context_budget)
            .field("failure_policy", &self.failure_policy)
            .finish()
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
