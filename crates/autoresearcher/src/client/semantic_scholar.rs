//! Semantic Scholar Graph API client (paper search only).

use std::time::Duration;

use md5::{Digest, Md5};
use moka::future::Cache;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest_middleware::ClientWithMiddleware;

use super::{build_http_client, check_status, transport_error};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::SearchResult;

/// Paper search client with request pacing and a response cache.
#[derive(Clone)]
pub struct SemanticScholarClient {
    client: ClientWithMiddleware,

    /// Search responses keyed by the md5 of the full request URL.
    cache: Cache<String, SearchResult>,

    has_api_key: bool,
    search_url: String,

    /// Pause before every uncached request.
    rate_limit_delay: Duration,

    request_timeout: Duration,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = config.semantic_scholar_api_key.as_deref() {
            let mut value = HeaderValue::from_str(key)?;
            value.set_sensitive(true);
            headers.insert("x-api-key", value);
        }

        Ok(Self {
            client: build_http_client(config, headers)?,
            cache: Cache::builder()
                .max_capacity(config.cache_max_size)
                .time_to_live(config.cache_ttl)
                .build(),
            has_api_key: config.has_semantic_scholar_key(),
            search_url: format!("{}/paper/search", config.graph_api_url),
            rate_limit_delay: config.rate_limit_delay,
            request_timeout: config.request_timeout,
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.has_api_key
    }

    /// Relevance search over papers.
    ///
    /// `year` takes the API's range syntax, e.g. `"2000-2023"`.
    ///
    /// # Errors
    ///
    /// Returns error on transport failure, a non-success status, or an
    /// unparseable body.
    pub async fn search_papers(
        &self,
        query: &str,
        offset: i32,
        limit: i32,
        fields: &[&str],
        year: Option<&str>,
    ) -> ClientResult<SearchResult> {
        let mut url = url::Url::parse(&self.search_url)
            .map_err(|e| ClientError::bad_request(format!("invalid search URL: {e}")))?;
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("offset", &offset.to_string())
            .append_pair("limit", &limit.to_string())
            .append_pair("fields", &fields.join(","));
        if let Some(year) = year {
            url.query_pairs_mut().append_pair("year", year);
        }

        let key = cache_key(url.as_str());
        if let Some(hit) = self.cache.get(&key).await {
            tracing::debug!(query, "Search cache hit");
            return Ok(hit);
        }

        tokio::time::sleep(self.rate_limit_delay).await;

        let response = self
            .client
            .get(url.as_str())
            .send()
            .await
            .map_err(transport_error(self.request_timeout))?;
        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(transport_error(self.request_timeout))?;
        let result: SearchResult = serde_json::from_str(&body)?;

        self.cache.insert(key, result.clone()).await;
        Ok(result)
    }
}

fn cache_key(url: &str) -> String {
    format!("{:x}", Md5::digest(url.as_bytes()))
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("has_api_key", &self.has_api_key)
            .field("search_url", &self.search_url)
            .finish()
    }
}
