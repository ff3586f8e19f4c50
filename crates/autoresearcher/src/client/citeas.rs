//! CiteAs citation metadata client.

use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest_middleware::ClientWithMiddleware;

use super::{build_http_client, transport_error};
use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::services::CitationMetadataService;

/// Citation metadata service backed by the CiteAs API.
#[derive(Clone)]
pub struct CiteAsClient {
    client: ClientWithMiddleware,
    base_url: String,
    email: String,
    request_timeout: Duration,
}

impl CiteAsClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns error if no contact email is configured (the service requires one)
    /// or the HTTP client cannot be built.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let Some(email) = config.contact_email.clone() else {
            anyhow::bail!("EMAIL is not set; CiteAs requires a contact address");
        };

        Ok(Self {
            client: build_http_client(config, HeaderMap::new())?,
            base_url: config.citeas_api_url.clone(),
            email,
            request_timeout: config.request_timeout,
        })
    }
}

#[async_trait::async_trait]
impl CitationMetadataService for CiteAsClient {
    async fn lookup(&self, doi: &str) -> ClientResult<String> {
        let url = product_url(&self.base_url, doi)?;

        let response = self
            .client
            .get(url)
            .query(&[("email", &self.email)])
            .send()
            .await
            .map_err(transport_error(self.request_timeout))?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(doi, status = status.as_u16(), "Citation lookup returned non-success");
        }

        response.text().await.map_err(transport_error(self.request_timeout))
    }
}

/// `{base}/product/{doi}` with each DOI segment percent-encoded.
///
/// DOIs may contain `#`, `?` or `%` (SICI DOIs end in `#`); `/` is kept as a
/// path separator.
fn product_url(base_url: &str, doi: &str) -> ClientResult<url::Url> {
    let mut url = url::Url::parse(base_url)
        .map_err(|e| ClientError::bad_request(format!("invalid CiteAs URL: {e}")))?;
    url.path_segments_mut()
        .map_err(|()| ClientError::bad_request(format!("CiteAs URL has no path: {base_url}")))?
        .pop_if_empty()
        .push("product")
        .extend(doi.split('/'));
    Ok(url)
}

impl std::fmt::Debug for CiteAsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CiteAsClient").field("base_url", &self.base_url).finish()
    }
}
