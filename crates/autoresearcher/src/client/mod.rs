//! HTTP clients for the external services.
//!
//! All three clients share one transport setup:
//! - pooled reqwest connections with gzip
//! - retry middleware with exponential backoff, bounded by `Config::max_retries`
//! - explicit request and connect timeouts
//!
//! Semantic Scholar searches are additionally paced and cached.

mod citeas;
mod openai;
mod semantic_scholar;

pub use citeas::CiteAsClient;
pub use openai::OpenAiClient;
pub use semantic_scholar::SemanticScholarClient;

use std::time::Duration;

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, StatusCode};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};

use crate::config::{Config, api};
use crate::error::{ClientError, ClientResult};

/// Seconds to wait after a 429 that carries no usable `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Build a pooled HTTP client with retry middleware.
pub(crate) fn build_http_client(
    config: &Config,
    headers: HeaderMap,
) -> anyhow::Result<ClientWithMiddleware> {
    let client = Client::builder()
        .default_headers(headers)
        .timeout(config.request_timeout)
        .connect_timeout(config.connect_timeout)
        .pool_max_idle_per_host(api::MAX_KEEPALIVE)
        .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
        .gzip(true)
        .build()?;

    let backoff = ExponentialBackoff::builder()
        .retry_bounds(Duration::from_secs(1), Duration::from_secs(30))
        .build_with_max_retries(config.max_retries);

    Ok(ClientBuilder::new(client).with(RetryTransientMiddleware::new_with_policy(backoff)).build())
}

/// Map a failed send or body read, reporting timeouts as [`ClientError::Timeout`].
pub(crate) fn transport_error<E>(timeout: Duration) -> impl Fn(E) -> ClientError
where
    E: Into<reqwest_middleware::Error>,
{
    move |err| match err.into() {
        reqwest_middleware::Error::Reqwest(e) if e.is_timeout() => ClientError::Timeout(timeout),
        reqwest_middleware::Error::Reqwest(e) => ClientError::Http(e),
        other => ClientError::Middleware(other),
    }
}

/// Pass successful responses through; turn every other status into a [`ClientError`].
pub(crate) async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        return Err(ClientError::rate_limited(retry_after));
    }

    let body = response.text().await.unwrap_or_default();
    Err(status_error(status, body))
}

fn status_error(status: StatusCode, body: String) -> ClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ClientError::unauthorized(body),
        StatusCode::NOT_FOUND => ClientError::not_found(body),
        StatusCode::BAD_REQUEST => ClientError::bad_request(body),
        s if s.is_server_error() => ClientError::server(s.as_u16(), body),
        s => ClientError::UnexpectedStatus { status: s.as_u16(), message: body },
    }
}
