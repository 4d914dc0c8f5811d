// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, bail};
use reqwest::StatusCode;
use reqwest::blocking::Client as HttpClient;
use serde_json::Value;
use std::time::Duration;
use suburb_app::{SearchFailure, SearchOutcome, SearchRequest, SearchResult};
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("cannot reach {endpoint} -- is the search server running? ({source})")]
    Connect {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{message}")]
    Status { status: StatusCode, message: String },
    #[error("decode search response: {0}")]
    Decode(#[source] reqwest::Error),
}

impl SearchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(status.as_u16()),
            Self::Connect { source, .. } | Self::Decode(source) => {
                source.status().map(|status| status.as_u16())
            }
        }
    }
}

impl From<SearchError> for SearchFailure {
    fn from(error: SearchError) -> Self {
        Self {
            status: error.status(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    endpoint: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            bail!("server.base_url must not be empty");
        }
        let parsed = Url::parse(&base_url)
            .with_context(|| format!("server.base_url {base_url:?} is not a valid URL"))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "server.base_url {base_url:?} must use http or https, got {}",
                parsed.scheme()
            );
        }
        if timeout.is_zero() {
            bail!("server.timeout must be positive");
        }

        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .context("build HTTP client")?;

        Ok(Self {
            endpoint: format!("{base_url}/search"),
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        debug!(search_id = %request.id, endpoint = %self.endpoint, "sending search");
        let response = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .map_err(|source| SearchError::Connect {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().unwrap_or_default();
            return Err(clean_error_response(status, &body));
        }

        response.json::<SearchResult>().map_err(SearchError::Decode)
    }

    /// Runs the search and folds any error into the failed branch.
    pub fn run(&self, request: &SearchRequest) -> SearchOutcome {
        match self.search(request) {
            Ok(result) => SearchOutcome::Resolved(result),
            Err(error) => SearchOutcome::Failed(error.into()),
        }
    }
}

fn clean_error_response(status: StatusCode, body: &str) -> SearchError {
    let trimmed = body.trim();
    let message = if let Ok(parsed) = serde_json::from_str::<Value>(trimmed)
        && let Some(error) = parsed.get("error").and_then(Value::as_str)
        && !error.is_empty()
    {
        format!("server error ({}): {error}", status.as_u16())
    } else if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        format!("server error ({}): {trimmed}", status.as_u16())
    } else {
        format!("server returned {}", status.as_u16())
    };
    SearchError::Status { status, message }
}

#[cfg(test)]
mod tests {
    use super::{Client, SearchError, clean_error_response};
    use reqwest::StatusCode;
    use std::time::Duration;
    use suburb_app::SearchFailure;

    #[test]
    fn new_trims_trailing_slashes_and_builds_endpoint() -> anyhow::Result<()> {
        let client = Client::new("http://localhost:8080///", Duration::from_secs(1))?;
        assert_eq!(client.base_url(), "http://localhost:8080");
        assert_eq!(client.endpoint(), "http://localhost:8080/search");
        Ok(())
    }

    #[test]
    fn new_rejects_empty_and_non_http_urls() {
        let empty = Client::new("", Duration::from_secs(1)).expect_err("empty url should fail");
        assert!(empty.to_string().contains("must not be empty"));

        let ftp = Client::new("ftp://example.com", Duration::from_secs(1))
            .expect_err("ftp url should fail");
        assert!(ftp.to_string().contains("http or https"));

        let garbage =
            Client::new("not a url", Duration::from_secs(1)).expect_err("garbage should fail");
        assert!(garbage.to_string().contains("not a valid URL"));
    }

    #[test]
    fn new_rejects_zero_timeout() {
        let error = Client::new("http://localhost:8080", Duration::ZERO)
            .expect_err("zero timeout should fail");
        assert!(error.to_string().contains("must be positive"));
    }

    #[test]
    fn error_response_prefers_json_error_field() {
        let error = clean_error_response(
            StatusCode::BAD_GATEWAY,
            r#"{"error":"scraper unavailable"}"#,
        );
        assert_eq!(error.to_string(), "server error (502): scraper unavailable");
        assert_eq!(error.status(), Some(502));
    }

    #[test]
    fn error_response_keeps_short_plain_bodies() {
        let error = clean_error_response(StatusCode::IM_A_TEAPOT, "Bad Request\n");
        assert_eq!(error.to_string(), "server error (418): Bad Request");
    }

    #[test]
    fn error_response_hides_long_or_structured_bodies() {
        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, "{\"trace\": 1}");
        assert_eq!(error.to_string(), "server returned 500");

        let long = "x".repeat(200);
        let error = clean_error_response(StatusCode::INTERNAL_SERVER_ERROR, &long);
        assert_eq!(error.to_string(), "server returned 500");
    }

    #[test]
    fn status_error_converts_to_failure() {
        let failure = SearchFailure::from(SearchError::Status {
            status: StatusCode::SERVICE_UNAVAILABLE,
            message: "server returned 503".to_owned(),
        });
        assert_eq!(failure.status, Some(503));
        assert_eq!(failure.message, "server returned 503");
    }
}
