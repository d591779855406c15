use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use serde_json::Value;

use crate::config::Settings;
use crate::constants::GEO_JSON;
use crate::error::WeatherError;

/// Source of raw upstream payloads.
///
/// `endpoint` is either a path relative to the base URL or an absolute URL
/// previously handed out by the upstream itself.
#[async_trait]
pub trait WeatherApi: Send + Sync {
    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, WeatherError>;
}

/// HTTP client for api.weather.gov (or a compatible base URL)
#[derive(Debug, Clone)]
pub struct NwsClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl NwsClient {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GEO_JSON));

        let timeout = settings.upstream_timeout();
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .default_headers(headers)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: settings.base_url().to_string(),
            timeout,
        })
    }

    /// Joins relative paths onto the base URL. Absolute URLs are only followed
    /// when they point back under the base URL.
    fn resolve(&self, endpoint: &str) -> Result<String, WeatherError> {
        if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            let rest = endpoint.strip_prefix(self.base_url.as_str());
            return match rest {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => Ok(endpoint.to_string()),
                _ => Err(WeatherError::upstream(
                    None,
                    format!(
                        "resource reference {endpoint} is outside the configured API {}",
                        self.base_url
                    ),
                )),
            };
        }

        if endpoint.starts_with('/') {
            Ok(format!("{}{}", self.base_url, endpoint))
        } else {
            Ok(format!("{}/{}", self.base_url, endpoint))
        }
    }

    fn transport_error(&self, url: &str, err: reqwest::Error) -> WeatherError {
        if err.is_builder() {
            return WeatherError::internal(format!("could not build request for {url}: {err}"));
        }
        if err.is_timeout() {
            return WeatherError::upstream(
                None,
                format!("request to {url} timed out after {}s", self.timeout.as_secs()),
            );
        }
        WeatherError::upstream(
            err.status().map(|s| s.as_u16()),
            format!("request to {url} failed: {err}"),
        )
    }
}

#[async_trait]
impl WeatherApi for NwsClient {
    async fn fetch(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<Value, WeatherError> {
        let url = self.resolve(endpoint)?;
        tracing::debug!(%url, ?query, "Fetching upstream resource");

        let mut request = self.client.get(&url);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| self.transport_error(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WeatherError::upstream(
                Some(status.as_u16()),
                format!("{url} returned {status}: {}", problem_detail(&body)),
            ));
        }

        response.json::<Value>().await.map_err(|e| {
            if e.is_timeout() {
                self.transport_error(&url, e)
            } else {
                WeatherError::upstream(
                    Some(status.as_u16()),
                    format!("malformed JSON body from {url}: {e}"),
                )
            }
        })
    }
}

/// api.weather.gov answers errors with `application/problem+json`; prefer its
/// `detail` over the raw body.
fn problem_detail(body: &str) -> String {
    let detail = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v.get("detail")
            .or_else(|| v.get("title"))
            .and_then(Value::as_str)
            .map(str::to_string)
    });
    detail.unwrap_or_else(|| truncate_body(body))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 300;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= MAX {
        trimmed.to_string()
    } else {
        let prefix: String = trimmed.chars().take(MAX).collect();
        format!("{prefix}...")
    }
}
