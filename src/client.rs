use std::fmt;
use std::time::Duration;

use reqwest::{header, StatusCode};
use serde::de::DeserializeOwned;
use tokio::time::sleep;

use crate::{
    config::normalize_base_url, ApiRequest, Config, MgcError, Region, Result, RetryConfig,
};

const REQUEST_ID_HEADER: &str = "x-request-id";
const TRACE_ID_HEADER: &str = "x-mgc-trace-id";

/// A successful response, read into memory.
struct RawResponse {
    status: StatusCode,
    content_type: Option<String>,
    body: String,
}

#[derive(Clone)]
/// Shared HTTP client for every Magalu Cloud product.
///
/// Cloning is cheap: the underlying connection pool is shared.
pub struct CoreClient {
    http: reqwest::Client,
    config: Config,
}

impl fmt::Debug for CoreClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoreClient")
            .field("config", &self.config)
            .finish()
    }
}

impl CoreClient {
    /// Creates a client authenticated with an API key (`X-API-Key`).
    pub fn new(api_key: impl Into<String>) -> Self {
        let api_key = api_key.into();
        let client = Self::with_config(Config::default());
        if api_key.trim().is_empty() {
            return client;
        }
        client.with_api_key(api_key)
    }

    /// Creates a client from a fully built [`Config`].
    pub fn with_config(config: Config) -> Self {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            base_url = %config.base_url,
            user_agent = %config.user_agent,
            "creating new core client"
        );

        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `MGC_API_KEY`: API key (required)
    /// - `MGC_REGION`: `br-ne1`, `br-se1`, `br-mgl1` or `global` (optional)
    /// - `MGC_BASE_URL`: full base URL, wins over `MGC_REGION` (optional)
    ///
    /// # Example
    ///
    /// ```no_run
    /// use mgc_sdk::CoreClient;
    ///
    /// let core = CoreClient::from_env().expect("missing MGC_API_KEY");
    /// ```
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MGC_API_KEY")
            .map_err(|_| MgcError::Config("missing MGC_API_KEY environment variable".to_owned()))?;
        if api_key.trim().is_empty() {
            return Err(MgcError::Config("MGC_API_KEY is set but empty".to_owned()));
        }

        let mut client = Self::new(api_key);
        if let Ok(region) = std::env::var("MGC_REGION") {
            if !region.trim().is_empty() {
                client = client.with_region(region.parse()?);
            }
        }
        if let Ok(base_url) = std::env::var("MGC_BASE_URL") {
            if !base_url.trim().is_empty() {
                client = client.with_base_url(base_url);
            }
        }
        Ok(client)
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.api_key = Some(api_key.into());
        self
    }

    /// Authenticates with a JWT. A leading `Bearer ` is optional.
    pub fn with_jwt(mut self, token: impl AsRef<str>) -> Self {
        self.config.set_jwt(token.as_ref());
        self
    }

    pub fn with_region(self, region: Region) -> Self {
        self.with_base_url(region.url())
    }

    /// Points the client at a custom endpoint, e.g. a local mock server.
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> Self {
        self.config.base_url = normalize_base_url(base_url.as_ref());
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.config.user_agent = user_agent.into();
        self
    }

    /// Sets the deadline for a whole call, retries included. Zero disables it.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.config.retry = retry;
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.config.content_type = content_type.into();
        self
    }

    /// Adds a header sent with every request.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.set_header(name.into(), value.into());
        self
    }

    /// Tags every request from this client with `X-Request-ID`.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.config.request_id = Some(request_id.into());
        self
    }

    /// Uses a preconfigured `reqwest` client (proxies, TLS roots, pools).
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Sends a request and decodes the response body into `T`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.execute(&request).await?;
        decode_response(response)
    }

    /// Sends a request whose response body, if any, is ignored.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<()> {
        self.execute(&request).await.map(|_| ())
    }

    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse> {
        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = %request.method,
            path = %request.path,
            has_body = request.body.is_some(),
            "starting request execution"
        );

        let timeout = self.config.timeout;
        if timeout.is_zero() {
            return self.execute_with_retry(request).await;
        }

        tokio::time::timeout(timeout, self.execute_with_retry(request))
            .await
            .map_err(|_| MgcError::Timeout(timeout))?
    }

    async fn execute_with_retry(&self, request: &ApiRequest) -> Result<RawResponse> {
        let retry = &self.config.retry;
        let max_attempts = retry.attempts();
        let mut attempt = 0usize;

        loop {
            let error = match self.send_once(request, attempt).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            if !error.is_retryable() {
                return Err(error);
            }

            attempt += 1;
            if attempt >= max_attempts {
                return Err(MgcError::RetryExhausted {
                    attempts: max_attempts,
                    source: Box::new(error),
                });
            }

            self.wait_before_retry(attempt - 1, &error).await;
        }
    }

    async fn send_once(&self, request: &ApiRequest, attempt: usize) -> Result<RawResponse> {
        let url = format!("{}{}", self.config.base_url, request.path);

        #[cfg(feature = "tracing")]
        tracing::info!(method = %request.method, %url, attempt = attempt + 1, "making request");
        #[cfg(not(feature = "tracing"))]
        let _ = attempt;

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(self.request_headers(request)?);

        if !request.query.is_empty() {
            builder = builder.query(request.query.pairs());
        }
        if let Some(body) = &request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await.map_err(MgcError::Transport)?;
        log_correlation_headers(response.headers());

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let body = response.text().await.map_err(MgcError::Transport)?;

        if !status.is_success() {
            return Err(MgcError::Http {
                status: status.as_u16(),
                body,
            });
        }

        Ok(RawResponse {
            status,
            content_type,
            body,
        })
    }

    /// Built-in headers first, then client-wide custom headers, then the
    /// request's own. A later header replaces an earlier one of the same name.
    fn request_headers(&self, request: &ApiRequest) -> Result<header::HeaderMap> {
        let mut headers = header::HeaderMap::new();
        insert_header(&mut headers, header::USER_AGENT.as_str(), &self.config.user_agent)?;
        insert_header(&mut headers, header::CONTENT_TYPE.as_str(), &self.config.content_type)?;
        if let Some(api_key) = &self.config.api_key {
            insert_header(&mut headers, "x-api-key", api_key)?;
        }
        if let Some(authorization) = &self.config.authorization {
            insert_header(&mut headers, header::AUTHORIZATION.as_str(), authorization)?;
        }
        if let Some(request_id) = &self.config.request_id {
            insert_header(&mut headers, REQUEST_ID_HEADER, request_id)?;
        }
        for (name, value) in self.config.custom_headers.iter().chain(&request.headers) {
            insert_header(&mut headers, name, value)?;
        }
        Ok(headers)
    }

    /// Sleeps `retry.backoff(attempt)` before the next attempt.
    async fn wait_before_retry(&self, attempt: usize, error: &MgcError) {
        let delay = self.config.retry.backoff(attempt);

        #[cfg(feature = "tracing")]
        tracing::debug!(delay_ms = delay.as_millis() as u64, %error, "retrying request");
        #[cfg(not(feature = "tracing"))]
        let _ = error;

        sleep(delay).await;
    }
}

fn insert_header(headers: &mut header::HeaderMap, name: &str, value: &str) -> Result<()> {
    let name = header::HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| MgcError::Config(format!("invalid header name {name:?}")))?;
    let value = header::HeaderValue::from_str(value)
        .map_err(|_| MgcError::Config(format!("invalid value for header {name}")))?;
    headers.insert(name, value);
    Ok(())
}

fn log_correlation_headers(headers: &header::HeaderMap) {
    #[cfg(feature = "tracing")]
    {
        match headers.get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()) {
            Some(request_id) => tracing::info!(request_id, "X-Request-ID received in response"),
            None => tracing::debug!("X-Request-ID not found in response"),
        }
        match headers.get(TRACE_ID_HEADER).and_then(|v| v.to_str().ok()) {
            Some(trace_id) => tracing::info!(trace_id, "X-Mgc-Trace-Id received in response"),
            None => tracing::debug!("X-Mgc-Trace-Id not found in response"),
        }
    }
    #[cfg(not(feature = "tracing"))]
    let _ = (headers, TRACE_ID_HEADER);
}

fn is_yaml(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| {
        value.contains("application/x-yaml") || value.contains("application/yaml")
    })
}

fn decode_response<T: DeserializeOwned>(response: RawResponse) -> Result<T> {
    if response.status == StatusCode::NO_CONTENT {
        return Err(MgcError::Decode(
            "expected a response body, got 204 No Content".to_owned(),
        ));
    }
    if response.body.trim().is_empty() {
        return Err(MgcError::Decode("response body is empty".to_owned()));
    }

    if is_yaml(response.content_type.as_deref()) {
        let value: serde_yaml::Value = serde_yaml::from_str(&response.body)
            .map_err(|err| MgcError::Decode(format!("invalid YAML response: {err}")))?;
        if value.is_null() {
            return Err(MgcError::Decode("response body is null".to_owned()));
        }
        return serde_yaml::from_value(value).map_err(|err| {
            MgcError::Decode(format!("error decoding yaml response: {err}"))
        });
    }

    let value: serde_json::Value = serde_json::from_str(&response.body).map_err(|err| {
        MgcError::Decode(format!("invalid JSON response: {err}; body: {}", response.body))
    })?;
    if value.is_null() {
        return Err(MgcError::Decode("response body is null".to_owned()));
    }
    serde_json::from_value(value).map_err(|err| {
        MgcError::Decode(format!(
            "error decoding response: {err}; body: {}",
            response.body
        ))
    })
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde::Deserialize;

    use super::{decode_response, is_yaml, CoreClient, RawResponse};
    use crate::MgcError;

    #[derive(Debug, Deserialize)]
    struct Created {
        id: String,
    }

    fn raw(status: StatusCode, content_type: Option<&str>, body: &str) -> RawResponse {
        RawResponse {
            status,
            content_type: content_type.map(str::to_owned),
            body: body.to_owned(),
        }
    }

    #[test]
    fn decodes_json_by_default() {
        let created: Created = decode_response(raw(StatusCode::OK, None, r#"{"id":"vol-1"}"#))
            .expect("json must decode");
        assert_eq!(created.id, "vol-1");
    }

    #[test]
    fn decodes_yaml_when_content_type_says_so() {
        let created: Created = decode_response(raw(
            StatusCode::OK,
            Some("application/x-yaml; charset=utf-8"),
            "id: cluster-1\n",
        ))
        .expect("yaml must decode");
        assert_eq!(created.id, "cluster-1");
        assert!(is_yaml(Some("application/yaml")));
        assert!(!is_yaml(Some("application/json")));
    }

    #[test]
    fn null_and_empty_bodies_are_rejected() {
        for (status, body) in [
            (StatusCode::OK, "null"),
            (StatusCode::OK, "   "),
            (StatusCode::NO_CONTENT, ""),
        ] {
            let err = decode_response::<Created>(raw(status, None, body))
                .expect_err("body must be rejected");
            assert!(matches!(err, MgcError::Decode(_)), "unexpected {err:?}");
        }
    }

    #[test]
    fn debug_redacts_credentials() {
        let client = CoreClient::new("secret-key").with_jwt("secret-token");
        let debug = format!("{client:?}");
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("secret-key"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn base_url_and_region_are_applied() {
        let client = CoreClient::new("key").with_base_url("http://127.0.0.1:9000/");
        assert_eq!(client.config().base_url, "http://127.0.0.1:9000");
        let client = client.with_region(crate::Region::BrNe1);
        assert_eq!(client.config().base_url, "https://api.magalu.cloud/br-ne1");
    }
}
