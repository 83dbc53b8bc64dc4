use std::fmt;
use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

use crate::{
    backoff::RetryState,
    request::join_url,
    wire::ErrorBody,
    ApiEnvironment, ApiRequest, CantinhoError, ClientOptions, Result,
};

#[derive(Clone)]
/// HTTP client for the Cantinho da Memória API with bounded retries.
pub struct CantinhoClient {
    http: reqwest::Client,
    base_url: String,
    options: ClientOptions,
}

impl fmt::Debug for CantinhoClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CantinhoClient")
            .field("base_url", &self.base_url)
            .field("options", &self.options)
            .finish()
    }
}

impl CantinhoClient {
    /// Creates a client for an explicit base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            options: ClientOptions::default(),
        }
    }

    pub fn for_environment(environment: ApiEnvironment) -> Self {
        Self::new(environment.base_url())
    }

    /// Creates a client whose backend is chosen from the serving host name.
    ///
    /// `localhost` talks to the local backend; any other host talks to the
    /// hosted one.
    ///
    /// # Example
    ///
    /// ```
    /// use cantinho_client::{CantinhoClient, LOCAL_API_URL};
    ///
    /// let client = CantinhoClient::for_host("localhost");
    /// assert_eq!(client.base_url(), LOCAL_API_URL);
    /// ```
    pub fn for_host(host: &str) -> Self {
        Self::for_environment(ApiEnvironment::from_host(host))
    }

    /// Creates a client from environment variables.
    ///
    /// Reads:
    /// - `CANTINHO_API_URL` — explicit base URL, takes precedence
    /// - `CANTINHO_HOST` — host name used for backend selection
    ///
    /// Falls back to the hosted backend when neither is set. A variable that
    /// is set but empty is an error.
    ///
    /// **Not available on `wasm32` targets** — use [`CantinhoClient::for_host`]
    /// with the page's host name instead.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_env() -> std::result::Result<Self, String> {
        if let Ok(url) = std::env::var("CANTINHO_API_URL") {
            if url.trim().is_empty() {
                return Err("CANTINHO_API_URL is set but empty".to_owned());
            }
            return Ok(Self::new(url.trim()));
        }
        if let Ok(host) = std::env::var("CANTINHO_HOST") {
            if host.trim().is_empty() {
                return Err("CANTINHO_HOST is set but empty".to_owned());
            }
            return Ok(Self::for_host(&host));
        }
        Ok(Self::for_environment(ApiEnvironment::Hosted))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// Sends a request and returns the parsed JSON body.
    ///
    /// Server errors (5xx) and transient network failures are retried with
    /// exponential backoff; client errors (4xx) fail on the first response.
    pub async fn request(&self, request: &ApiRequest) -> Result<JsonValue> {
        let url = join_url(&self.base_url, request.endpoint())?;
        let method: reqwest::Method = request.method().into();
        self.send_with_retry(request.endpoint(), || {
            let builder = self.http.request(method.clone(), &url);
            Ok(match request.payload() {
                Some(payload) => builder.json(payload),
                None => builder,
            })
        })
        .await
    }

    /// Sends a request and deserializes the JSON body into `T`.
    pub async fn request_as<T: DeserializeOwned>(&self, request: &ApiRequest) -> Result<T> {
        let value = self.request(request).await?;
        serde_json::from_value(value).map_err(|err| {
            CantinhoError::Decode(format!(
                "unexpected response shape for {}: {err}",
                request.endpoint()
            ))
        })
    }

    /// Posts a multipart form with the same retry policy as [`Self::request`].
    ///
    /// Forms are consumed by sending, so `build_form` runs once per attempt.
    pub async fn send_multipart<F>(&self, endpoint: &str, build_form: F) -> Result<JsonValue>
    where
        F: Fn() -> Result<reqwest::multipart::Form>,
    {
        let url = join_url(&self.base_url, endpoint)?;
        self.send_with_retry(endpoint, || {
            Ok(self.http.post(&url).multipart(build_form()?))
        })
        .await
    }

    async fn send_with_retry<F>(&self, endpoint: &str, build: F) -> Result<JsonValue>
    where
        F: Fn() -> Result<reqwest::RequestBuilder>,
    {
        let mut retry = RetryState::new(
            self.options.max_attempts,
            Duration::from_millis(self.options.initial_backoff_ms),
        );

        while retry.has_remaining() {
            let mut builder = build()?;
            if let Some(timeout_ms) = self.options.timeout_ms {
                builder = builder.timeout(Duration::from_millis(timeout_ms));
            }

            match Self::attempt(builder).await {
                Ok((status, body)) if status.is_success() => {
                    return serde_json::from_str::<JsonValue>(&body).map_err(|err| {
                        CantinhoError::Decode(format!(
                            "invalid JSON response from {endpoint}: {err}; body: {}",
                            body_excerpt(&body)
                        ))
                    });
                }
                Ok((status, body)) => {
                    let detail = error_detail(status, &body);
                    if status.is_client_error() {
                        return Err(CantinhoError::Rejected {
                            status: status.as_u16(),
                            detail,
                        });
                    }
                    if retry.is_last() {
                        return Err(CantinhoError::Server {
                            status: status.as_u16(),
                            detail,
                        });
                    }

                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        endpoint,
                        attempt = retry.attempt() + 1,
                        status = status.as_u16(),
                        "request failed with server error, retrying"
                    );
                }
                Err(err) => {
                    if retry.is_last() || !err.is_transient() {
                        return Err(CantinhoError::Transport(err.into_inner()));
                    }

                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        endpoint,
                        attempt = retry.attempt() + 1,
                        error = %err,
                        "request failed with network error, retrying"
                    );
                }
            }

            let delay = retry.advance();
            wait_before_retry(delay).await;
        }

        Err(CantinhoError::ExhaustedRetries {
            attempts: retry.attempt(),
        })
    }

    async fn attempt(
        builder: reqwest::RequestBuilder,
    ) -> std::result::Result<(StatusCode, String), AttemptError> {
        let response = builder.send().await.map_err(AttemptError::Send)?;
        let status = response.status();
        let body = response.text().await.map_err(AttemptError::Body)?;
        Ok((status, body))
    }
}

/// Where a single attempt failed before a full response was read.
///
/// reqwest reports a connection dropped mid-body as a decode error, so the
/// body read is kept apart from sending to classify it as transient.
#[derive(Debug)]
enum AttemptError {
    Send(reqwest::Error),
    Body(reqwest::Error),
}

impl AttemptError {
    fn is_transient(&self) -> bool {
        match self {
            Self::Send(err) => should_retry_transport(err),
            Self::Body(_) => true,
        }
    }

    fn into_inner(self) -> reqwest::Error {
        match self {
            Self::Send(err) | Self::Body(err) => err,
        }
    }
}

impl fmt::Display for AttemptError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Send(err) => write!(f, "{err}"),
            Self::Body(err) => write!(f, "response body interrupted: {err}"),
        }
    }
}

/// Builds the caller-facing message for a non-success response.
fn error_detail(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|parsed| parsed.message())
        .unwrap_or_else(|| format!("unknown API error (status {})", status.as_u16()))
}

/// Longest slice of a response body quoted in error messages.
const BODY_EXCERPT_CHARS: usize = 200;

fn body_excerpt(body: &str) -> String {
    match body.char_indices().nth(BODY_EXCERPT_CHARS) {
        Some((cut, _)) => format!("{}…", &body[..cut]),
        None => body.to_owned(),
    }
}

fn should_retry_transport(err: &reqwest::Error) -> bool {
    err.is_timeout()
        || err.is_request()
        || err.is_body()
        // is_connect() is not available on wasm32 targets (no TCP)
        || {
            #[cfg(not(target_arch = "wasm32"))]
            { err.is_connect() }
            #[cfg(target_arch = "wasm32")]
            { false }
        }
}

#[cfg(not(target_arch = "wasm32"))]
async fn wait_before_retry(delay: Duration) {
    #[cfg(feature = "tracing")]
    tracing::debug!("waiting {} ms before next attempt", delay.as_millis());

    tokio::time::sleep(delay).await;
}

/// Browser runtimes have no tokio timer; the wait is a `setTimeout` promise.
#[cfg(target_arch = "wasm32")]
async fn wait_before_retry(delay: Duration) {
    use wasm_bindgen::JsCast;

    let millis = delay.as_millis().min(i32::MAX as u128) as i32;
    let promise = js_sys::Promise::new(&mut |resolve, _reject| {
        let global = js_sys::global();
        let set_timeout = js_sys::Reflect::get(&global, &"setTimeout".into())
            .ok()
            .and_then(|value| value.dyn_into::<js_sys::Function>().ok());
        match set_timeout {
            Some(set_timeout) => {
                let _ = set_timeout.call2(&global, &resolve, &millis.into());
            }
            None => {
                let _ = resolve.call0(&wasm_bindgen::JsValue::UNDEFINED);
            }
        }
    });
    let _ = wasm_bindgen_futures::JsFuture::from(promise).await;
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::{body_excerpt, error_detail, CantinhoClient, BODY_EXCERPT_CHARS};
    use crate::{ApiEnvironment, ClientOptions, HOSTED_API_URL};

    #[test]
    fn error_detail_prefers_server_message() {
        assert_eq!(
            error_detail(StatusCode::NOT_FOUND, r#"{"detail":"not found"}"#),
            "not found"
        );
    }

    #[test]
    fn error_detail_falls_back_for_missing_or_invalid_body() {
        assert_eq!(
            error_detail(StatusCode::SERVICE_UNAVAILABLE, ""),
            "unknown API error (status 503)"
        );
        assert_eq!(
            error_detail(StatusCode::BAD_GATEWAY, "<html>Bad Gateway</html>"),
            "unknown API error (status 502)"
        );
        assert_eq!(
            error_detail(StatusCode::BAD_REQUEST, r#"{"error":"x"}"#),
            "unknown API error (status 400)"
        );
    }

    #[test]
    fn body_excerpt_keeps_short_bodies_whole() {
        assert_eq!(body_excerpt("<html>oops</html>"), "<html>oops</html>");
    }

    #[test]
    fn body_excerpt_cuts_long_bodies_on_char_boundary() {
        let body = "ã".repeat(BODY_EXCERPT_CHARS + 50);
        let excerpt = body_excerpt(&body);
        assert_eq!(excerpt.chars().count(), BODY_EXCERPT_CHARS + 1);
        assert!(excerpt.ends_with('…'));
        assert!(excerpt.starts_with("ããã"));
    }

    #[test]
    fn with_options_replaces_defaults() {
        let client = CantinhoClient::for_environment(ApiEnvironment::Hosted).with_options(
            ClientOptions {
                timeout_ms: Some(500),
                max_attempts: 5,
                initial_backoff_ms: 10,
            },
        );
        assert_eq!(client.base_url(), HOSTED_API_URL);
        assert_eq!(client.options().max_attempts, 5);
        assert!(format!("{client:?}").contains(HOSTED_API_URL));
    }
}
