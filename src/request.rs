use serde::Serialize;
use serde_json::Value as JsonValue;

use crate::{CantinhoError, Result};

/// HTTP method supported by the API.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Method {
    #[default]
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Put => reqwest::Method::PUT,
            Method::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Immutable description of one API call.
#[derive(Clone, Debug, PartialEq)]
pub struct ApiRequest {
    endpoint: String,
    method: Method,
    payload: Option<JsonValue>,
}

impl ApiRequest {
    /// Creates a request without a body.
    pub fn new(endpoint: impl Into<String>, method: Method) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            payload: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Method::Get)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(endpoint, Method::Delete)
    }

    /// Creates a `POST` request with `payload` as its JSON body.
    pub fn post<T: Serialize + ?Sized>(endpoint: impl Into<String>, payload: &T) -> Result<Self> {
        Self::with_payload(endpoint, Method::Post, payload)
    }

    /// Creates a `PUT` request with `payload` as its JSON body.
    pub fn put<T: Serialize + ?Sized>(endpoint: impl Into<String>, payload: &T) -> Result<Self> {
        Self::with_payload(endpoint, Method::Put, payload)
    }

    /// Creates a request carrying a JSON body.
    pub fn with_payload<T: Serialize + ?Sized>(
        endpoint: impl Into<String>,
        method: Method,
        payload: &T,
    ) -> Result<Self> {
        let payload = serde_json::to_value(payload).map_err(|err| {
            CantinhoError::InvalidInput(format!("payload is not JSON-serializable: {err}"))
        })?;
        Ok(Self {
            endpoint: endpoint.into(),
            method,
            payload: Some(payload),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn payload(&self) -> Option<&JsonValue> {
        self.payload.as_ref()
    }
}

/// Joins an endpoint path onto the base URL with exactly one `/`.
pub(crate) fn join_url(base_url: &str, endpoint: &str) -> Result<String> {
    let endpoint = endpoint.trim().trim_start_matches('/');
    if endpoint.is_empty() {
        return Err(CantinhoError::InvalidInput(
            "endpoint must not be empty".to_owned(),
        ));
    }
    Ok(format!("{}/{endpoint}", base_url.trim_end_matches('/')))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{join_url, ApiRequest, Method};
    use crate::CantinhoError;

    #[test]
    fn default_method_is_get() {
        assert_eq!(Method::default(), Method::Get);
        assert_eq!(ApiRequest::get("notas/1").method(), Method::Get);
        assert!(ApiRequest::get("notas/1").payload().is_none());
    }

    #[test]
    fn post_serializes_payload() {
        let request = ApiRequest::post("login", &json!({"code": "1234"})).unwrap();
        assert_eq!(request.method(), Method::Post);
        assert_eq!(request.payload(), Some(&json!({"code": "1234"})));
    }

    #[test]
    fn join_url_normalizes_slashes() {
        assert_eq!(
            join_url("http://127.0.0.1:8000/", "/lembretes/7").unwrap(),
            "http://127.0.0.1:8000/lembretes/7"
        );
        assert_eq!(
            join_url("http://127.0.0.1:8000", "notas").unwrap(),
            "http://127.0.0.1:8000/notas"
        );
    }

    #[test]
    fn join_url_rejects_empty_endpoint() {
        assert!(matches!(
            join_url("http://127.0.0.1:8000", " / "),
            Err(CantinhoError::InvalidInput(_))
        ));
    }
}
