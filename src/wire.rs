use serde::{Deserialize, Serialize};

/// Error body returned by the API for non-2xx responses.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// Extracts a human-readable message from the `detail` field.
    ///
    /// Validation failures carry a list of objects with a `msg` field; those
    /// messages are joined with `"; "`.
    pub fn message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::String(text) if !text.trim().is_empty() => Some(text.clone()),
            serde_json::Value::Array(items) => {
                let messages: Vec<&str> = items
                    .iter()
                    .filter_map(|item| item.get("msg").and_then(|msg| msg.as_str()))
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            _ => None,
        }
    }
}

/// Body of `POST login` and `POST register`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Credentials {
    /// Access code chosen at registration.
    pub code: String,
    /// Identifier of the security question.
    pub question_id: String,
    /// Answer to the security question.
    pub answer: String,
}

impl Credentials {
    pub fn new(
        code: impl Into<String>,
        question_id: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            question_id: question_id.into(),
            answer: answer.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Creation body: the session user followed by the draft fields.
#[derive(Debug, Serialize)]
pub struct NewRecord<'a, D> {
    pub user_id: &'a str,
    #[serde(flatten)]
    pub draft: &'a D,
}
