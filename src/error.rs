/// Error type returned by this crate.
#[derive(Debug, thiserror::Error)]
pub enum CantinhoError {
    /// Client error (HTTP 4xx) with the server-provided detail message.
    ///
    /// Never retried.
    #[error("{detail}")]
    Rejected { status: u16, detail: String },
    /// Server error (HTTP 5xx) still present on the final attempt.
    #[error("{detail}")]
    Server { status: u16, detail: String },
    /// Network or request execution error from `reqwest`.
    #[error("transport error: {0}")]
    Transport(reqwest::Error),
    /// Every attempt was consumed without a response to report.
    #[error("exceeded max retries ({attempts} attempts) for the request")]
    ExhaustedRetries { attempts: u32 },
    /// Response body is not the JSON shape that was expected.
    #[error("decode error: {0}")]
    Decode(String),
    /// Caller input rejected before any request was sent.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A protected view was opened without a stored session.
    #[error("you need to be logged in to access this page")]
    NotLoggedIn,
    /// Session persistence failure.
    #[error("session store error: {0}")]
    Session(String),
    /// The user already has the maximum number of memories.
    #[error("limit of {limit} memories reached; no more photos can be added")]
    MemoryLimitReached { limit: usize },
    /// The photo could not be decoded or re-encoded.
    #[error("photo processing error: {0}")]
    Photo(String),
    /// The photo is still too large after resizing.
    #[error("photo is too large after resizing ({size} bytes, limit {limit} bytes)")]
    PhotoTooLarge { size: usize, limit: usize },
}

impl CantinhoError {
    /// HTTP status attached to the failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } | Self::Server { status, .. } => Some(*status),
            Self::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Whether this failure class is transient (server side or network).
    ///
    /// The value is informational: by the time an error reaches the caller
    /// the client has already spent its retries.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Server { .. } | Self::Transport(_) | Self::ExhaustedRetries { .. }
        )
    }
}
