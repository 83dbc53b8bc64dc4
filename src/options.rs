/// Base URL of the development backend.
pub const LOCAL_API_URL: &str = "http://127.0.0.1:8000";

/// Base URL of the hosted backend.
pub const HOSTED_API_URL: &str = "https://cantinho-da-memoria-backend.onrender.com";

/// Configures timeout and retry behavior.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClientOptions {
    /// Per-attempt timeout in milliseconds. `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    /// Total number of attempts, the first one included.
    pub max_attempts: u32,
    /// Delay before the first retry; doubled for every retry after it.
    pub initial_backoff_ms: u64,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: None,
            max_attempts: 3,
            initial_backoff_ms: 1_000,
        }
    }
}

/// Backend the client talks to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ApiEnvironment {
    /// Backend running on the developer's machine.
    Local,
    /// Production backend.
    Hosted,
}

impl ApiEnvironment {
    /// Selects the backend from the host name the front end is served from.
    ///
    /// Only `localhost` maps to [`ApiEnvironment::Local`].
    pub fn from_host(host: &str) -> Self {
        if host.trim() == "localhost" {
            Self::Local
        } else {
            Self::Hosted
        }
    }

    pub fn base_url(self) -> &'static str {
        match self {
            Self::Local => LOCAL_API_URL,
            Self::Hosted => HOSTED_API_URL,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ApiEnvironment, ClientOptions, HOSTED_API_URL, LOCAL_API_URL};

    #[test]
    fn defaults_match_three_attempts_starting_at_one_second() {
        let opts = ClientOptions::default();
        assert_eq!(opts.max_attempts, 3);
        assert_eq!(opts.initial_backoff_ms, 1_000);
        assert_eq!(opts.timeout_ms, None);
    }

    #[test]
    fn only_localhost_selects_local_backend() {
        assert_eq!(ApiEnvironment::from_host("localhost"), ApiEnvironment::Local);
        assert_eq!(ApiEnvironment::from_host("127.0.0.1"), ApiEnvironment::Hosted);
        assert_eq!(
            ApiEnvironment::from_host("cantinho.example.org"),
            ApiEnvironment::Hosted
        );
        assert_eq!(ApiEnvironment::Local.base_url(), LOCAL_API_URL);
        assert_eq!(ApiEnvironment::Hosted.base_url(), HOSTED_API_URL);
    }
}
