use crate::{
    wire::{AuthResponse, Credentials},
    ApiRequest, CantinhoClient, CantinhoError, Result, Session, SessionStore,
};

/// Fallback confirmation when the server's login response has no message.
const LOGIN_MESSAGE: &str = "Login bem-sucedido";

/// A successful login: the stored session and the server's confirmation.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LoginOutcome {
    pub session: Session,
    pub message: String,
}

/// Login, registration and logout against one session store.
#[derive(Debug)]
pub struct AuthView<S> {
    client: CantinhoClient,
    store: S,
}

impl<S: SessionStore> AuthView<S> {
    pub fn new(client: CantinhoClient, store: S) -> Self {
        Self { client, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Authenticates and stores the resulting session.
    ///
    /// The server's `user_id` is preferred; the access code is used when the
    /// response omits it. The server's message is returned for display.
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginOutcome> {
        validate(credentials)?;
        let request = ApiRequest::post("login", credentials)?;
        let response: AuthResponse = self.client.request_as(&request).await?;

        let user_id = response
            .user_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| credentials.code.trim().to_owned());
        let session = Session::new(user_id);
        self.store.save(&session)?;

        let message = response
            .message
            .filter(|message| !message.trim().is_empty())
            .unwrap_or_else(|| LOGIN_MESSAGE.to_owned());

        #[cfg(feature = "tracing")]
        tracing::debug!(user_id = session.user_id(), %message, "logged in");
        Ok(LoginOutcome { session, message })
    }

    /// Creates an account and returns the server's confirmation message.
    ///
    /// Registration does not log the user in.
    pub async fn register(&self, credentials: &Credentials) -> Result<String> {
        validate(credentials)?;
        let request = ApiRequest::post("register", credentials)?;
        let response: AuthResponse = self.client.request_as(&request).await?;
        Ok(response
            .message
            .unwrap_or_else(|| "Conta criada com sucesso!".to_owned()))
    }

    pub fn logout(&self) -> Result<()> {
        self.store.clear()
    }

    /// Session for a protected view, if someone is logged in.
    pub fn current_session(&self) -> Result<Session> {
        Session::require(&self.store)
    }
}

fn validate(credentials: &Credentials) -> Result<()> {
    let fields = [
        ("code", &credentials.code),
        ("question_id", &credentials.question_id),
        ("answer", &credentials.answer),
    ];
    for (name, value) in fields {
        if value.trim().is_empty() {
            return Err(CantinhoError::InvalidInput(format!("{name} must not be empty")));
        }
    }
    Ok(())
}
