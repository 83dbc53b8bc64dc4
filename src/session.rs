//! Logged-in user context and its persistence.
//!
//! A [`Session`] is created by [`crate::AuthView::login`], handed to every
//! protected view, and removed by [`crate::AuthView::logout`].

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::{CantinhoError, Result};

/// Identity of the logged-in user.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Session {
    user_id: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
        }
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Welcome line shown at the top of protected pages.
    pub fn greeting(&self) -> String {
        format!("Olá, {}", self.user_id)
    }

    /// Loads the stored session, failing with [`CantinhoError::NotLoggedIn`]
    /// when there is none.
    pub fn require<S: SessionStore + ?Sized>(store: &S) -> Result<Self> {
        store.load()?.ok_or(CantinhoError::NotLoggedIn)
    }
}

/// Where the logged-in session is kept between page loads or runs.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    current: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> Result<std::sync::MutexGuard<'_, Option<Session>>> {
        self.current
            .lock()
            .map_err(|_| CantinhoError::Session("session mutex poisoned".to_owned()))
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        Ok(self.slot()?.clone())
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.slot()? = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.slot()? = None;
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file_store::FileSessionStore;

#[cfg(not(target_arch = "wasm32"))]
mod file_store {
    use std::{
        io::ErrorKind,
        path::{Path, PathBuf},
    };

    use super::{Session, SessionStore};
    use crate::{CantinhoError, Result};

    /// Session persisted as a JSON file.
    ///
    /// **Not available on `wasm32` targets.**
    #[derive(Clone, Debug)]
    pub struct FileSessionStore {
        path: PathBuf,
    }

    impl FileSessionStore {
        pub fn new(path: impl Into<PathBuf>) -> Self {
            Self { path: path.into() }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }
    }

    impl SessionStore for FileSessionStore {
        fn load(&self) -> Result<Option<Session>> {
            let content = match std::fs::read_to_string(&self.path) {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
                Err(err) => {
                    return Err(CantinhoError::Session(format!(
                        "could not read {}: {err}",
                        self.path.display()
                    )))
                }
            };
            let session: Session = serde_json::from_str(&content).map_err(|err| {
                CantinhoError::Session(format!("could not parse {}: {err}", self.path.display()))
            })?;
            if session.user_id().trim().is_empty() {
                return Ok(None);
            }
            Ok(Some(session))
        }

        fn save(&self, session: &Session) -> Result<()> {
            if let Some(parent) = self.path.parent() {
                std::fs::create_dir_all(parent).map_err(|err| {
                    CantinhoError::Session(format!("could not create {}: {err}", parent.display()))
                })?;
            }
            let content = serde_json::to_string(session)
                .map_err(|err| CantinhoError::Session(err.to_string()))?;
            std::fs::write(&self.path, content).map_err(|err| {
                CantinhoError::Session(format!("could not write {}: {err}", self.path.display()))
            })?;

            #[cfg(feature = "tracing")]
            tracing::debug!(path = %self.path.display(), "saved session");
            Ok(())
        }

        fn clear(&self) -> Result<()> {
            match std::fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(CantinhoError::Session(format!(
                    "could not remove {}: {err}",
                    self.path.display()
                ))),
            }
        }
    }
}
