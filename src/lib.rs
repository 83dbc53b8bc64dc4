//! `cantinho-client` is an async client for the Cantinho da Memória
//! personal-assistant API.
//!
//! The crate wraps the REST endpoints with:
//! - [`CantinhoClient::request`], a JSON request with bounded exponential-backoff retries
//! - [`AuthView`] for login, registration and logout
//! - [`ListView`] for reminders, medications, routines and notes
//! - [`MemoriesView`] for memories with resized photo upload

mod auth;
mod backoff;
mod client;
mod entity;
mod error;
mod list_view;
mod memories;
mod options;
mod request;
mod session;
mod wire;

pub mod photo;

pub use auth::{AuthView, LoginOutcome};
pub use backoff::RetryState;
pub use client::CantinhoClient;
pub use entity::{
    Card, Entity, JsonEntity, Medication, MedicationDraft, Memory, Note, NoteDraft, Reminder,
    ReminderDraft, Routine, RoutineDraft, PLACEHOLDER_IMAGE_URL,
};
pub use error::CantinhoError;
pub use list_view::{Feedback, FeedbackKind, ListState, ListView, ViewHandler};
pub use memories::{MemoriesView, MemoryForm, PhotoInput, MEMORY_LIMIT};
pub use options::{ApiEnvironment, ClientOptions, HOSTED_API_URL, LOCAL_API_URL};
pub use request::{ApiRequest, Method};
#[cfg(not(target_arch = "wasm32"))]
pub use session::FileSessionStore;
pub use session::{MemorySessionStore, Session, SessionStore};
pub use wire::Credentials;

pub type Result<T> = std::result::Result<T, CantinhoError>;
