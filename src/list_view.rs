//! Generic list page controller shared by every collection.

use std::marker::PhantomData;

use crate::{
    entity::{Card, Entity, JsonEntity},
    wire::NewRecord,
    ApiRequest, CantinhoClient, CantinhoError, Result, Session,
};

/// Whether a [`Feedback`] reports success or failure.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum FeedbackKind {
    Success,
    Error,
}

/// User-facing message produced by a view action.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
        }
    }

    pub fn from_error(err: &CantinhoError) -> Self {
        Self::error(err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.kind == FeedbackKind::Error
    }
}

/// Loaded contents of a list page.
#[derive(Clone, Debug, PartialEq)]
pub enum ListState<E> {
    /// No records; carries the message to show instead of the list.
    Empty { message: &'static str },
    Items(Vec<E>),
}

impl<E: Entity> ListState<E> {
    fn from_items(items: Vec<E>) -> Self {
        if items.is_empty() {
            Self::Empty {
                message: E::EMPTY_MESSAGE,
            }
        } else {
            Self::Items(items)
        }
    }

    pub fn items(&self) -> &[E] {
        match self {
            Self::Empty { .. } => &[],
            Self::Items(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn cards(&self) -> Vec<Card> {
        self.items().iter().map(Entity::card).collect()
    }
}

/// Event interface between a UI toolkit and a page controller.
#[allow(async_fn_in_trait)]
pub trait ViewHandler {
    /// Data collected by the page's creation form.
    type Form;

    async fn on_submit(&self, form: Self::Form) -> Result<Feedback>;

    async fn on_delete_requested(&self, id: &str) -> Result<Feedback>;
}

/// Controller for the list page of entity type `E`, bound to one session.
#[derive(Clone, Debug)]
pub struct ListView<E> {
    client: CantinhoClient,
    session: Session,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> ListView<E> {
    pub fn new(client: CantinhoClient, session: Session) -> Self {
        Self {
            client,
            session,
            _entity: PhantomData,
        }
    }

    pub fn client(&self) -> &CantinhoClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Fetches every record of the session user.
    pub async fn load(&self) -> Result<ListState<E>> {
        let endpoint = format!("{}/{}", E::COLLECTION, self.session.user_id());
        let items: Vec<E> = self.client.request_as(&ApiRequest::get(endpoint)).await?;
        Ok(ListState::from_items(items))
    }

    pub async fn cards(&self) -> Result<Vec<Card>> {
        Ok(self.load().await?.cards())
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        let id = id.trim();
        if id.is_empty() {
            return Err(CantinhoError::InvalidInput(
                "record id must not be empty".to_owned(),
            ));
        }
        self.client
            .request(&ApiRequest::delete(format!("{}/{id}", E::COLLECTION)))
            .await?;
        Ok(())
    }
}

impl<E: JsonEntity> ListView<E> {
    /// Creates a record owned by the session user and returns it as stored.
    pub async fn submit(&self, draft: &E::Draft) -> Result<E> {
        let record = NewRecord {
            user_id: self.session.user_id(),
            draft,
        };
        let request = ApiRequest::post(E::COLLECTION, &record)?;
        self.client.request_as(&request).await
    }
}

impl<E: JsonEntity> ViewHandler for ListView<E> {
    type Form = E::Draft;

    async fn on_submit(&self, form: Self::Form) -> Result<Feedback> {
        self.submit(&form).await?;
        Ok(Feedback::success(E::CREATED_MESSAGE))
    }

    async fn on_delete_requested(&self, id: &str) -> Result<Feedback> {
        self.delete(id).await?;
        Ok(Feedback::success(E::DELETED_MESSAGE))
    }
}
