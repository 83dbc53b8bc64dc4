//! Memories page: multipart upload with an optional, resized photo.

use reqwest::multipart::{Form, Part};

use crate::{
    entity::{Card, Entity},
    list_view::{Feedback, ListState, ListView, ViewHandler},
    photo::{self, Photo},
    CantinhoClient, CantinhoError, Memory, Result, Session,
};

/// Maximum number of memories a user may keep.
pub const MEMORY_LIMIT: usize = 5;

/// Photo as picked by the user, before resizing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PhotoInput {
    pub bytes: Vec<u8>,
    pub file_name: String,
}

/// Data collected by the memory creation form.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemoryForm {
    pub title: String,
    pub date: String,
    pub description: String,
    pub photo: Option<PhotoInput>,
}

#[derive(Clone, Debug)]
pub struct MemoriesView {
    list: ListView<Memory>,
}

impl MemoriesView {
    pub fn new(client: CantinhoClient, session: Session) -> Self {
        Self {
            list: ListView::new(client, session),
        }
    }

    pub async fn load(&self) -> Result<ListState<Memory>> {
        self.list.load().await
    }

    /// Cards with the photo URL resolved against the client's base URL.
    pub async fn cards(&self) -> Result<Vec<Card>> {
        let base_url = self.list.client().base_url();
        let state = self.list.load().await?;
        Ok(state
            .items()
            .iter()
            .map(|memory| Card {
                image: Some(memory.image_source(base_url)),
                ..memory.card()
            })
            .collect())
    }

    /// Uploads a new memory unless the user already has [`MEMORY_LIMIT`].
    pub async fn submit(&self, form: &MemoryForm) -> Result<Memory> {
        let existing = self.list.load().await?;
        if existing.len() >= MEMORY_LIMIT {
            return Err(CantinhoError::MemoryLimitReached {
                limit: MEMORY_LIMIT,
            });
        }

        let photo = form
            .photo
            .as_ref()
            .map(|input| photo::prepare(&input.bytes, &input.file_name))
            .transpose()?;

        let user_id = self.list.session().user_id();
        let value = self
            .list
            .client()
            .send_multipart(Memory::COLLECTION, || {
                memory_form(user_id, form, photo.as_ref())
            })
            .await?;

        serde_json::from_value(value).map_err(|err| {
            CantinhoError::Decode(format!("unexpected memory response shape: {err}"))
        })
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        self.list.delete(id).await
    }
}

impl ViewHandler for MemoriesView {
    type Form = MemoryForm;

    async fn on_submit(&self, form: Self::Form) -> Result<Feedback> {
        self.submit(&form).await?;
        Ok(Feedback::success(Memory::CREATED_MESSAGE))
    }

    async fn on_delete_requested(&self, id: &str) -> Result<Feedback> {
        self.delete(id).await?;
        Ok(Feedback::success(Memory::DELETED_MESSAGE))
    }
}

fn memory_form(user_id: &str, form: &MemoryForm, photo: Option<&Photo>) -> Result<Form> {
    let mut multipart = Form::new()
        .text("user_id", user_id.to_owned())
        .text("titulo", form.title.clone())
        .text("data", form.date.clone())
        .text("descricao", form.description.clone());

    if let Some(photo) = photo {
        let part = Part::bytes(photo.bytes.clone())
            .file_name(photo.file_name.clone())
            .mime_str(photo.mime)
            .map_err(|err| CantinhoError::Photo(format!("invalid photo content type: {err}")))?;
        multipart = multipart.part("imagem", part);
    }

    Ok(multipart)
}
