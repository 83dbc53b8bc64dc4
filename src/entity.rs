//! Records managed by the API and the cards they render to.
//!
//! Field names on the wire follow the backend (Portuguese); the Rust side
//! uses English names.

use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Placeholder shown for memories without a photo.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://placehold.co/100x100?text=Sem+Imagem";

/// Toolkit-independent rendering of one record.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Card {
    /// Record id, passed back on delete.
    pub id: String,
    pub title: String,
    /// Secondary lines, in display order.
    pub lines: Vec<String>,
    /// Image URL, only set for memories.
    pub image: Option<String>,
}

/// A record type stored in one API collection.
pub trait Entity: DeserializeOwned + Clone + Send + Sync + 'static {
    /// Collection path segment, e.g. `lembretes`.
    const COLLECTION: &'static str;
    /// Shown when the user has no records of this type.
    const EMPTY_MESSAGE: &'static str;
    const CREATED_MESSAGE: &'static str;
    const DELETED_MESSAGE: &'static str;

    fn id(&self) -> &str;

    fn card(&self) -> Card;
}

/// An entity created by posting its draft as JSON.
pub trait JsonEntity: Entity {
    type Draft: Serialize + Send + Sync;
}

/// Reminder (`lembrete`).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Reminder {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "tarefa")]
    pub task: String,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "repeticao")]
    pub repetition: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ReminderDraft {
    #[serde(rename = "tarefa")]
    pub task: String,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "hora")]
    pub time: String,
    #[serde(rename = "repeticao")]
    pub repetition: String,
}

impl Entity for Reminder {
    const COLLECTION: &'static str = "lembretes";
    const EMPTY_MESSAGE: &'static str = "Nenhum lembrete encontrado. Crie um novo!";
    const CREATED_MESSAGE: &'static str = "Lembrete adicionado com sucesso!";
    const DELETED_MESSAGE: &'static str = "Lembrete excluído com sucesso!";

    fn id(&self) -> &str {
        &self.id
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.task.clone(),
            lines: vec![format!("{} às {} ({})", self.date, self.time, self.repetition)],
            image: None,
        }
    }
}

impl JsonEntity for Reminder {
    type Draft = ReminderDraft;
}

/// Medication (`medicamento`).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Medication {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dosagem")]
    pub dosage: String,
    #[serde(rename = "horario")]
    pub time: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct MedicationDraft {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dosagem")]
    pub dosage: String,
    #[serde(rename = "horario")]
    pub time: String,
}

impl Entity for Medication {
    const COLLECTION: &'static str = "medicamentos";
    const EMPTY_MESSAGE: &'static str = "Nenhum medicamento encontrado. Crie um novo!";
    const CREATED_MESSAGE: &'static str = "Medicamento adicionado com sucesso!";
    const DELETED_MESSAGE: &'static str = "Medicamento excluído com sucesso!";

    fn id(&self) -> &str {
        &self.id
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.name.clone(),
            lines: vec![format!("{} às {}", self.dosage, self.time)],
            image: None,
        }
    }
}

impl JsonEntity for Medication {
    type Draft = MedicationDraft;
}

/// Routine (`rotina`).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Routine {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "tarefa")]
    pub task: String,
    #[serde(rename = "horario")]
    pub time: String,
    #[serde(rename = "repeticao")]
    pub repetition: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct RoutineDraft {
    #[serde(rename = "tarefa")]
    pub task: String,
    #[serde(rename = "horario")]
    pub time: String,
    #[serde(rename = "repeticao")]
    pub repetition: String,
}

impl Entity for Routine {
    const COLLECTION: &'static str = "rotinas";
    const EMPTY_MESSAGE: &'static str = "Nenhuma rotina encontrada. Crie uma nova!";
    const CREATED_MESSAGE: &'static str = "Rotina adicionada com sucesso!";
    const DELETED_MESSAGE: &'static str = "Rotina excluída com sucesso!";

    fn id(&self) -> &str {
        &self.id
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.task.clone(),
            lines: vec![self.time.clone(), format!("({})", self.repetition)],
            image: None,
        }
    }
}

impl JsonEntity for Routine {
    type Draft = RoutineDraft;
}

/// Note (`nota`).
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "conteudo")]
    pub content: String,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct NoteDraft {
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "conteudo")]
    pub content: String,
}

impl Entity for Note {
    const COLLECTION: &'static str = "notas";
    const EMPTY_MESSAGE: &'static str = "Nenhuma nota encontrada. Crie uma nova!";
    const CREATED_MESSAGE: &'static str = "Nota adicionada com sucesso!";
    const DELETED_MESSAGE: &'static str = "Nota excluída com sucesso!";

    fn id(&self) -> &str {
        &self.id
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            lines: vec![self.content.clone()],
            image: None,
        }
    }
}

impl JsonEntity for Note {
    type Draft = NoteDraft;
}

/// Memory (`memoria`), optionally with a photo.
///
/// Created through [`crate::MemoriesView`] as multipart, so it has no
/// [`JsonEntity`] impl.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize)]
pub struct Memory {
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "data")]
    pub date: String,
    #[serde(rename = "descricao")]
    pub description: String,
    #[serde(rename = "imagem_url", default)]
    pub image_url: Option<String>,
}

impl Memory {
    /// URL to display for the memory's photo.
    ///
    /// Inline `data:` URLs are used as-is, relative paths are resolved
    /// against `base_url`, and a missing photo yields the placeholder.
    pub fn image_source(&self, base_url: &str) -> String {
        match self.image_url.as_deref().map(str::trim) {
            Some(url) if url.starts_with("data:") => url.to_owned(),
            Some(url) if url.starts_with("http://") || url.starts_with("https://") => {
                url.to_owned()
            }
            Some(url) if !url.is_empty() => format!(
                "{}/{}",
                base_url.trim_end_matches('/'),
                url.trim_start_matches('/')
            ),
            _ => PLACEHOLDER_IMAGE_URL.to_owned(),
        }
    }
}

impl Entity for Memory {
    const COLLECTION: &'static str = "memorias";
    const EMPTY_MESSAGE: &'static str = "Nenhuma memória encontrada. Crie uma nova!";
    const CREATED_MESSAGE: &'static str = "Memória adicionada com sucesso!";
    const DELETED_MESSAGE: &'static str = "Memória excluída com sucesso!";

    fn id(&self) -> &str {
        &self.id
    }

    fn card(&self) -> Card {
        Card {
            id: self.id.clone(),
            title: self.title.clone(),
            lines: vec![self.date.clone(), self.description.clone()],
            image: None,
        }
    }
}
