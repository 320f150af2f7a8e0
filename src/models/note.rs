use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier of a persisted note: 24 lowercase hex characters, assigned by
/// the store on creation and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(String);

impl NoteId {
    /// Generate a fresh identifier from 12 random bytes.
    pub fn generate() -> Self {
        Self(hex::encode(&Uuid::new_v4().as_bytes()[..12]))
    }

    /// Parse a raw path segment. Anything that is not exactly 24 hex
    /// characters is rejected; uppercase input is normalized.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.len() == 24 && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
            Some(Self(raw.to_ascii_lowercase()))
        } else {
            None
        }
    }

    /// The all-zero identifier, used as a sentinel for unparseable stored
    /// ids.
    pub fn nil() -> Self {
        Self("0".repeat(24))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A persisted note.
///
/// `fingerprint` is stored verbatim as JSON and never inspected
/// field-by-field. `text` is unique across all notes; the store enforces
/// this with a unique index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    /// Originating client address, recorded at creation.
    pub ip: String,
    /// Opaque client-identifying metadata.
    pub fingerprint: Value,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// Produce the public view of this note.
    ///
    /// The output carries exactly `id`, `ip`, `fingerprint`, `text` and
    /// `createdAt`; `updated_at` is internal and never exposed.
    pub fn transform(&self) -> NoteResponse {
        NoteResponse {
            id: self.id.clone(),
            ip: self.ip.clone(),
            fingerprint: self.fingerprint.clone(),
            text: self.text.clone(),
            created_at: self.created_at,
        }
    }
}

/// Public representation of a note.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteResponse {
    pub id: NoteId,
    pub ip: String,
    pub fingerprint: Value,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

/// Fields of a note the client supplies on create or replace, after the
/// required-field check has run.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub ip: String,
    pub fingerprint: Value,
    pub text: String,
}

/// Raw create/replace body. All fields are optional at the deserialization
/// boundary so that missing ones surface as structured validation errors
/// instead of a body-rejection; see `api::validation::required_note_fields`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateNoteInput {
    pub ip: Option<String>,
    pub fingerprint: Option<Value>,
    pub text: Option<String>,
}

/// Input for partially updating a note. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateNoteInput {
    pub ip: Option<String>,
    pub fingerprint: Option<Value>,
    pub text: Option<String>,
}

/// Body of the list endpoint.
///
/// `page` and `per_page` are validated but the query does not apply them;
/// the upstream API documented pagination without ever implementing it and
/// that surface is kept as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListNotesBody {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub text: Option<String>,
    /// Exact-match filter; when absent, all notes are returned.
    pub ip: Option<String>,
}
