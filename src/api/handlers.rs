use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::validation;
use crate::db::Database;
use crate::error::ApiError;
use crate::models::{CreateNoteInput, ListNotesBody, Note, NoteId, NoteResponse, UpdateNoteInput};

/// Resolve a raw path segment to a stored note.
///
/// A malformed id is indistinguishable from an unknown one: both are 404.
fn load_note(db: &Database, raw_id: &str) -> Result<Note, ApiError> {
    let id = NoteId::parse(raw_id).ok_or(ApiError::NotFound)?;
    db.get_note(&id)?.ok_or(ApiError::NotFound)
}

// ============================================================
// Liveness
// ============================================================

pub async fn status() -> &'static str {
    "OK"
}

// ============================================================
// Notes
// ============================================================

pub async fn list_notes(
    State(db): State<Database>,
    Json(body): Json<ListNotesBody>,
) -> Result<Json<Vec<NoteResponse>>, ApiError> {
    validation::list_notes(&body)?;
    let notes = db.list_notes(body.ip.as_deref())?;
    Ok(Json(notes.iter().map(Note::transform).collect()))
}

pub async fn create_note(
    State(db): State<Database>,
    Json(body): Json<CreateNoteInput>,
) -> Result<(StatusCode, Json<NoteResponse>), ApiError> {
    let input = validation::required_note_fields(body)?;
    let note = db.create_note(input).map_err(ApiError::map_duplicate)?;
    Ok((StatusCode::CREATED, Json(note.transform())))
}

pub async fn get_note(
    State(db): State<Database>,
    Path(note_id): Path<String>,
) -> Result<Json<NoteResponse>, ApiError> {
    let note = load_note(&db, &note_id)?;
    Ok(Json(note.transform()))
}

/// Full overwrite of the note at `note_id`, keeping its id and creation
/// timestamp, then a re-fetch of the stored record.
///
/// No route currently binds this handler; the upstream API documented
/// `PUT /notes/:noteId` without ever wiring it.
pub async fn replace_note(
    State(db): State<Database>,
    Path(note_id): Path<String>,
    Json(body): Json<CreateNoteInput>,
) -> Result<Json<NoteResponse>, ApiError> {
    let id = validation::note_id_param(&note_id)?;
    let input = validation::required_note_fields(body)?;
    let note = db
        .replace_note(&id, input)
        .map_err(ApiError::map_duplicate)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(note.transform()))
}

pub async fn update_note(
    State(db): State<Database>,
    Path(note_id): Path<String>,
    Json(body): Json<UpdateNoteInput>,
) -> Result<Json<NoteResponse>, ApiError> {
    let id = validation::note_id_param(&note_id)?;
    let note = db
        .update_note(&id, body)
        .map_err(ApiError::map_duplicate)?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(note.transform()))
}

pub async fn remove_note(
    State(db): State<Database>,
    Path(note_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let note = load_note(&db, &note_id)?;
    db.delete_note(&note.id)?;
    Ok(StatusCode::NO_CONTENT)
}
