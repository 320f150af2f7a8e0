//! Per-route input rules, applied before the handler body runs.
//!
//! Failures short-circuit with a 400 and a structured list of
//! `{field, location, messages}` entries; they never reach the store.

use crate::error::{ApiError, FieldError};
use crate::models::{CreateNoteInput, ListNotesBody, NewNote, NoteId};

/// Rules for `POST /notes/all`: `page` at least 1, `perPage` within
/// [1, 100]. Both are optional and, when valid, currently unused by the
/// query itself.
pub fn list_notes(body: &ListNotesBody) -> Result<(), ApiError> {
    let mut errors = Vec::new();

    if let Some(page) = body.page {
        if page < 1 {
            errors.push(FieldError::new(
                "page",
                "body",
                "\"page\" must be greater than or equal to 1",
            ));
        }
    }

    if let Some(per_page) = body.per_page {
        if !(1..=100).contains(&per_page) {
            errors.push(FieldError::new(
                "perPage",
                "body",
                "\"perPage\" must be between 1 and 100",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

/// Rule for the `noteId` path parameter on PATCH (and replace): must match
/// 24 hex characters. GET and DELETE skip this on purpose; a malformed id
/// there falls through to the load step and yields 404.
pub fn note_id_param(raw: &str) -> Result<NoteId, ApiError> {
    NoteId::parse(raw).ok_or_else(|| {
        ApiError::Validation(vec![FieldError::new(
            "noteId",
            "params",
            "\"noteId\" must match /^[a-fA-F0-9]{24}$/",
        )])
    })
}

/// Entity-level required check for create and replace: `ip`, `fingerprint`
/// and `text` must all be present on a persisted note. The route-level
/// rules are deliberately looser (`text` alone, optional); this boundary
/// check is what actually enforces the schema.
pub fn required_note_fields(input: CreateNoteInput) -> Result<NewNote, ApiError> {
    match (input.ip, input.fingerprint, input.text) {
        (Some(ip), Some(fingerprint), Some(text)) => Ok(NewNote {
            ip,
            fingerprint,
            text,
        }),
        (ip, fingerprint, text) => {
            let mut errors = Vec::new();
            if ip.is_none() {
                errors.push(FieldError::new("ip", "body", "\"ip\" is required"));
            }
            if fingerprint.is_none() {
                errors.push(FieldError::new(
                    "fingerprint",
                    "body",
                    "\"fingerprint\" is required",
                ));
            }
            if text.is_none() {
                errors.push(FieldError::new("text", "body", "\"text\" is required"));
            }
            Err(ApiError::Validation(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_accepts_absent_pagination() {
        assert!(list_notes(&ListNotesBody::default()).is_ok());
    }

    #[test]
    fn list_accepts_in_range_pagination() {
        let body = ListNotesBody {
            page: Some(1),
            per_page: Some(100),
            ..Default::default()
        };
        assert!(list_notes(&body).is_ok());
    }

    #[test]
    fn list_rejects_page_below_one() {
        let body = ListNotesBody {
            page: Some(0),
            ..Default::default()
        };
        let Err(ApiError::Validation(errors)) = list_notes(&body) else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "page");
        assert_eq!(errors[0].location, "body");
    }

    #[test]
    fn list_rejects_per_page_out_of_range() {
        for per_page in [0, 101] {
            let body = ListNotesBody {
                per_page: Some(per_page),
                ..Default::default()
            };
            let Err(ApiError::Validation(errors)) = list_notes(&body) else {
                panic!("expected validation error");
            };
            assert_eq!(errors[0].field, "perPage");
        }
    }

    #[test]
    fn note_id_param_rejects_non_hex() {
        let Err(ApiError::Validation(errors)) = note_id_param("short") else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0].field, "noteId");
        assert_eq!(errors[0].location, "params");
    }

    #[test]
    fn required_note_fields_collects_all_missing() {
        let Err(ApiError::Validation(errors)) = required_note_fields(CreateNoteInput::default())
        else {
            panic!("expected validation error");
        };
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["ip", "fingerprint", "text"]);
    }

    #[test]
    fn required_note_fields_passes_complete_input() {
        let input = CreateNoteInput {
            ip: Some("1.2.3.4".to_string()),
            fingerprint: Some(serde_json::json!({"ua": "x"})),
            text: Some("hello".to_string()),
        };
        let new_note = required_note_fields(input).unwrap();
        assert_eq!(new_note.ip, "1.2.3.4");
        assert_eq!(new_note.text, "hello");
    }
}
