use notestash::db::Database;
use notestash::models::*;
use speculate2::speculate;

fn new_note(ip: &str, text: &str) -> NewNote {
    NewNote {
        ip: ip.to_string(),
        fingerprint: serde_json::json!({ "ua": "test-agent" }),
        text: text.to_string(),
    }
}

#[test]
fn open_creates_the_database_file_and_parent_directories() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("notes.db");

    let db = Database::open(path.clone()).expect("Failed to open database");
    db.migrate().expect("Failed to run migrations");
    db.create_note(new_note("1.1.1.1", "persisted"))
        .expect("Failed to create note");

    assert!(path.exists());
}

speculate! {
    before {
        let db = Database::open_memory().expect("Failed to create in-memory database");
        db.migrate().expect("Failed to run migrations");
    }

    describe "create_note" {
        it "assigns an id and timestamps" {
            let note = db.create_note(new_note("1.2.3.4", "hello"))
                .expect("Failed to create note");

            assert_eq!(note.id.as_str().len(), 24);
            assert_eq!(note.ip, "1.2.3.4");
            assert_eq!(note.text, "hello");
            assert_eq!(note.created_at, note.updated_at);
        }

        it "rejects a duplicate text via the unique index" {
            db.create_note(new_note("1.1.1.1", "same")).expect("Failed to create note");

            let err = db.create_note(new_note("2.2.2.2", "same")).unwrap_err();
            let sql_err = err.downcast_ref::<rusqlite::Error>()
                .expect("expected a sqlite error");
            assert!(Database::is_unique_violation(sql_err, "text"));
            assert!(!Database::is_unique_violation(sql_err, "ip"));
        }
    }

    describe "get_note" {
        it "returns None for an unknown id" {
            let id = NoteId::generate();
            assert!(db.get_note(&id).expect("Query failed").is_none());
        }

        it "round-trips the fingerprint payload" {
            let created = db.create_note(NewNote {
                ip: "1.2.3.4".to_string(),
                fingerprint: serde_json::json!({ "ua": "x", "lang": ["en", "fr"] }),
                text: "payload".to_string(),
            }).expect("Failed to create note");

            let found = db.get_note(&created.id).expect("Query failed").expect("Note missing");
            assert_eq!(found.fingerprint, serde_json::json!({ "ua": "x", "lang": ["en", "fr"] }));
            assert_eq!(found.created_at, created.created_at);
        }
    }

    describe "list_notes" {
        it "returns only notes with the given ip, newest first" {
            db.create_note(new_note("1.1.1.1", "first")).expect("Failed to create note");
            db.create_note(new_note("1.1.1.1", "second")).expect("Failed to create note");
            db.create_note(new_note("9.9.9.9", "elsewhere")).expect("Failed to create note");

            let notes = db.list_notes(Some("1.1.1.1")).expect("Query failed");
            assert_eq!(notes.len(), 2);
            assert_eq!(notes[0].text, "second");
            assert_eq!(notes[1].text, "first");
        }

        it "returns all notes when no ip filter is given" {
            db.create_note(new_note("1.1.1.1", "a")).expect("Failed to create note");
            db.create_note(new_note("2.2.2.2", "b")).expect("Failed to create note");

            let notes = db.list_notes(None).expect("Query failed");
            assert_eq!(notes.len(), 2);
        }

        it "returns an empty list for an unseen ip" {
            db.create_note(new_note("1.1.1.1", "a")).expect("Failed to create note");

            let notes = db.list_notes(Some("8.8.8.8")).expect("Query failed");
            assert!(notes.is_empty());
        }
    }

    describe "update_note" {
        it "merges only the supplied fields" {
            let created = db.create_note(new_note("1.2.3.4", "before"))
                .expect("Failed to create note");

            let updated = db.update_note(&created.id, UpdateNoteInput {
                text: Some("after".to_string()),
                ..Default::default()
            }).expect("Update failed").expect("Note missing");

            assert_eq!(updated.text, "after");
            assert_eq!(updated.ip, created.ip);
            assert_eq!(updated.fingerprint, created.fingerprint);
            assert_eq!(updated.created_at, created.created_at);
        }

        it "returns None for an unknown id" {
            let result = db.update_note(&NoteId::generate(), UpdateNoteInput {
                text: Some("x".to_string()),
                ..Default::default()
            }).expect("Update failed");
            assert!(result.is_none());
        }
    }

    describe "replace_note" {
        it "overwrites every client field while keeping id and created_at" {
            let created = db.create_note(new_note("1.2.3.4", "original"))
                .expect("Failed to create note");

            let replaced = db.replace_note(&created.id, NewNote {
                ip: "5.6.7.8".to_string(),
                fingerprint: serde_json::json!({ "ua": "replaced" }),
                text: "rewritten".to_string(),
            }).expect("Replace failed").expect("Note missing");

            assert_eq!(replaced.id, created.id);
            assert_eq!(replaced.ip, "5.6.7.8");
            assert_eq!(replaced.fingerprint, serde_json::json!({ "ua": "replaced" }));
            assert_eq!(replaced.text, "rewritten");
            assert_eq!(replaced.created_at, created.created_at);
        }

        it "returns None for an unknown id" {
            let result = db.replace_note(&NoteId::generate(), new_note("1.1.1.1", "x"))
                .expect("Replace failed");
            assert!(result.is_none());
        }
    }

    describe "delete_note" {
        it "removes the note" {
            let created = db.create_note(new_note("1.2.3.4", "gone soon"))
                .expect("Failed to create note");

            assert!(db.delete_note(&created.id).expect("Delete failed"));
            assert!(db.get_note(&created.id).expect("Query failed").is_none());
        }

        it "returns false for an unknown id" {
            assert!(!db.delete_note(&NoteId::generate()).expect("Delete failed"));
        }

        it "frees the text for reuse" {
            let created = db.create_note(new_note("1.2.3.4", "recycled"))
                .expect("Failed to create note");
            db.delete_note(&created.id).expect("Delete failed");

            db.create_note(new_note("5.6.7.8", "recycled"))
                .expect("text should be reusable after delete");
        }
    }
}
