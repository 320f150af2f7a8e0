mod schema;

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use crate::models::{NewNote, Note, NoteId, UpdateNoteInput};

pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn open(path: PathBuf) -> Result<Self> {
        let parent = path
            .parent()
            .ok_or_else(|| anyhow::anyhow!("Database path has no parent directory"))?;
        std::fs::create_dir_all(parent)?;
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database at `NOTESTASH_DB` when set, falling back to the
    /// platform data directory.
    pub fn open_default() -> Result<Self> {
        if let Ok(path) = std::env::var("NOTESTASH_DB") {
            return Self::open(PathBuf::from(path));
        }
        let dirs = directories::ProjectDirs::from("", "", "notestash")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        let db_path = dirs.data_dir().join("notestash.db");
        Self::open(db_path)
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock().expect("database lock poisoned");
        schema::run_migrations(&conn)
    }

    /// Whether `err` is a unique-constraint violation on `notes.<column>`.
    ///
    /// Duplicate detection is backend-specific; keeping it here lets the
    /// error-mapping layer stay ignorant of SQLite error codes.
    pub fn is_unique_violation(err: &rusqlite::Error, column: &str) -> bool {
        match err {
            rusqlite::Error::SqliteFailure(e, Some(msg)) => {
                e.code == rusqlite::ErrorCode::ConstraintViolation
                    && msg.contains(&format!("notes.{column}"))
            }
            _ => false,
        }
    }

    // ============================================================
    // Note operations
    // ============================================================

    pub fn get_note(&self, id: &NoteId) -> Result<Option<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let mut stmt = conn.prepare(
            "SELECT id, ip, fingerprint, text, created_at, updated_at
             FROM notes WHERE id = ?",
        )?;

        let mut rows = stmt.query([id.as_str()])?;
        if let Some(row) = rows.next()? {
            Ok(Some(note_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    /// List notes, newest first. With `ip` set, only notes recorded from
    /// that exact address are returned.
    pub fn list_notes(&self, ip: Option<&str>) -> Result<Vec<Note>> {
        let conn = self.conn.lock().expect("database lock poisoned");

        match ip {
            Some(ip) => {
                let mut stmt = conn.prepare(
                    "SELECT id, ip, fingerprint, text, created_at, updated_at
                     FROM notes WHERE ip = ? ORDER BY created_at DESC, rowid DESC",
                )?;
                let notes = stmt
                    .query_map([ip], note_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(notes)
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT id, ip, fingerprint, text, created_at, updated_at
                     FROM notes ORDER BY created_at DESC, rowid DESC",
                )?;
                let notes = stmt
                    .query_map([], note_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(notes)
            }
        }
    }

    /// Insert a new note. A duplicate `text` surfaces as the raw SQLite
    /// constraint error; callers map it at the API boundary.
    pub fn create_note(&self, input: NewNote) -> Result<Note> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let id = NoteId::generate();
        let now = Utc::now();

        conn.execute(
            "INSERT INTO notes (id, ip, fingerprint, text, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
            (
                id.as_str(),
                &input.ip,
                serde_json::to_string(&input.fingerprint)?,
                &input.text,
                now.to_rfc3339(),
                now.to_rfc3339(),
            ),
        )?;

        Ok(Note {
            id,
            ip: input.ip,
            fingerprint: input.fingerprint,
            text: input.text,
            created_at: now,
            updated_at: now,
        })
    }

    /// Overwrite every client-supplied field of the note at `id`, then
    /// re-read the stored record. The id and `created_at` are preserved.
    pub fn replace_note(&self, id: &NoteId, input: NewNote) -> Result<Option<Note>> {
        if self.get_note(id)?.is_none() {
            return Ok(None);
        }

        {
            let conn = self.conn.lock().expect("database lock poisoned");
            let now = Utc::now();
            conn.execute(
                "UPDATE notes SET ip = ?, fingerprint = ?, text = ?, updated_at = ? WHERE id = ?",
                (
                    &input.ip,
                    serde_json::to_string(&input.fingerprint)?,
                    &input.text,
                    now.to_rfc3339(),
                    id.as_str(),
                ),
            )?;
        }

        self.get_note(id)
    }

    /// Shallow-merge `input` onto the note at `id`: absent fields keep
    /// their stored values.
    pub fn update_note(&self, id: &NoteId, input: UpdateNoteInput) -> Result<Option<Note>> {
        let Some(existing) = self.get_note(id)? else {
            return Ok(None);
        };

        let conn = self.conn.lock().expect("database lock poisoned");
        let now = Utc::now();
        let ip = input.ip.unwrap_or(existing.ip);
        let fingerprint = input.fingerprint.unwrap_or(existing.fingerprint);
        let text = input.text.unwrap_or(existing.text);

        conn.execute(
            "UPDATE notes SET ip = ?, fingerprint = ?, text = ?, updated_at = ? WHERE id = ?",
            (
                &ip,
                serde_json::to_string(&fingerprint)?,
                &text,
                now.to_rfc3339(),
                id.as_str(),
            ),
        )?;

        Ok(Some(Note {
            id: id.clone(),
            ip,
            fingerprint,
            text,
            created_at: existing.created_at,
            updated_at: now,
        }))
    }

    pub fn delete_note(&self, id: &NoteId) -> Result<bool> {
        let conn = self.conn.lock().expect("database lock poisoned");
        let rows = conn.execute("DELETE FROM notes WHERE id = ?", [id.as_str()])?;
        Ok(rows > 0)
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self {
            conn: self.conn.clone(),
        }
    }
}

fn note_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Note> {
    Ok(Note {
        id: parse_note_id(row.get::<_, String>(0)?),
        ip: row.get(1)?,
        fingerprint: serde_json::from_str(&row.get::<_, String>(2)?)
            .unwrap_or(serde_json::Value::Null),
        text: row.get(3)?,
        created_at: parse_datetime(row.get::<_, String>(4)?),
        updated_at: parse_datetime(row.get::<_, String>(5)?),
    })
}

fn parse_note_id(s: String) -> NoteId {
    NoteId::parse(&s).unwrap_or_else(NoteId::nil)
}

fn parse_datetime(s: String) -> chrono::DateTime<Utc> {
    chrono::DateTime::parse_from_rfc3339(&s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}
