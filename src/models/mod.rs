//! Domain models for notestash.
//!
//! The service persists a single entity: the [`Note`], an anonymous text
//! drop recorded together with the client's IP and an opaque fingerprint
//! payload. Clients only ever see the [`NoteResponse`] view produced by
//! [`Note::transform`]; internal fields such as `updated_at` never leave
//! the process.

mod note;

pub use note::*;
