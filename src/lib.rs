//! Anonymous note drop service: a minimal CRUD API over a single `Note`
//! resource backed by SQLite.

pub mod api;
pub mod db;
pub mod error;
pub mod models;
