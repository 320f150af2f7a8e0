pub mod handlers;
pub mod validation;

use axum::{
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::db::Database;

pub fn create_router(db: Database) -> Router {
    Router::new()
        // Liveness
        .route("/status", get(handlers::status))
        // Notes
        .route("/notes/all", post(handlers::list_notes))
        .route("/notes", post(handlers::create_note))
        .route("/notes/{note_id}", get(handlers::get_note))
        .route("/notes/{note_id}", patch(handlers::update_note))
        .route("/notes/{note_id}", delete(handlers::remove_note))
        // No PUT route: the upstream API documented a replace operation but
        // never bound it. handlers::replace_note stays available unrouted.
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(db)
}
