//! Song catalog API routes

use std::sync::Arc;

use axum::{extract::State, Json};

use crate::domain::entities::Song;
use crate::infrastructure::state::AppState;

/// List every playable song
pub async fn list_songs(State(state): State<Arc<AppState>>) -> Json<Vec<Song>> {
    Json(state.catalog.iter().cloned().collect())
}
