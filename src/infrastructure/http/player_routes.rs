//! Player API routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error_response, parse_player_id};
use crate::application::services::{InventoryOverview, PlayerProfile, PlayerProgress};
use crate::domain::entities::Player;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterPlayerRequest {
    /// Chat platform identity
    pub external_id: i64,
    #[serde(default)]
    pub username: Option<String>,
    pub display_name: String,
}

#[derive(Debug, Serialize)]
pub struct EnergyResponse {
    pub energy: u32,
}

/// Register a player, or return the existing one for this identity
pub async fn register_player(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterPlayerRequest>,
) -> Result<Json<Player>, (StatusCode, String)> {
    if req.display_name.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Display name must not be empty".to_string(),
        ));
    }

    state
        .player_service
        .get_or_create_player(req.external_id, req.username, &req.display_name)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Get a player with regenerated energy, story standing and stats
pub async fn get_player(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayerProfile>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;

    state
        .player_service
        .profile(player_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Settle energy regeneration and return the current amount
pub async fn check_energy(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<EnergyResponse>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let _guard = state.player_locks.acquire(player_id).await;

    let energy = state
        .energy_service
        .check_energy(player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(EnergyResponse { energy }))
}

pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<PlayerProgress>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;

    state
        .player_service
        .progress(player_id)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn get_inventory(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<InventoryOverview>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;

    state
        .player_service
        .inventory(player_id)
        .await
        .map(Json)
        .map_err(error_response)
}
