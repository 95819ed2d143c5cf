//! Battle API routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::{error_response, parse_player_id};
use crate::application::services::{BattleView, InputOutcome};
use crate::domain::value_objects::{ArrowSet, TimingAccuracy};
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartBattleRequest {
    pub song_id: String,
}

/// Timing is either a judged category or a raw offset from the note, in seconds
#[derive(Debug, Deserialize)]
pub struct BattleInputRequest {
    pub arrows: ArrowSet,
    #[serde(default)]
    pub timing: Option<TimingAccuracy>,
    #[serde(default)]
    pub offset_secs: Option<f64>,
}

impl BattleInputRequest {
    fn accuracy(&self) -> Option<TimingAccuracy> {
        self.timing
            .or_else(|| self.offset_secs.map(TimingAccuracy::from_offset))
    }
}

/// Start a battle, spending the song's energy cost
pub async fn start_battle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StartBattleRequest>,
) -> Result<Json<BattleView>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let _guard = state.player_locks.acquire(player_id).await;

    state
        .battle_service
        .start_battle(player_id, &req.song_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Submit the arrows pressed for the current note
pub async fn submit_input(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<BattleInputRequest>,
) -> Result<Json<InputOutcome>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let timing = req.accuracy().ok_or_else(|| {
        (
            StatusCode::BAD_REQUEST,
            "Either timing or offset_secs is required".to_string(),
        )
    })?;
    let _guard = state.player_locks.acquire(player_id).await;

    state
        .battle_service
        .process_input(player_id, &req.arrows, timing)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn current_battle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BattleView>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;

    state
        .battle_service
        .current_battle(player_id)
        .await
        .map(Json)
        .map_err(error_response)
}

/// Abandon the active battle without rewards or refund
pub async fn abandon_battle(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<BattleView>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let _guard = state.player_locks.acquire(player_id).await;

    state
        .battle_service
        .abandon_battle(player_id)
        .await
        .map(Json)
        .map_err(error_response)
}
