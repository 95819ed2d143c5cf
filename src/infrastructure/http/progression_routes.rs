//! Quest, achievement, reward and story choice routes

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use super::{error_response, parse_player_id};
use crate::application::services::{
    AchievementOverview, RewardOutcome, SceneData, StoryOutcome,
};
use crate::domain::entities::Quest;
use crate::infrastructure::state::AppState;

#[derive(Debug, Deserialize)]
pub struct BattleRewardRequest {
    pub score: u64,
    pub max_combo: u32,
    pub perfect_hits: u32,
}

#[derive(Debug, Deserialize)]
pub struct StoryChoiceRequest {
    pub choice_id: String,
    #[serde(default)]
    pub scene: SceneData,
}

#[derive(Debug, Serialize)]
pub struct DailyQuestsResponse {
    /// Quests newly added; today's existing quests are not duplicated
    pub created: u32,
}

pub async fn list_achievements(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<AchievementOverview>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    state
        .player_service
        .get_player(player_id)
        .await
        .map_err(error_response)?;

    let list = state
        .quest_service
        .achievements(player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(AchievementOverview::new(list)))
}

/// List unexpired quests
pub async fn list_quests(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Vec<Quest>>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    state
        .player_service
        .get_player(player_id)
        .await
        .map_err(error_response)?;

    state
        .quest_service
        .active_quests(player_id)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn generate_daily_quests(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<DailyQuestsResponse>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let _guard = state.player_locks.acquire(player_id).await;
    state
        .player_service
        .get_player(player_id)
        .await
        .map_err(error_response)?;

    let created = state
        .quest_service
        .generate_daily_quests(player_id)
        .await
        .map_err(error_response)?;
    Ok(Json(DailyQuestsResponse { created }))
}

/// Credit rewards for a battle reported by the caller
pub async fn apply_battle_rewards(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<BattleRewardRequest>,
) -> Result<Json<RewardOutcome>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let _guard = state.player_locks.acquire(player_id).await;

    state
        .progression_service
        .apply_battle_rewards(player_id, req.score, req.max_combo, req.perfect_hits)
        .await
        .map(Json)
        .map_err(error_response)
}

pub async fn process_story_choice(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(req): Json<StoryChoiceRequest>,
) -> Result<Json<StoryOutcome>, (StatusCode, String)> {
    let player_id = parse_player_id(&id)?;
    let _guard = state.player_locks.acquire(player_id).await;

    state
        .progression_service
        .process_story_choice(player_id, &req.choice_id, &req.scene)
        .await
        .map(Json)
        .map_err(error_response)
}
