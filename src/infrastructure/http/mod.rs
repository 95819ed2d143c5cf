//! HTTP REST API routes

mod battle_routes;
mod player_routes;
mod progression_routes;
mod song_routes;

use std::sync::Arc;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Router,
};

use crate::application::services::EngineError;
use crate::domain::value_objects::PlayerId;
use crate::infrastructure::state::AppState;

/// Create all API routes
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new()
        // Song routes
        .route("/api/songs", get(song_routes::list_songs))
        // Player routes
        .route("/api/players", post(player_routes::register_player))
        .route("/api/players/{id}", get(player_routes::get_player))
        .route("/api/players/{id}/energy", get(player_routes::check_energy))
        .route("/api/players/{id}/progress", get(player_routes::get_progress))
        .route("/api/players/{id}/inventory", get(player_routes::get_inventory))
        // Quest, achievement and reward routes
        .route(
            "/api/players/{id}/achievements",
            get(progression_routes::list_achievements),
        )
        .route("/api/players/{id}/quests", get(progression_routes::list_quests))
        .route(
            "/api/players/{id}/quests/daily",
            post(progression_routes::generate_daily_quests),
        )
        .route(
            "/api/players/{id}/rewards/battle",
            post(progression_routes::apply_battle_rewards),
        )
        .route(
            "/api/players/{id}/story/choices",
            post(progression_routes::process_story_choice),
        )
        // Battle routes
        .route(
            "/api/players/{id}/battle",
            post(battle_routes::start_battle)
                .get(battle_routes::current_battle)
                .delete(battle_routes::abandon_battle),
        )
        .route(
            "/api/players/{id}/battle/input",
            post(battle_routes::submit_input),
        )
}

fn parse_player_id(id: &str) -> Result<PlayerId, (StatusCode, String)> {
    id.parse()
        .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid player ID".to_string()))
}

fn error_response(err: EngineError) -> (StatusCode, String) {
    let status = match &err {
        EngineError::NotFound { .. } => StatusCode::NOT_FOUND,
        EngineError::InsufficientResource { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::InvalidState(_) => StatusCode::CONFLICT,
        EngineError::Repo(e) => {
            tracing::error!(error = %e, "Repository failure");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, err.to_string())
}
