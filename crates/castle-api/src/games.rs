use std::sync::Arc;

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::warn;
use uuid::Uuid;

use castle_db::models::GameRow;
use castle_types::api::{Claims, CreateGameRequest, GameResponse, UpdateGameRequest};

use crate::auth::AppStateInner;
use crate::error::ApiError;

/// Every authenticated user sees every game; there is no participant
/// filtering and no pagination on this surface.
pub async fn list_games(
    State(state): State<Arc<AppStateInner>>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    // Run the blocking full-table read off the async runtime
    let db = state.clone();
    let rows = tokio::task::spawn_blocking(move || db.db.list_games())
        .await
        .map_err(|e| anyhow::anyhow!("spawn_blocking join error: {}", e))??;

    let games: Vec<GameResponse> = rows.into_iter().map(row_to_response).collect();
    Ok(Json(games))
}

pub async fn create_game(
    State(state): State<Arc<AppStateInner>>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<CreateGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let player1 = req.player1.to_string();
    let player2 = req.player2.to_string();

    if !state.db.user_exists(&player1)? || !state.db.user_exists(&player2)? {
        return Err(ApiError::InvalidReference);
    }

    let game_id = Uuid::new_v4();
    let row = state
        .db
        .insert_game(&game_id.to_string(), &player1, &player2, &req.board_state)?;

    Ok((StatusCode::CREATED, Json(row_to_response(row))))
}

pub async fn get_game(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let row = state
        .db
        .get_game(&id.to_string())?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(row_to_response(row)))
}

/// PUT and PATCH share this handler: both replace whatever fields the body
/// carries and leave the rest alone. board_state is stored verbatim.
pub async fn update_game(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
    Json(req): Json<UpdateGameRequest>,
) -> Result<impl IntoResponse, ApiError> {
    // Resolve the row before validating references, so an absent id is 404
    // even when the body is also bad.
    if state.db.get_game(&id.to_string())?.is_none() {
        return Err(ApiError::NotFound);
    }

    for player in [&req.player1, &req.player2].into_iter().flatten() {
        if !state.db.user_exists(&player.to_string())? {
            return Err(ApiError::InvalidReference);
        }
    }

    let player1 = req.player1.map(|u| u.to_string());
    let player2 = req.player2.map(|u| u.to_string());

    let row = state
        .db
        .update_game(
            &id.to_string(),
            player1.as_deref(),
            player2.as_deref(),
            req.board_state.as_deref(),
        )?
        .ok_or(ApiError::NotFound)?;

    Ok(Json(row_to_response(row)))
}

pub async fn delete_game(
    State(state): State<Arc<AppStateInner>>,
    Path(id): Path<Uuid>,
    Extension(_claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    if !state.db.delete_game(&id.to_string())? {
        return Err(ApiError::NotFound);
    }

    Ok(StatusCode::NO_CONTENT)
}

fn row_to_response(row: GameRow) -> GameResponse {
    GameResponse {
        id: parse_uuid(&row.id, "game id", &row.id),
        player1: parse_uuid(&row.player1_id, "player1_id", &row.id),
        player2: parse_uuid(&row.player2_id, "player2_id", &row.id),
        board_state: row.board_state,
        created_at: parse_timestamp(&row.created_at, "created_at", &row.id),
        updated_at: parse_timestamp(&row.updated_at, "updated_at", &row.id),
    }
}

fn parse_uuid(value: &str, field: &str, game_id: &str) -> Uuid {
    value.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}' on game '{}': {}", field, value, game_id, e);
        Uuid::default()
    })
}

fn parse_timestamp(value: &str, field: &str, game_id: &str) -> chrono::DateTime<chrono::Utc> {
    value
        .parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite's datetime('now') format has no timezone marker.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt {} '{}' on game '{}': {}", field, value, game_id, e);
            chrono::DateTime::default()
        })
}
