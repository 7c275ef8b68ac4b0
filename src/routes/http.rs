//! HTTP endpoint handlers. These are thin wrappers that forward to core logic.
//! Each handler is instrumented and logs parameters and basic result info.

use std::sync::Arc;
use axum::{
  extract::{Path, State},
  http::StatusCode,
  response::{IntoResponse, Response},
  Json,
};
use tracing::{info, instrument};

use crate::domain::Game;
use crate::logic::*;
use crate::protocol::*;
use crate::state::AppState;

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match &self {
      ApiError::UnknownGame(_) | ApiError::UnknownRound(_) | ApiError::UnknownSlide(_) => StatusCode::NOT_FOUND,
      ApiError::UnknownParticipant(_) | ApiError::Navigation(_) | ApiError::InvalidGame(_) => {
        StatusCode::UNPROCESSABLE_ENTITY
      }
    };
    let issues = match &self {
      ApiError::InvalidGame(issues) => issues.clone(),
      _ => Vec::new(),
    };
    let body = ErrorOut { kind: self.kind(), error: self.to_string(), issues };
    (status, Json(body)).into_response()
  }
}

#[instrument(level = "info")]
pub async fn http_health() -> impl IntoResponse { Json(HealthOut { ok: true }) }

#[instrument(level = "info", skip(state))]
pub async fn http_list_games(State(state): State<Arc<AppState>>) -> impl IntoResponse {
  let games: Vec<GameSummaryOut> = state.list_games().await.iter().map(to_summary).collect();
  info!(target: "games", count = games.len(), "HTTP games listed");
  Json(games)
}

#[instrument(level = "info", skip_all, fields(%id))]
pub async fn http_get_game(
  State(state): State<Arc<AppState>>,
  Path(id): Path<String>,
) -> Result<Json<Game>, ApiError> {
  let game = state.get_game(&id).await.ok_or_else(|| ApiError::UnknownGame(id.clone()))?;
  Ok(Json(game))
}

#[instrument(level = "info", skip(state, game), fields(rounds = game.rounds.len()))]
pub async fn http_post_game(
  State(state): State<Arc<AppState>>,
  Json(game): Json<Game>,
) -> Result<impl IntoResponse, ApiError> {
  let created = register_game(&state, game).await?;
  Ok((StatusCode::CREATED, Json(created)))
}

#[instrument(level = "info", skip(game), fields(id = %game.id, rounds = game.rounds.len()))]
pub async fn http_validate_game(Json(game): Json<Game>) -> impl IntoResponse {
  let issues = game.validate();
  info!(target: "games", id = %game.id, issues = issues.len(), "HTTP game validated");
  Json(ValidationOut { valid: issues.is_empty(), issues })
}

#[instrument(level = "info", skip(body), fields(candidates = body.possibilities.len()))]
pub async fn http_post_resolve(Json(body): Json<ResolveIn>) -> Result<Json<ResolveOut>, ApiError> {
  let out = resolve_raw(&body)?;
  info!(target: "navigation", destination = ?out.destination_id, matched = ?out.matched_possibility_id, "HTTP resolve evaluated");
  Ok(Json(out))
}

#[instrument(level = "info", skip(state, body), fields(game = %body.game_id, round = %body.round_id))]
pub async fn http_post_round_navigation(
  State(state): State<Arc<AppState>>,
  Json(body): Json<RoundNavigationIn>,
) -> Result<Json<RoundNavigationOut>, ApiError> {
  Ok(Json(navigate_round(&state, &body).await?))
}

#[instrument(level = "info", skip(state, body), fields(game = %body.game_id, slide = %body.slide_id, participant = ?body.participant_id))]
pub async fn http_post_slide_navigation(
  State(state): State<Arc<AppState>>,
  Json(body): Json<SlideNavigationIn>,
) -> Result<Json<SlideNavigationOut>, ApiError> {
  Ok(Json(navigate_slide(&state, &body).await?))
}
