//! Core behaviors behind the HTTP handlers.
//!
//! This includes:
//!   - Raw resolution of a posted possibility list against a posted snapshot
//!   - Round exits: strategy dispatch by navigation mode, then fallback policy
//!   - Slide exits for one participant or the whole group
//!   - Registering games in the bank after validation
//!
//! Navigation failures are never turned into a default destination: the caller
//! gets the error and participants stay where they are.

use tracing::{error, info, instrument, warn};

use crate::authoring::ValidationIssue;
use crate::domain::Game;
use crate::navigation::{first_match, strategy_for, NavigationError, Possibility};
use crate::navigation::mode::RoundExit;
use crate::progression::{round_step, slide_step};
use crate::protocol::*;
use crate::seeds::ensure_id;
use crate::state::AppState;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
  #[error("unknown game '{0}'")]
  UnknownGame(String),

  #[error("unknown round '{0}'")]
  UnknownRound(String),

  #[error("unknown slide '{0}'")]
  UnknownSlide(String),

  #[error("unknown participant '{0}'")]
  UnknownParticipant(String),

  #[error(transparent)]
  Navigation(#[from] NavigationError),

  #[error("game has {} validation issue(s)", .0.len())]
  InvalidGame(Vec<ValidationIssue>),
}

impl ApiError {
  pub fn kind(&self) -> &'static str {
    match self {
      ApiError::UnknownGame(_) => "unknown_game",
      ApiError::UnknownRound(_) => "unknown_round",
      ApiError::UnknownSlide(_) => "unknown_slide",
      ApiError::UnknownParticipant(_) => "unknown_participant",
      ApiError::Navigation(e) => e.kind(),
      ApiError::InvalidGame(_) => "invalid_game",
    }
  }
}

#[instrument(level = "info", skip(req), fields(candidates = req.possibilities.len()))]
pub fn resolve_raw(req: &ResolveIn) -> Result<ResolveOut, ApiError> {
  let matched = first_match(&req.possibilities, &req.snapshot).inspect_err(|e| {
    error!(target: "navigation", error = %e, condition = %e.condition_id(), "Raw resolution failed");
  })?;
  Ok(ResolveOut {
    destination_id: matched.and_then(|p| p.destination()).map(str::to_string),
    matched_possibility_id: matched.map(|p| p.id().to_string()),
  })
}

async fn load_game(state: &AppState, game_id: &str) -> Result<Game, ApiError> {
  state.get_game(game_id).await.ok_or_else(|| ApiError::UnknownGame(game_id.to_string()))
}

#[instrument(level = "info", skip(state, req), fields(game = %req.game_id, round = %req.round_id, participants = req.roster.len()))]
pub async fn navigate_round(state: &AppState, req: &RoundNavigationIn) -> Result<RoundNavigationOut, ApiError> {
  let game = load_game(state, &req.game_id).await?;
  let round = game.round(&req.round_id).ok_or_else(|| ApiError::UnknownRound(req.round_id.clone()))?;
  let policy = state.settings.unmatched_round;

  let exit = strategy_for(round.navigation_mode)
    .round_exit(round, &req.roster, &state.settings)
    .inspect_err(|e| {
      error!(target: "navigation", round = %round.id, error = %e, "Round exit failed; participants stay");
    })?;

  let shared = match &exit {
    RoundExit::Shared(destination) => Some(round_step(&game, round, destination.as_deref(), policy)),
    RoundExit::PerParticipant(_) => None,
  };
  let participants: Vec<ParticipantStepOut> = exit
    .routes(&req.roster)
    .into_iter()
    .map(|route| ParticipantStepOut {
      step: round_step(&game, round, route.destination.as_deref(), policy),
      participant_id: route.participant_id,
    })
    .collect();

  info!(target: "navigation", round = %round.id, mode = round.navigation_mode.as_str(), ?shared, steps = participants.len(), "Round navigation resolved");
  Ok(RoundNavigationOut {
    round_id: round.id.clone(),
    navigation_mode: round.navigation_mode,
    shared,
    participants,
  })
}

#[instrument(level = "info", skip(state, req), fields(game = %req.game_id, round = %req.round_id, slide = %req.slide_id))]
pub async fn navigate_slide(state: &AppState, req: &SlideNavigationIn) -> Result<SlideNavigationOut, ApiError> {
  let game = load_game(state, &req.game_id).await?;
  let round = game.round(&req.round_id).ok_or_else(|| ApiError::UnknownRound(req.round_id.clone()))?;
  let slide = round.slide(&req.slide_id).ok_or_else(|| ApiError::UnknownSlide(req.slide_id.clone()))?;

  let snapshot = match &req.participant_id {
    Some(id) => req.roster.snapshot_for(id).ok_or_else(|| ApiError::UnknownParticipant(id.clone()))?,
    None => req.roster.aggregate_snapshot(),
  };

  let destination = strategy_for(round.navigation_mode)
    .slide_exit(slide, &snapshot)
    .inspect_err(|e| {
      error!(target: "navigation", slide = %slide.id, error = %e, "Slide exit failed; participant stays");
    })?;
  let step = slide_step(round, slide, destination.as_deref(), state.settings.unmatched_slide);

  info!(target: "navigation", slide = %slide.id, ?step, "Slide navigation resolved");
  Ok(SlideNavigationOut { slide_id: slide.id.clone(), step })
}

/// Validate and store a game. Games with issues are rejected, since play-time
/// navigation relies on the invariants validation checks.
#[instrument(level = "info", skip(state, game), fields(name = ?game.name, rounds = game.rounds.len()))]
pub async fn register_game(state: &AppState, game: Game) -> Result<GameCreatedOut, ApiError> {
  let game = ensure_id(game);
  let issues = game.validate();
  if !issues.is_empty() {
    warn!(target: "games", id = %game.id, issues = issues.len(), "Rejected game with validation issues");
    return Err(ApiError::InvalidGame(issues));
  }
  let created = GameCreatedOut { id: game.id.clone(), rounds: game.rounds.len() };
  state.insert_game(game).await;
  info!(target: "games", id = %created.id, "Game registered");
  Ok(created)
}
