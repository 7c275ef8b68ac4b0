//! Turning resolved destinations into concrete steps, and the round state machine.
//!
//! The resolver only says where a possibility points. This module applies the
//! configured fallback for "nowhere in particular" and tracks where a group or
//! participant is:
//!
//! `NotStarted -> InProgress -> EvaluatingNext -> (InProgress | Ended)`
//!
//! Resolution happens only while `EvaluatingNext`.

use std::collections::HashMap;

use serde::Serialize;
use tracing::{debug, instrument};

use crate::config::FallbackPolicy;
use crate::domain::{Game, Round, Slide};

/// Concrete next step for a participant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "id", rename_all = "snake_case")]
pub enum Step {
  /// Move to the round/slide with this id.
  Goto(String),
  /// Remain on the current round/slide.
  Stay,
  /// End of the game (for rounds) or of the round (for slides).
  End,
}

/// Step after leaving `round`, given the resolved destination.
pub fn round_step(game: &Game, round: &Round, destination: Option<&str>, policy: FallbackPolicy) -> Step {
  match destination {
    Some(id) => Step::Goto(id.to_string()),
    None => match policy {
      FallbackPolicy::NextByIndex => game
        .round_after(round.index)
        .map(|r| Step::Goto(r.id.clone()))
        .unwrap_or(Step::End),
      FallbackPolicy::Stay => Step::Stay,
      FallbackPolicy::End => Step::End,
    },
  }
}

/// Step after leaving `slide` within `round`.
pub fn slide_step(round: &Round, slide: &Slide, destination: Option<&str>, policy: FallbackPolicy) -> Step {
  match destination {
    Some(id) => Step::Goto(id.to_string()),
    None => match policy {
      FallbackPolicy::NextByIndex => round
        .slide_after(slide.index)
        .map(|s| Step::Goto(s.id.clone()))
        .unwrap_or(Step::End),
      FallbackPolicy::Stay => Step::Stay,
      FallbackPolicy::End => Step::End,
    },
  }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Default)]
#[serde(tag = "phase", content = "roundId", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundPhase {
  #[default]
  NotStarted,
  InProgress(String),
  EvaluatingNext(String),
  Ended,
}

impl RoundPhase {
  fn name(&self) -> &'static str {
    match self {
      RoundPhase::NotStarted => "NOT_STARTED",
      RoundPhase::InProgress(_) => "IN_PROGRESS",
      RoundPhase::EvaluatingNext(_) => "EVALUATING_NEXT",
      RoundPhase::Ended => "ENDED",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgressionError {
  #[error("cannot {action} while {phase}")]
  InvalidTransition { action: &'static str, phase: &'static str },

  #[error("game has no rounds")]
  EmptyGame,
}

/// Round position of one group or participant, with visit counts so REPEATS
/// conditions can be fed.
#[derive(Clone, Debug, Default)]
pub struct RoundCursor {
  phase: RoundPhase,
  visits: HashMap<String, u32>,
}

impl RoundCursor {
  pub fn new() -> Self { Self::default() }

  pub fn phase(&self) -> &RoundPhase { &self.phase }

  /// How many times `round_id` was entered before the current visit.
  pub fn repeats(&self, round_id: &str) -> u32 {
    self.visits.get(round_id).map(|v| v.saturating_sub(1)).unwrap_or(0)
  }

  fn enter(&mut self, round_id: String) {
    *self.visits.entry(round_id.clone()).or_insert(0) += 1;
    self.phase = RoundPhase::InProgress(round_id);
  }

  fn invalid(&self, action: &'static str) -> ProgressionError {
    ProgressionError::InvalidTransition { action, phase: self.phase.name() }
  }

  /// Enter the first round of `game`.
  #[instrument(level = "debug", skip_all, fields(game = %game.id))]
  pub fn start(&mut self, game: &Game) -> Result<&RoundPhase, ProgressionError> {
    if self.phase != RoundPhase::NotStarted {
      return Err(self.invalid("start"));
    }
    let first = game.first_round().ok_or(ProgressionError::EmptyGame)?;
    self.enter(first.id.clone());
    debug!(target: "navigation", round = %first.id, "Game started");
    Ok(&self.phase)
  }

  /// The current round is over; navigation may now be resolved.
  pub fn finish_round(&mut self) -> Result<&RoundPhase, ProgressionError> {
    let current = match &self.phase {
      RoundPhase::InProgress(id) => id.clone(),
      _ => return Err(self.invalid("finish a round")),
    };
    self.phase = RoundPhase::EvaluatingNext(current);
    Ok(&self.phase)
  }

  /// Apply the step chosen while evaluating.
  pub fn advance(&mut self, step: &Step) -> Result<&RoundPhase, ProgressionError> {
    let current = match &self.phase {
      RoundPhase::EvaluatingNext(id) => id.clone(),
      _ => return Err(self.invalid("advance")),
    };
    match step {
      Step::Goto(next) => self.enter(next.clone()),
      Step::Stay => self.enter(current),
      Step::End => self.phase = RoundPhase::Ended,
    }
    debug!(target: "navigation", phase = self.phase.name(), "Cursor advanced");
    Ok(&self.phase)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn game() -> Game {
    serde_json::from_value(serde_json::json!({
      "id": "g",
      "rounds": [
        { "id": "r1", "index": 1, "slides": [ { "id": "s1", "index": 1 }, { "id": "s2", "index": 2 } ] },
        { "id": "r2", "index": 2 }
      ]
    }))
    .unwrap()
  }

  #[test]
  fn explicit_destination_wins_over_policy() {
    let g = game();
    let r1 = g.round("r1").unwrap();
    assert_eq!(round_step(&g, r1, Some("r2"), FallbackPolicy::End), Step::Goto("r2".into()));
  }

  #[test]
  fn fallbacks_for_rounds() {
    let g = game();
    let r1 = g.round("r1").unwrap();
    let r2 = g.round("r2").unwrap();
    assert_eq!(round_step(&g, r1, None, FallbackPolicy::NextByIndex), Step::Goto("r2".into()));
    assert_eq!(round_step(&g, r2, None, FallbackPolicy::NextByIndex), Step::End);
    assert_eq!(round_step(&g, r1, None, FallbackPolicy::Stay), Step::Stay);
    assert_eq!(round_step(&g, r1, None, FallbackPolicy::End), Step::End);
  }

  #[test]
  fn fallbacks_for_slides() {
    let g = game();
    let r1 = g.round("r1").unwrap();
    let s1 = r1.slide("s1").unwrap();
    let s2 = r1.slide("s2").unwrap();
    assert_eq!(slide_step(r1, s1, None, FallbackPolicy::NextByIndex), Step::Goto("s2".into()));
    assert_eq!(slide_step(r1, s2, None, FallbackPolicy::NextByIndex), Step::End);
  }

  #[test]
  fn cursor_walks_the_state_machine() {
    let g = game();
    let mut cursor = RoundCursor::new();
    assert_eq!(cursor.phase(), &RoundPhase::NotStarted);

    assert_eq!(cursor.start(&g).unwrap(), &RoundPhase::InProgress("r1".into()));
    assert_eq!(cursor.finish_round().unwrap(), &RoundPhase::EvaluatingNext("r1".into()));
    assert_eq!(cursor.advance(&Step::Stay).unwrap(), &RoundPhase::InProgress("r1".into()));
    assert_eq!(cursor.repeats("r1"), 1);

    cursor.finish_round().unwrap();
    cursor.advance(&Step::Goto("r2".into())).unwrap();
    assert_eq!(cursor.repeats("r2"), 0);

    cursor.finish_round().unwrap();
    assert_eq!(cursor.advance(&Step::End).unwrap(), &RoundPhase::Ended);
  }

  #[test]
  fn cursor_rejects_out_of_order_transitions() {
    let g = game();
    let mut cursor = RoundCursor::new();
    assert_eq!(
      cursor.advance(&Step::End).unwrap_err(),
      ProgressionError::InvalidTransition { action: "advance", phase: "NOT_STARTED" }
    );
    cursor.start(&g).unwrap();
    assert!(cursor.start(&g).is_err());
    assert!(cursor.advance(&Step::End).is_err());
  }

  #[test]
  fn empty_game_cannot_start() {
    let g: Game = serde_json::from_value(serde_json::json!({ "id": "empty" })).unwrap();
    assert_eq!(RoundCursor::new().start(&g).unwrap_err(), ProgressionError::EmptyGame);
  }

  #[test]
  fn step_serializes_as_tagged_action() {
    assert_eq!(
      serde_json::to_value(Step::Goto("r2".into())).unwrap(),
      serde_json::json!({ "action": "goto", "id": "r2" })
    );
    assert_eq!(serde_json::to_value(Step::End).unwrap(), serde_json::json!({ "action": "end" }));
  }
}
