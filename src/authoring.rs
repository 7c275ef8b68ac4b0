//! Authoring-side invariants the resolver relies on.
//!
//! - switching a round's navigation mode seeds or clears its possibilities
//! - moving or removing rounds/slides keeps sibling indices contiguous
//! - `Game::validate` reports everything that would make play-time navigation
//!   fail or behave surprisingly
//! - time limits snap to the ladders the editor offers

use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::domain::{
  CheckMethod, ComparisonType, Condition, Game, GameType, NavigationMode, NextRoundPossibility, Round, Slide, SlideType,
};
use crate::navigation::clause::chain_operators;
use crate::navigation::{NavigationError, Possibility, SnapshotField};

pub const GAME_LIMITS_MINUTES: [u32; 11] = [15, 30, 45, 60, 90, 120, 180, 360, 480, 960, 1440];
pub const ROUND_LIMITS_MINUTES: [u32; 11] = [1, 3, 5, 10, 15, 30, 45, 60, 90, 120, 180];
pub const SLIDE_LIMITS_SECONDS: [u32; 11] = [3, 5, 10, 15, 30, 45, 60, 90, 120, 180, 300];
pub const POINTS_RANGE: std::ops::RangeInclusive<i32> = -10..=10;

// Maximum lengths, in characters, of names and descriptions.
pub const GAME_NAME_MAX: usize = 64;
pub const ROUND_NAME_MAX: usize = 128;
pub const SLIDE_NAME_MAX: usize = 128;
pub const SLIDE_DESCRIPTION_MAX: usize = 512;
pub const DESCRIPTION_MAX: usize = 1024;

/// Nearest value on `ladder`; the lower one wins a tie.
pub fn closest_limit(ladder: &[u32], value: u32) -> Option<u32> {
  ladder.iter().copied().min_by_key(|step| step.abs_diff(value))
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthoringError {
  #[error("unknown round '{0}'")]
  UnknownRound(String),

  #[error("unknown slide '{0}'")]
  UnknownSlide(String),

  #[error("index {index} outside 1..={len}")]
  IndexOutOfRange { index: u32, len: usize },
}

/// One problem found by `Game::validate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
  /// Where the problem is, e.g. `rounds[r1].nextRoundPossibilities[p2]`.
  pub path: String,
  pub message: String,
}

impl ValidationIssue {
  fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
    Self { path: path.into(), message: message.into() }
  }
}

trait Indexed {
  fn index(&self) -> u32;
  fn set_index(&mut self, index: u32);
}

impl Indexed for Round {
  fn index(&self) -> u32 { self.index }
  fn set_index(&mut self, index: u32) { self.index = index }
}

impl Indexed for Slide {
  fn index(&self) -> u32 { self.index }
  fn set_index(&mut self, index: u32) { self.index = index }
}

/// Move the item at position `pos` to `target`, shifting everything between
/// the old and new index by one.
fn move_within<T: Indexed>(items: &mut [T], pos: usize, target: u32) -> Result<(), AuthoringError> {
  let len = items.len();
  if target == 0 || target as usize > len {
    return Err(AuthoringError::IndexOutOfRange { index: target, len });
  }
  let current = items[pos].index();
  if current == target {
    return Ok(());
  }
  let (low, high) = (current.min(target), current.max(target));
  for (i, item) in items.iter_mut().enumerate() {
    if i == pos {
      continue;
    }
    let idx = item.index();
    if idx >= low && idx <= high {
      item.set_index(if target > current { idx - 1 } else { idx + 1 });
    }
  }
  items[pos].set_index(target);
  Ok(())
}

/// Close the gap left by a removed item.
fn close_gap<T: Indexed>(items: &mut [T], removed: u32) {
  for item in items.iter_mut().filter(|i| i.index() > removed) {
    item.set_index(item.index() - 1);
  }
}

impl Round {
  /// Change the navigation mode, keeping possibilities consistent with it:
  /// entering `INDIVIDUAL_ROUTES` seeds one unconditional "next round"
  /// possibility, leaving it clears them.
  pub fn set_navigation_mode(&mut self, mode: NavigationMode) {
    if mode == self.navigation_mode {
      return;
    }
    if mode == NavigationMode::IndividualRoutes {
      if self.next_round_possibilities.is_empty() {
        self.next_round_possibilities.push(NextRoundPossibility {
          id: Uuid::new_v4().to_string(),
          next_round_id: None,
          conditions: vec![],
        });
      }
    } else {
      self.next_round_possibilities.clear();
    }
    self.navigation_mode = mode;
  }

  pub fn move_slide(&mut self, slide_id: &str, index: u32) -> Result<(), AuthoringError> {
    let pos = self
      .slides
      .iter()
      .position(|s| s.id == slide_id)
      .ok_or_else(|| AuthoringError::UnknownSlide(slide_id.to_string()))?;
    move_within(&mut self.slides, pos, index)
  }

  pub fn remove_slide(&mut self, slide_id: &str) -> Result<(), AuthoringError> {
    let pos = self
      .slides
      .iter()
      .position(|s| s.id == slide_id)
      .ok_or_else(|| AuthoringError::UnknownSlide(slide_id.to_string()))?;
    let removed = self.slides.remove(pos);
    close_gap(&mut self.slides, removed.index);
    Ok(())
  }
}

/// A blank slide with the defaults the editor uses for `game_type`.
fn blank_slide(game_type: GameType, index: u32) -> Slide {
  let (slide_type, check_method, time_limit_in_seconds, points_for_time, points_for_order) = match game_type {
    GameType::RegularQuiz => (SlideType::MultipleChoice, CheckMethod::Automatic, Some(30), true, false),
    GameType::Pubquiz => (SlideType::Open, CheckMethod::Manual, None, false, false),
    GameType::EscapeRoom => (SlideType::Open, CheckMethod::Automatic, None, false, true),
  };
  Slide {
    id: Uuid::new_v4().to_string(),
    index,
    name: None,
    description: None,
    slide_type,
    check_method,
    time_limit_in_seconds,
    early_correct_points: 10,
    late_correct_points: 0,
    early_incorrect_points: 0,
    late_incorrect_points: 0,
    points_for_time,
    points_for_order,
    multiple_choice_options: vec![],
    correct_next_slide_id: None,
    incorrect_next_slide_id: None,
    next_slide_possibilities: vec![],
  }
}

impl Game {
  /// Append a blank slide to a round; returns the new slide's id.
  pub fn add_slide(&mut self, round_id: &str) -> Result<String, AuthoringError> {
    let game_type = self.game_type;
    let round = self
      .round_mut(round_id)
      .ok_or_else(|| AuthoringError::UnknownRound(round_id.to_string()))?;
    let index = round.slides.iter().map(|s| s.index).max().unwrap_or(0) + 1;
    let slide = blank_slide(game_type, index);
    let id = slide.id.clone();
    round.slides.push(slide);
    Ok(id)
  }

  pub fn move_round(&mut self, round_id: &str, index: u32) -> Result<(), AuthoringError> {
    let pos = self
      .rounds
      .iter()
      .position(|r| r.id == round_id)
      .ok_or_else(|| AuthoringError::UnknownRound(round_id.to_string()))?;
    move_within(&mut self.rounds, pos, index)
  }

  pub fn remove_round(&mut self, round_id: &str) -> Result<(), AuthoringError> {
    let pos = self
      .rounds
      .iter()
      .position(|r| r.id == round_id)
      .ok_or_else(|| AuthoringError::UnknownRound(round_id.to_string()))?;
    let removed = self.rounds.remove(pos);
    close_gap(&mut self.rounds, removed.index);
    Ok(())
  }

  /// Every problem that would break or surprise play-time navigation.
  pub fn validate(&self) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();

    if !GAME_LIMITS_MINUTES.contains(&self.time_limit_in_minutes) {
      issues.push(ValidationIssue::new(
        "timeLimitInMinutes",
        format!("{} is not an allowed game time limit", self.time_limit_in_minutes),
      ));
    }
    check_text(self.name.as_deref(), GAME_NAME_MAX, "name", &mut issues);
    check_text(self.description.as_deref(), DESCRIPTION_MAX, "description", &mut issues);
    check_contiguous(self.rounds.iter().map(|r| r.index), "rounds", &mut issues);

    let round_ids: HashSet<&str> = self.rounds.iter().map(|r| r.id.as_str()).collect();
    for round in &self.rounds {
      validate_round(round, &round_ids, &mut issues);
    }
    issues
  }
}

/// Present text must be non-empty and at most `max` characters.
fn check_text(text: Option<&str>, max: usize, path: &str, issues: &mut Vec<ValidationIssue>) {
  let Some(text) = text else { return };
  let len = text.chars().count();
  if len == 0 || len > max {
    issues.push(ValidationIssue::new(path, format!("length {len} is outside 1..={max}")));
  }
}

fn check_contiguous(indices: impl Iterator<Item = u32>, path: &str, issues: &mut Vec<ValidationIssue>) {
  let mut sorted: Vec<u32> = indices.collect();
  sorted.sort_unstable();
  let expected: Vec<u32> = (1..=sorted.len() as u32).collect();
  if sorted != expected {
    issues.push(ValidationIssue::new(path, format!("indices {sorted:?} are not 1..={}", sorted.len())));
  }
}

fn validate_round(round: &Round, round_ids: &HashSet<&str>, issues: &mut Vec<ValidationIssue>) {
  let path = format!("rounds[{}]", round.id);
  check_text(round.name.as_deref(), ROUND_NAME_MAX, &format!("{path}.name"), issues);
  check_text(round.description.as_deref(), DESCRIPTION_MAX, &format!("{path}.description"), issues);

  if let Some(limit) = round.time_limit_in_minutes {
    if !ROUND_LIMITS_MINUTES.contains(&limit) {
      issues.push(ValidationIssue::new(
        format!("{path}.timeLimitInMinutes"),
        format!("{limit} is not an allowed round time limit"),
      ));
    }
  }

  match round.navigation_mode {
    NavigationMode::IndividualRoutes if round.next_round_possibilities.is_empty() => {
      issues.push(ValidationIssue::new(
        format!("{path}.nextRoundPossibilities"),
        "INDIVIDUAL_ROUTES requires at least one next-round possibility",
      ));
    }
    NavigationMode::Together | NavigationMode::Individual if !round.next_round_possibilities.is_empty() => {
      issues.push(ValidationIssue::new(
        format!("{path}.nextRoundPossibilities"),
        format!("{} rounds cannot branch; possibilities must be empty", round.navigation_mode.as_str()),
      ));
    }
    _ => {}
  }
  validate_possibilities(&round.next_round_possibilities, round_ids, &format!("{path}.nextRoundPossibilities"), issues);

  check_contiguous(round.slides.iter().map(|s| s.index), &format!("{path}.slides"), issues);
  let slide_ids: HashSet<&str> = round.slides.iter().map(|s| s.id.as_str()).collect();
  for slide in &round.slides {
    let slide_path = format!("{path}.slides[{}]", slide.id);
    check_text(slide.name.as_deref(), SLIDE_NAME_MAX, &format!("{slide_path}.name"), issues);
    check_text(slide.description.as_deref(), SLIDE_DESCRIPTION_MAX, &format!("{slide_path}.description"), issues);

    if let Some(limit) = slide.time_limit_in_seconds {
      if !SLIDE_LIMITS_SECONDS.contains(&limit) {
        issues.push(ValidationIssue::new(
          format!("{slide_path}.timeLimitInSeconds"),
          format!("{limit} is not an allowed slide time limit"),
        ));
      }
    }

    let mut points = vec![
      ("earlyCorrectPoints", Some(slide.early_correct_points)),
      ("lateCorrectPoints", Some(slide.late_correct_points)),
      ("earlyIncorrectPoints", Some(slide.early_incorrect_points)),
      ("lateIncorrectPoints", Some(slide.late_incorrect_points)),
    ];
    for option in &slide.multiple_choice_options {
      points.push(("multipleChoiceOptions.earlyPoints", option.early_points));
      points.push(("multipleChoiceOptions.latePoints", option.late_points));
      check_text(
        option.description.as_deref(),
        SLIDE_DESCRIPTION_MAX,
        &format!("{slide_path}.multipleChoiceOptions[{}].description", option.id),
        issues,
      );
      check_destination(option.next_slide_id.as_deref(), &slide_ids, &format!("{slide_path}.multipleChoiceOptions[{}]", option.id), issues);
    }
    for (name, value) in points {
      if let Some(v) = value.filter(|v| !POINTS_RANGE.contains(v)) {
        issues.push(ValidationIssue::new(format!("{slide_path}.{name}"), format!("{v} is outside -10..=10")));
      }
    }

    check_destination(slide.correct_next_slide_id.as_deref(), &slide_ids, &format!("{slide_path}.correctNextSlideId"), issues);
    check_destination(slide.incorrect_next_slide_id.as_deref(), &slide_ids, &format!("{slide_path}.incorrectNextSlideId"), issues);
    validate_possibilities(&slide.next_slide_possibilities, &slide_ids, &format!("{slide_path}.nextSlidePossibilities"), issues);
  }
}

fn check_destination(destination: Option<&str>, known: &HashSet<&str>, path: &str, issues: &mut Vec<ValidationIssue>) {
  if let Some(id) = destination.filter(|id| !known.contains(id)) {
    issues.push(ValidationIssue::new(path, format!("destination '{id}' does not exist")));
  }
}

fn validate_possibilities<P: Possibility>(
  possibilities: &[P],
  destinations: &HashSet<&str>,
  path: &str,
  issues: &mut Vec<ValidationIssue>,
) {
  for (i, possibility) in possibilities.iter().enumerate() {
    let p_path = format!("{path}[{}]", possibility.id());
    check_destination(possibility.destination(), destinations, &p_path, issues);

    let conditions = possibility.conditions();
    if conditions.is_empty() && i + 1 < possibilities.len() {
      issues.push(ValidationIssue::new(
        &p_path,
        "unconditional possibility shadows every possibility after it",
      ));
    }
    if let Err(e) = chain_operators(conditions) {
      issues.push(ValidationIssue::new(&p_path, e.to_string()));
    }
    for condition in conditions {
      if let Err(e) = check_condition(condition) {
        issues.push(ValidationIssue::new(format!("{p_path}.conditions[{}]", condition.id), e.to_string()));
      }
    }
  }
}

/// Static checks on one condition; snapshot-dependent failures are left to
/// play time.
fn check_condition(condition: &Condition) -> Result<(), NavigationError> {
  let invalid = |what: &'static str, value: &str| NavigationError::InvalidConditionKind {
    condition_id: condition.id.clone(),
    what,
    value: value.to_string(),
  };
  if SnapshotField::for_condition(&condition.condition_type).is_none() {
    return Err(invalid("condition type", condition.condition_type.as_str()));
  }
  for comparison in std::iter::once(&condition.comparison_type1).chain(condition.comparison_type2.as_ref()) {
    if let ComparisonType::Unrecognized(raw) = comparison {
      return Err(invalid("comparison type", raw));
    }
  }
  match (&condition.comparison_type2, condition.comparison_value2) {
    (Some(ComparisonType::Smallest | ComparisonType::Greatest), _) | (Some(_), Some(_)) | (None, _) => Ok(()),
    (Some(c), None) => Err(invalid("secondary comparison without value", c.as_str())),
  }
}
