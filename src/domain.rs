//! Domain models for authored games: games, rounds, slides, next-possibilities and
//! the conditions guarding them.
//!
//! Field names follow the JSON the authoring frontend produces (camelCase keys,
//! SCREAMING_SNAKE_CASE enum values), so a game exported from the editor can be
//! loaded as-is from the TOML bank or posted to the API.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which scalar of the game state a condition reads.
///
/// Unknown names are kept as `Unrecognized` instead of failing deserialization,
/// so the evaluator can report the offending condition by id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ConditionType {
  RoundTime,
  GameTime,
  Points,
  Rankings,
  Participants,
  ParticipantsWithPoints,
  Repeats,
  Unrecognized(String),
}

impl ConditionType {
  pub fn as_str(&self) -> &str {
    match self {
      ConditionType::RoundTime => "ROUND_TIME",
      ConditionType::GameTime => "GAME_TIME",
      ConditionType::Points => "POINTS",
      ConditionType::Rankings => "RANKINGS",
      ConditionType::Participants => "PARTICIPANTS",
      ConditionType::ParticipantsWithPoints => "PARTICIPANTS_WITH_POINTS",
      ConditionType::Repeats => "REPEATS",
      ConditionType::Unrecognized(raw) => raw,
    }
  }
}

impl From<String> for ConditionType {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "ROUND_TIME" => ConditionType::RoundTime,
      "GAME_TIME" => ConditionType::GameTime,
      "POINTS" => ConditionType::Points,
      "RANKINGS" => ConditionType::Rankings,
      "PARTICIPANTS" => ConditionType::Participants,
      "PARTICIPANTS_WITH_POINTS" => ConditionType::ParticipantsWithPoints,
      "REPEATS" => ConditionType::Repeats,
      _ => ConditionType::Unrecognized(raw),
    }
  }
}

impl From<ConditionType> for String {
  fn from(kind: ConditionType) -> Self { kind.as_str().to_string() }
}

impl fmt::Display for ConditionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Comparison applied to the scalar selected by `ConditionType`.
/// `Smallest`/`Greatest` are rank predicates over a comparison pool.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComparisonType {
  Smallest,
  Smaller,
  SmallerEquals,
  Equals,
  GreaterEquals,
  Greater,
  Greatest,
  Unrecognized(String),
}

impl ComparisonType {
  pub fn as_str(&self) -> &str {
    match self {
      ComparisonType::Smallest => "SMALLEST",
      ComparisonType::Smaller => "SMALLER",
      ComparisonType::SmallerEquals => "SMALLER_EQUALS",
      ComparisonType::Equals => "EQUALS",
      ComparisonType::GreaterEquals => "GREATER_EQUALS",
      ComparisonType::Greater => "GREATER",
      ComparisonType::Greatest => "GREATEST",
      ComparisonType::Unrecognized(raw) => raw,
    }
  }
}

impl From<String> for ComparisonType {
  fn from(raw: String) -> Self {
    match raw.as_str() {
      "SMALLEST" => ComparisonType::Smallest,
      "SMALLER" => ComparisonType::Smaller,
      "SMALLER_EQUALS" => ComparisonType::SmallerEquals,
      "EQUALS" => ComparisonType::Equals,
      "GREATER_EQUALS" => ComparisonType::GreaterEquals,
      "GREATER" => ComparisonType::Greater,
      "GREATEST" => ComparisonType::Greatest,
      _ => ComparisonType::Unrecognized(raw),
    }
  }
}

impl From<ComparisonType> for String {
  fn from(kind: ComparisonType) -> Self { kind.as_str().to_string() }
}

impl fmt::Display for ComparisonType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Joins a condition with the one that follows it in its clause.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogicOperator {
  And,
  Or,
}

/// Round-level policy for whether participants may diverge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NavigationMode {
  /// Everybody moves in lockstep, driven by the host.
  #[default]
  Together,
  /// Everybody runs through the slides at their own pace.
  Individual,
  /// Like `Individual`, but the next round is picked per participant.
  IndividualRoutes,
}

impl NavigationMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      NavigationMode::Together => "TOGETHER",
      NavigationMode::Individual => "INDIVIDUAL",
      NavigationMode::IndividualRoutes => "INDIVIDUAL_ROUTES",
    }
  }
}

/// Kind of event a game is authored for; decides the defaults of new slides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GameType {
  #[default]
  RegularQuiz,
  Pubquiz,
  EscapeRoom,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlideType {
  #[default]
  NoAnswer,
  Open,
  MultipleChoice,
  MultipleSelect,
  TrueFalse,
  ClosestTo,
  Categorize,
  Sort,
  Pair,
  Poll,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CheckMethod {
  Manual,
  #[default]
  Automatic,
  Vote,
  MostAnswered,
  None,
}

/// Atomic predicate over one scalar of the game state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
  pub id: String,
  pub condition_type: ConditionType,
  pub comparison_type1: ComparisonType,
  pub comparison_value1: f64,
  #[serde(default)] pub comparison_type2: Option<ComparisonType>,
  #[serde(default)] pub comparison_value2: Option<f64>,
  /// Operator joining this condition with the next one; absent on the last.
  #[serde(default)] pub logic_operator: Option<LogicOperator>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextRoundPossibility {
  pub id: String,
  /// `None` means "no specific round": the configured fallback decides.
  #[serde(default)] pub next_round_id: Option<String>,
  #[serde(default)] pub conditions: Vec<Condition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NextSlidePossibility {
  pub id: String,
  #[serde(default)] pub next_slide_id: Option<String>,
  #[serde(default)] pub conditions: Vec<Condition>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipleChoiceOption {
  pub id: String,
  #[serde(default)] pub description: Option<String>,
  #[serde(default)] pub is_regex: bool,
  #[serde(default)] pub early_points: Option<i32>,
  #[serde(default)] pub late_points: Option<i32>,
  /// Slide to branch to when a participant picks this option.
  #[serde(default)] pub next_slide_id: Option<String>,
}

/// One question/prompt unit inside a round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
  pub id: String,
  pub index: u32,
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub description: Option<String>,
  #[serde(default, rename = "type")] pub slide_type: SlideType,
  #[serde(default)] pub check_method: CheckMethod,
  #[serde(default)] pub time_limit_in_seconds: Option<u32>,

  // Scoring
  #[serde(default = "default_early_correct_points")] pub early_correct_points: i32,
  #[serde(default)] pub late_correct_points: i32,
  #[serde(default)] pub early_incorrect_points: i32,
  #[serde(default)] pub late_incorrect_points: i32,
  #[serde(default)] pub points_for_time: bool,
  #[serde(default)] pub points_for_order: bool,
  #[serde(default)] pub multiple_choice_options: Vec<MultipleChoiceOption>,

  // Branching
  #[serde(default)] pub correct_next_slide_id: Option<String>,
  #[serde(default)] pub incorrect_next_slide_id: Option<String>,
  #[serde(default)] pub next_slide_possibilities: Vec<NextSlidePossibility>,
}

fn default_early_correct_points() -> i32 { 10 }
fn default_true() -> bool { true }
fn default_game_time_limit() -> u32 { 1440 }

/// A named, optionally time-boxed phase of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
  pub id: String,
  /// 1-based and contiguous within the game.
  pub index: u32,
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub description: Option<String>,
  /// `None` = unlimited.
  #[serde(default)] pub time_limit_in_minutes: Option<u32>,
  #[serde(default)] pub navigation_mode: NavigationMode,
  #[serde(default = "default_true")] pub check_after: bool,
  #[serde(default)] pub slides: Vec<Slide>,
  #[serde(default)] pub next_round_possibilities: Vec<NextRoundPossibility>,
}

impl Round {
  pub fn slide(&self, id: &str) -> Option<&Slide> {
    self.slides.iter().find(|s| s.id == id)
  }

  pub fn first_slide(&self) -> Option<&Slide> {
    self.slides.iter().min_by_key(|s| s.index)
  }

  /// The slide directly following `index`, if any.
  pub fn slide_after(&self, index: u32) -> Option<&Slide> {
    self.slides.iter().filter(|s| s.index > index).min_by_key(|s| s.index)
  }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
  #[serde(default)] pub id: String,
  #[serde(default)] pub name: Option<String>,
  #[serde(default)] pub description: Option<String>,
  #[serde(default, rename = "type")] pub game_type: GameType,
  #[serde(default = "default_game_time_limit")] pub time_limit_in_minutes: u32,
  #[serde(default)] pub rounds: Vec<Round>,
}

impl Game {
  pub fn round(&self, id: &str) -> Option<&Round> {
    self.rounds.iter().find(|r| r.id == id)
  }

  pub fn round_mut(&mut self, id: &str) -> Option<&mut Round> {
    self.rounds.iter_mut().find(|r| r.id == id)
  }

  pub fn first_round(&self) -> Option<&Round> {
    self.rounds.iter().min_by_key(|r| r.index)
  }

  /// The round directly following `index`, if any.
  pub fn round_after(&self, index: u32) -> Option<&Round> {
    self.rounds.iter().filter(|r| r.index > index).min_by_key(|r| r.index)
  }

  pub fn display_name(&self) -> &str {
    self.name.as_deref().unwrap_or(&self.id)
  }
}
