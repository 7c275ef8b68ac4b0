//! Read-only view of game state at the moment of a navigation decision.
//!
//! Times are elapsed minutes (the same unit as round and game time limits).
//! Every scalar is optional: a condition that needs a missing value fails with
//! `MissingSnapshotField` instead of silently evaluating to false.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::ConditionType;
use super::roster::LastAnswer;

/// The scalars a condition can read.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SnapshotField {
    RoundTime,
    GameTime,
    Points,
    Rankings,
    Participants,
    ParticipantsWithPoints,
    Repeats,
}

impl SnapshotField {
    /// Field read by a known condition type; `None` for unrecognized ones.
    pub fn for_condition(kind: &ConditionType) -> Option<Self> {
        match kind {
            ConditionType::RoundTime => Some(SnapshotField::RoundTime),
            ConditionType::GameTime => Some(SnapshotField::GameTime),
            ConditionType::Points => Some(SnapshotField::Points),
            ConditionType::Rankings => Some(SnapshotField::Rankings),
            ConditionType::Participants => Some(SnapshotField::Participants),
            ConditionType::ParticipantsWithPoints => Some(SnapshotField::ParticipantsWithPoints),
            ConditionType::Repeats => Some(SnapshotField::Repeats),
            ConditionType::Unrecognized(_) => None,
        }
    }

    /// Name of the snapshot key, as it appears in JSON.
    pub fn name(self) -> &'static str {
        match self {
            SnapshotField::RoundTime => "roundTime",
            SnapshotField::GameTime => "gameTime",
            SnapshotField::Points => "points",
            SnapshotField::Rankings => "ranking",
            SnapshotField::Participants => "participants",
            SnapshotField::ParticipantsWithPoints => "participantsWithPoints",
            SnapshotField::Repeats => "repeats",
        }
    }
}

impl fmt::Display for SnapshotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Minutes elapsed in the current round.
    #[serde(default)]
    pub round_time: Option<f64>,
    /// Minutes elapsed since the game started.
    #[serde(default)]
    pub game_time: Option<f64>,
    #[serde(default)]
    pub points: Option<f64>,
    /// Competition rank, 1 = best.
    #[serde(default)]
    pub ranking: Option<u32>,
    #[serde(default)]
    pub participants: Option<u32>,
    #[serde(default)]
    pub participants_with_points: Option<u32>,
    /// How many times the current round/slide has been entered before.
    #[serde(default)]
    pub repeats: Option<u32>,
    /// Distribution of a field over every entity being compared, for
    /// `SMALLEST`/`GREATEST`.
    #[serde(default)]
    pub pools: BTreeMap<SnapshotField, Vec<f64>>,
    #[serde(default)]
    pub last_answer: Option<LastAnswer>,
}

impl Snapshot {
    pub fn value(&self, field: SnapshotField) -> Option<f64> {
        match field {
            SnapshotField::RoundTime => self.round_time,
            SnapshotField::GameTime => self.game_time,
            SnapshotField::Points => self.points,
            SnapshotField::Rankings => self.ranking.map(f64::from),
            SnapshotField::Participants => self.participants.map(f64::from),
            SnapshotField::ParticipantsWithPoints => self.participants_with_points.map(f64::from),
            SnapshotField::Repeats => self.repeats.map(f64::from),
        }
    }

    /// Non-empty comparison pool for `field`.
    pub fn pool(&self, field: SnapshotField) -> Option<&[f64]> {
        self.pools
            .get(&field)
            .map(Vec::as_slice)
            .filter(|pool| !pool.is_empty())
    }

    pub fn with_pool(mut self, field: SnapshotField, values: Vec<f64>) -> Self {
        self.pools.insert(field, values);
        self
    }
}
