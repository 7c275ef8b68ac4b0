//! Building snapshots from the participants of a running game.
//!
//! The progression controller owns scores and timers; it hands over a `Roster`
//! that is already consistent, and we derive every snapshot from that one read.

use serde::{Deserialize, Serialize};

use super::snapshot::{Snapshot, SnapshotField};

const ROSTER_WIDE: [SnapshotField; 4] = [
  SnapshotField::RoundTime,
  SnapshotField::GameTime,
  SnapshotField::Participants,
  SnapshotField::ParticipantsWithPoints,
];

/// Outcome of a participant's answer on the slide being left.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LastAnswer {
  pub correct: bool,
  /// Multiple-choice option picked, if any.
  #[serde(default)] pub option_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantState {
  pub id: String,
  #[serde(default)] pub points: f64,
  #[serde(default)] pub repeats: u32,
  #[serde(default)] pub last_answer: Option<LastAnswer>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
  #[serde(default)] pub round_time: Option<f64>,
  #[serde(default)] pub game_time: Option<f64>,
  #[serde(default)] pub participants: Vec<ParticipantState>,
}

impl Roster {
  pub fn len(&self) -> usize { self.participants.len() }

  pub fn is_empty(&self) -> bool { self.participants.is_empty() }

  pub fn participant(&self, id: &str) -> Option<&ParticipantState> {
    self.participants.iter().find(|p| p.id == id)
  }

  /// Competition ranking: 1 + number of participants with strictly more points.
  pub fn rank_of(&self, points: f64) -> u32 {
    let ahead = self.participants.iter().filter(|p| p.points > points).count();
    u32::try_from(ahead).unwrap_or(u32::MAX).saturating_add(1)
  }

  fn count(&self) -> u32 {
    u32::try_from(self.participants.len()).unwrap_or(u32::MAX)
  }

  fn count_with_points(&self) -> u32 {
    let n = self.participants.iter().filter(|p| p.points > 0.0).count();
    u32::try_from(n).unwrap_or(u32::MAX)
  }

  /// Snapshot of one participant, with pools spanning every participant on
  /// the roster.
  pub fn snapshot_for(&self, participant_id: &str) -> Option<Snapshot> {
    self.participant(participant_id).map(|me| self.snapshot_of(me))
  }

  pub fn snapshot_of(&self, me: &ParticipantState) -> Snapshot {
    let points_pool = self.participants.iter().map(|p| p.points).collect();
    let ranking_pool = self.participants.iter().map(|p| f64::from(self.rank_of(p.points))).collect();
    let repeats_pool = self.participants.iter().map(|p| f64::from(p.repeats)).collect();

    let mut snapshot = Snapshot {
      round_time: self.round_time,
      game_time: self.game_time,
      points: Some(me.points),
      ranking: Some(self.rank_of(me.points)),
      participants: Some(self.count()),
      participants_with_points: Some(self.count_with_points()),
      repeats: Some(me.repeats),
      last_answer: me.last_answer.clone(),
      ..Default::default()
    }
    .with_pool(SnapshotField::Points, points_pool)
    .with_pool(SnapshotField::Rankings, ranking_pool)
    .with_pool(SnapshotField::Repeats, repeats_pool);

    // Roster-wide scalars are the same for everybody, so every participant
    // holds both extremes.
    for field in ROSTER_WIDE {
      if let Some(value) = snapshot.value(field) {
        snapshot = snapshot.with_pool(field, vec![value; self.participants.len()]);
      }
    }
    snapshot
  }

  /// Shared snapshot for modes where everybody moves together: total points,
  /// the highest repeat counter, and no ranking or pools since the group is
  /// not compared against anyone.
  pub fn aggregate_snapshot(&self) -> Snapshot {
    Snapshot {
      round_time: self.round_time,
      game_time: self.game_time,
      points: Some(self.participants.iter().map(|p| p.points).sum()),
      ranking: None,
      participants: Some(self.count()),
      participants_with_points: Some(self.count_with_points()),
      repeats: Some(self.participants.iter().map(|p| p.repeats).max().unwrap_or(0)),
      ..Default::default()
    }
  }
}
