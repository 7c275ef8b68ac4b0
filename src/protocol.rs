//! Public protocol structs for the HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::authoring::ValidationIssue;
use crate::domain::{Condition, Game, NavigationMode};
use crate::navigation::{Possibility, Roster, Snapshot};
use crate::progression::Step;

/// A possibility as posted to the raw resolve endpoint; accepts both the round
/// and the slide flavour.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PossibilityIn {
    pub id: String,
    #[serde(default, alias = "nextRoundId", alias = "nextSlideId")]
    pub destination_id: Option<String>,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Possibility for PossibilityIn {
    fn id(&self) -> &str {
        &self.id
    }
    fn destination(&self) -> Option<&str> {
        self.destination_id.as_deref()
    }
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

#[derive(Debug, Deserialize)]
pub struct ResolveIn {
    pub possibilities: Vec<PossibilityIn>,
    #[serde(default)]
    pub snapshot: Snapshot,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOut {
    pub destination_id: Option<String>,
    pub matched_possibility_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundNavigationIn {
    pub game_id: String,
    pub round_id: String,
    #[serde(default)]
    pub roster: Roster,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantStepOut {
    pub participant_id: String,
    pub step: Step,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundNavigationOut {
    pub round_id: String,
    pub navigation_mode: NavigationMode,
    /// Set when every participant follows the same step.
    pub shared: Option<Step>,
    pub participants: Vec<ParticipantStepOut>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideNavigationIn {
    pub game_id: String,
    pub round_id: String,
    pub slide_id: String,
    /// Whose state drives the decision; the whole group when absent.
    #[serde(default)]
    pub participant_id: Option<String>,
    #[serde(default)]
    pub roster: Roster,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideNavigationOut {
    pub slide_id: String,
    pub step: Step,
}

#[derive(Debug, Serialize)]
pub struct GameSummaryOut {
    pub id: String,
    pub name: Option<String>,
    pub rounds: usize,
}

pub fn to_summary(g: &Game) -> GameSummaryOut {
    GameSummaryOut {
        id: g.id.clone(),
        name: g.name.clone(),
        rounds: g.rounds.len(),
    }
}

#[derive(Debug, Serialize)]
pub struct ValidationOut {
    pub valid: bool,
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Serialize)]
pub struct GameCreatedOut {
    pub id: String,
    pub rounds: usize,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Debug, Serialize)]
pub struct ErrorOut {
    pub kind: &'static str,
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationIssue>,
}
