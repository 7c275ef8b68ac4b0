//! One strategy per `NavigationMode`, deciding how and for whom the resolver runs.
//!
//! - `TOGETHER`: one aggregate snapshot, one resolution, everybody follows.
//! - `INDIVIDUAL`: slides advance linearly; the round exit is still resolved
//!   once for the group.
//! - `INDIVIDUAL_ROUTES`: the round exit is resolved per participant, in
//!   parallel for large rosters.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::NavigationSettings;
use crate::domain::{NavigationMode, Round, Slide};
use super::error::NavigationError;
use super::resolver::resolve;
use super::roster::{ParticipantState, Roster};
use super::snapshot::Snapshot;

/// Where one participant goes after a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantRoute {
    pub participant_id: String,
    pub destination: Option<String>,
}

/// Result of leaving a round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RoundExit {
    /// Everybody moves to the same place.
    Shared(Option<String>),
    /// Each participant got their own resolution, in roster order.
    PerParticipant(Vec<ParticipantRoute>),
}

impl RoundExit {
    /// Route for every participant on `roster`.
    pub fn routes(&self, roster: &Roster) -> Vec<ParticipantRoute> {
        match self {
            RoundExit::Shared(destination) => roster
                .participants
                .iter()
                .map(|p| ParticipantRoute {
                    participant_id: p.id.clone(),
                    destination: destination.clone(),
                })
                .collect(),
            RoundExit::PerParticipant(routes) => routes.clone(),
        }
    }
}

pub trait NavigationStrategy: Sync {
    fn mode(&self) -> NavigationMode;

    /// Resolve the round's next-round possibilities.
    fn round_exit(
        &self,
        round: &Round,
        roster: &Roster,
        settings: &NavigationSettings,
    ) -> Result<RoundExit, NavigationError>;

    /// Destination after `slide`, before any fallback is applied.
    ///
    /// Slide possibilities come first; when none yields a destination the
    /// participant's last answer may pick one (option branch, then the
    /// correct/incorrect branch).
    fn slide_exit(&self, slide: &Slide, snapshot: &Snapshot) -> Result<Option<String>, NavigationError> {
        if let Some(destination) = resolve(&slide.next_slide_possibilities, snapshot)? {
            return Ok(Some(destination.to_string()));
        }
        Ok(answer_branch(slide, snapshot).map(str::to_string))
    }
}

fn answer_branch<'a>(slide: &'a Slide, snapshot: &Snapshot) -> Option<&'a str> {
    let answer = snapshot.last_answer.as_ref()?;
    let by_option = answer.option_id.as_deref().and_then(|picked| {
        slide
            .multiple_choice_options
            .iter()
            .find(|o| o.id == picked)
            .and_then(|o| o.next_slide_id.as_deref())
    });
    by_option.or_else(|| {
        if answer.correct {
            slide.correct_next_slide_id.as_deref()
        } else {
            slide.incorrect_next_slide_id.as_deref()
        }
    })
}

fn shared_exit(round: &Round, roster: &Roster) -> Result<RoundExit, NavigationError> {
    let snapshot = roster.aggregate_snapshot();
    let destination = resolve(&round.next_round_possibilities, &snapshot)?;
    Ok(RoundExit::Shared(destination.map(str::to_string)))
}

pub struct Together;
pub struct Individual;
pub struct IndividualRoutes;

impl NavigationStrategy for Together {
    fn mode(&self) -> NavigationMode {
        NavigationMode::Together
    }

    #[instrument(level = "info", skip_all, fields(round = %round.id, participants = roster.len()))]
    fn round_exit(&self, round: &Round, roster: &Roster, _: &NavigationSettings) -> Result<RoundExit, NavigationError> {
        let exit = shared_exit(round, roster)?;
        info!(target: "navigation", round = %round.id, ?exit, "Shared round exit resolved");
        Ok(exit)
    }
}

impl NavigationStrategy for Individual {
    fn mode(&self) -> NavigationMode {
        NavigationMode::Individual
    }

    #[instrument(level = "info", skip_all, fields(round = %round.id, participants = roster.len()))]
    fn round_exit(&self, round: &Round, roster: &Roster, _: &NavigationSettings) -> Result<RoundExit, NavigationError> {
        let exit = shared_exit(round, roster)?;
        info!(target: "navigation", round = %round.id, ?exit, "Shared round exit resolved");
        Ok(exit)
    }

    /// Slides are played in index order; no branching inside the round.
    fn slide_exit(&self, _: &Slide, _: &Snapshot) -> Result<Option<String>, NavigationError> {
        Ok(None)
    }
}

impl NavigationStrategy for IndividualRoutes {
    fn mode(&self) -> NavigationMode {
        NavigationMode::IndividualRoutes
    }

    #[instrument(level = "info", skip_all, fields(round = %round.id, participants = roster.len()))]
    fn round_exit(
        &self,
        round: &Round,
        roster: &Roster,
        settings: &NavigationSettings,
    ) -> Result<RoundExit, NavigationError> {
        let route = |p: &ParticipantState| -> Result<ParticipantRoute, NavigationError> {
            let snapshot = roster.snapshot_of(p);
            let destination = resolve(&round.next_round_possibilities, &snapshot)?;
            Ok(ParticipantRoute {
                participant_id: p.id.clone(),
                destination: destination.map(str::to_string),
            })
        };

        let parallel = roster.len() >= settings.parallel_threshold;
        let routes = if parallel {
            roster.participants.par_iter().map(route).collect::<Result<Vec<_>, _>>()?
        } else {
            roster.participants.iter().map(route).collect::<Result<Vec<_>, _>>()?
        };
        info!(target: "navigation", round = %round.id, routes = routes.len(), parallel, "Individual routes resolved");
        Ok(RoundExit::PerParticipant(routes))
    }
}

/// Strategy handling `mode`.
pub fn strategy_for(mode: NavigationMode) -> &'static dyn NavigationStrategy {
    match mode {
        NavigationMode::Together => &Together,
        NavigationMode::Individual => &Individual,
        NavigationMode::IndividualRoutes => &IndividualRoutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ComparisonType, Condition, ConditionType, MultipleChoiceOption, NextRoundPossibility, NextSlidePossibility};
    use crate::navigation::roster::LastAnswer;

    fn points_at_least(min: f64) -> Condition {
        Condition {
            id: format!("points>={min}"),
            condition_type: ConditionType::Points,
            comparison_type1: ComparisonType::GreaterEquals,
            comparison_value1: min,
            comparison_type2: None,
            comparison_value2: None,
            logic_operator: None,
        }
    }

    fn routed_round(mode: NavigationMode) -> Round {
        Round {
            id: "r1".into(),
            index: 1,
            name: None,
            description: None,
            time_limit_in_minutes: None,
            navigation_mode: mode,
            check_after: true,
            slides: vec![],
            next_round_possibilities: vec![
                NextRoundPossibility {
                    id: "p1".into(),
                    next_round_id: Some("r2".into()),
                    conditions: vec![points_at_least(50.0)],
                },
                NextRoundPossibility {
                    id: "p2".into(),
                    next_round_id: Some("r3".into()),
                    conditions: vec![],
                },
            ],
        }
    }

    fn roster(points: &[(&str, f64)]) -> Roster {
        Roster {
            round_time: None,
            game_time: None,
            participants: points
                .iter()
                .map(|(id, p)| ParticipantState {
                    id: (*id).into(),
                    points: *p,
                    repeats: 0,
                    last_answer: None,
                })
                .collect(),
        }
    }

    fn slide() -> Slide {
        serde_json::from_value(serde_json::json!({ "id": "s1", "index": 1 })).unwrap()
    }

    #[test]
    fn dispatch_matches_mode() {
        for mode in [NavigationMode::Together, NavigationMode::Individual, NavigationMode::IndividualRoutes] {
            assert_eq!(strategy_for(mode).mode(), mode);
        }
    }

    #[test]
    fn individual_routes_resolve_per_participant() {
        let round = routed_round(NavigationMode::IndividualRoutes);
        let roster = roster(&[("ann", 60.0), ("bob", 40.0)]);
        let exit = strategy_for(round.navigation_mode)
            .round_exit(&round, &roster, &NavigationSettings::default())
            .unwrap();
        assert_eq!(
            exit.routes(&roster),
            vec![
                ParticipantRoute { participant_id: "ann".into(), destination: Some("r2".into()) },
                ParticipantRoute { participant_id: "bob".into(), destination: Some("r3".into()) },
            ]
        );
    }

    #[test]
    fn extremes_of_roster_wide_fields_hold_for_everybody() {
        let game: crate::domain::Game = serde_json::from_value(serde_json::json!({
            "id": "g",
            "rounds": [
                { "id": "r1", "index": 1, "navigationMode": "INDIVIDUAL_ROUTES",
                  "nextRoundPossibilities": [
                      { "id": "p1", "nextRoundId": "r2", "conditions": [
                          { "id": "c1", "conditionType": "PARTICIPANTS_WITH_POINTS", "comparisonType1": "GREATEST", "comparisonValue1": 0 }
                      ] },
                      { "id": "p2", "nextRoundId": "r3", "conditions": [] }
                  ] },
                { "id": "r2", "index": 2 },
                { "id": "r3", "index": 3 }
            ]
        }))
        .unwrap();
        assert!(game.validate().is_empty());

        let round = game.round("r1").unwrap();
        let roster = roster(&[("ann", 5.0), ("bob", 0.0)]);
        let exit = strategy_for(round.navigation_mode)
            .round_exit(round, &roster, &NavigationSettings::default())
            .unwrap();
        assert!(exit.routes(&roster).iter().all(|r| r.destination.as_deref() == Some("r2")));
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let round = routed_round(NavigationMode::IndividualRoutes);
        let roster = roster(&[("a", 10.0), ("b", 55.0), ("c", 50.0), ("d", 49.0), ("e", 0.0)]);
        let sequential = NavigationSettings { parallel_threshold: usize::MAX, ..Default::default() };
        let parallel = NavigationSettings { parallel_threshold: 0, ..Default::default() };
        let strategy = strategy_for(NavigationMode::IndividualRoutes);
        assert_eq!(
            strategy.round_exit(&round, &roster, &sequential).unwrap(),
            strategy.round_exit(&round, &roster, &parallel).unwrap(),
        );
    }

    #[test]
    fn together_uses_one_aggregate_snapshot() {
        let round = routed_round(NavigationMode::Together);
        // 30 + 30 points together reach the threshold nobody reaches alone.
        let roster = roster(&[("ann", 30.0), ("bob", 30.0)]);
        let exit = strategy_for(NavigationMode::Together)
            .round_exit(&round, &roster, &NavigationSettings::default())
            .unwrap();
        assert_eq!(exit, RoundExit::Shared(Some("r2".into())));
        assert!(exit.routes(&roster).iter().all(|r| r.destination.as_deref() == Some("r2")));
    }

    #[test]
    fn individual_slides_never_branch() {
        let mut s = slide();
        s.next_slide_possibilities.push(NextSlidePossibility {
            id: "sp".into(),
            next_slide_id: Some("s9".into()),
            conditions: vec![],
        });
        s.correct_next_slide_id = Some("s7".into());
        let snapshot = Snapshot {
            last_answer: Some(LastAnswer { correct: true, option_id: None }),
            ..Default::default()
        };
        assert_eq!(strategy_for(NavigationMode::Individual).slide_exit(&s, &snapshot).unwrap(), None);
        assert_eq!(
            strategy_for(NavigationMode::Together).slide_exit(&s, &snapshot).unwrap().as_deref(),
            Some("s9")
        );
    }

    #[test]
    fn answers_pick_a_branch_when_no_possibility_does() {
        let mut s = slide();
        s.correct_next_slide_id = Some("right".into());
        s.incorrect_next_slide_id = Some("wrong".into());
        s.multiple_choice_options.push(MultipleChoiceOption {
            id: "opt-b".into(),
            description: Some("B".into()),
            is_regex: false,
            early_points: None,
            late_points: None,
            next_slide_id: Some("bonus".into()),
        });
        let strategy = strategy_for(NavigationMode::Together);
        let answered = |correct: bool, option: Option<&str>| Snapshot {
            last_answer: Some(LastAnswer { correct, option_id: option.map(Into::into) }),
            ..Default::default()
        };

        assert_eq!(strategy.slide_exit(&s, &answered(true, None)).unwrap().as_deref(), Some("right"));
        assert_eq!(strategy.slide_exit(&s, &answered(false, None)).unwrap().as_deref(), Some("wrong"));
        assert_eq!(strategy.slide_exit(&s, &answered(false, Some("opt-b"))).unwrap().as_deref(), Some("bonus"));
        assert_eq!(strategy.slide_exit(&s, &Snapshot::default()).unwrap(), None);
    }
}
