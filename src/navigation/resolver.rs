//! Picking the first matching possibility.

use tracing::{debug, instrument};

use crate::domain::{Condition, NextRoundPossibility, NextSlidePossibility};
use super::clause::evaluate_clause;
use super::error::NavigationError;
use super::snapshot::Snapshot;

/// A candidate branch: a destination guarded by a clause.
pub trait Possibility {
    fn id(&self) -> &str;
    /// `None` when the possibility names no specific destination.
    fn destination(&self) -> Option<&str>;
    fn conditions(&self) -> &[Condition];
}

impl Possibility for NextRoundPossibility {
    fn id(&self) -> &str {
        &self.id
    }
    fn destination(&self) -> Option<&str> {
        self.next_round_id.as_deref()
    }
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

impl Possibility for NextSlidePossibility {
    fn id(&self) -> &str {
        &self.id
    }
    fn destination(&self) -> Option<&str> {
        self.next_slide_id.as_deref()
    }
    fn conditions(&self) -> &[Condition] {
        &self.conditions
    }
}

/// First possibility, in declaration order, whose clause holds.
///
/// Possibilities after the match are not evaluated. An error in any
/// possibility evaluated before the match aborts the whole resolution.
#[instrument(level = "debug", skip_all, fields(candidates = possibilities.len()))]
pub fn first_match<'a, P: Possibility>(
    possibilities: &'a [P],
    snapshot: &Snapshot,
) -> Result<Option<&'a P>, NavigationError> {
    for possibility in possibilities {
        if evaluate_clause(possibility.conditions(), snapshot)? {
            debug!(target: "navigation", possibility = %possibility.id(), destination = ?possibility.destination(), "Possibility matched");
            return Ok(Some(possibility));
        }
    }
    debug!(target: "navigation", "No possibility matched");
    Ok(None)
}

/// Destination of the first matching possibility, or `None` when nothing
/// matched or the match names no destination.
pub fn resolve<'a, P: Possibility>(
    possibilities: &'a [P],
    snapshot: &Snapshot,
) -> Result<Option<&'a str>, NavigationError> {
    Ok(first_match(possibilities, snapshot)?.and_then(|p| p.destination()))
}
