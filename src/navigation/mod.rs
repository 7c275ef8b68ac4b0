//! Navigation resolution: deciding which round or slide comes next.
//!
//! Layers, leaves first:
//!   - `condition`: one condition against one snapshot
//!   - `clause`: a possibility's chain of conditions, folded left to right
//!   - `resolver`: first matching possibility in declaration order
//!   - `mode`: per-`NavigationMode` strategy deciding whose snapshot is used
//!
//! Everything here is pure: inputs are borrowed, nothing is mutated, and the same
//! inputs always give the same answer.

pub mod clause;
pub mod condition;
pub mod error;
pub mod mode;
pub mod resolver;
pub mod roster;
pub mod snapshot;

pub use clause::evaluate_clause;
pub use condition::evaluate;
pub use error::NavigationError;
pub use mode::{strategy_for, NavigationStrategy, ParticipantRoute};
pub use resolver::{first_match, resolve, Possibility};
pub use roster::{LastAnswer, ParticipantState, Roster};
pub use snapshot::{Snapshot, SnapshotField};
