//! Errors raised while resolving navigation.
//!
//! All of them describe bad data rather than bad luck: retrying with the same
//! inputs gives the same error, so callers keep participants where they are and
//! report the diagnostic.

/// Why a resolution attempt failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NavigationError {
    #[error("condition '{condition_id}': unrecognized {what} '{value}'")]
    InvalidConditionKind {
        condition_id: String,
        what: &'static str,
        value: String,
    },

    #[error("condition '{condition_id}': snapshot has no {field}")]
    MissingSnapshotField { condition_id: String, field: String },

    #[error("condition '{condition_id}' at position {position} is followed by another condition but has no logic operator")]
    MalformedClause { condition_id: String, position: usize },
}

impl NavigationError {
    /// Stable machine-readable name, used in API error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            NavigationError::InvalidConditionKind { .. } => "invalid_condition_kind",
            NavigationError::MissingSnapshotField { .. } => "missing_snapshot_field",
            NavigationError::MalformedClause { .. } => "malformed_clause",
        }
    }

    pub fn condition_id(&self) -> &str {
        match self {
            NavigationError::InvalidConditionKind { condition_id, .. }
            | NavigationError::MissingSnapshotField { condition_id, .. }
            | NavigationError::MalformedClause { condition_id, .. } => condition_id,
        }
    }
}
