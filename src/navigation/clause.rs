//! Combining a possibility's chain of conditions into one boolean.
//!
//! The chain is flat: `logicOperator` on condition `i` joins it with condition
//! `i + 1`. It is folded strictly left to right, AND and OR bind equally, so
//! `[true AND, false OR, true]` is `(true && false) || true`.

use crate::domain::{Condition, LogicOperator};
use super::condition::evaluate;
use super::error::NavigationError;
use super::snapshot::Snapshot;

pub fn combine(lhs: bool, operator: LogicOperator, rhs: bool) -> bool {
  match operator {
    LogicOperator::And => lhs && rhs,
    LogicOperator::Or => lhs || rhs,
  }
}

/// The operators joining consecutive conditions (`len - 1` of them).
/// The operator on the last condition is ignored.
pub fn chain_operators(conditions: &[Condition]) -> Result<Vec<LogicOperator>, NavigationError> {
  let joined = conditions.len().saturating_sub(1);
  conditions[..joined]
    .iter()
    .enumerate()
    .map(|(position, c)| {
      c.logic_operator.ok_or_else(|| NavigationError::MalformedClause {
        condition_id: c.id.clone(),
        position,
      })
    })
    .collect()
}

/// Evaluate a clause. An empty clause is unconditionally true.
pub fn evaluate_clause(conditions: &[Condition], snapshot: &Snapshot) -> Result<bool, NavigationError> {
  let Some((first, rest)) = conditions.split_first() else {
    return Ok(true);
  };
  let operators = chain_operators(conditions)?;

  let mut result = evaluate(first, snapshot)?;
  for (operator, next) in operators.into_iter().zip(rest) {
    let rhs = evaluate(next, snapshot)?;
    result = combine(result, operator, rhs);
  }
  Ok(result)
}
