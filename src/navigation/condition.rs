//! Evaluation of a single condition against a snapshot.

use crate::domain::{ComparisonType, Condition};
use super::error::NavigationError;
use super::snapshot::{Snapshot, SnapshotField};

/// Evaluate one condition.
///
/// With a secondary comparison the result is the conjunction of both
/// comparisons against the same scalar, e.g. `GREATER_EQUALS 10` and
/// `SMALLER_EQUALS 20` for an inclusive range. Both comparisons are always
/// checked so a broken secondary half is reported even when the primary fails.
pub fn evaluate(condition: &Condition, snapshot: &Snapshot) -> Result<bool, NavigationError> {
  let field = SnapshotField::for_condition(&condition.condition_type).ok_or_else(|| {
    NavigationError::InvalidConditionKind {
      condition_id: condition.id.clone(),
      what: "condition type",
      value: condition.condition_type.to_string(),
    }
  })?;
  let value = snapshot
    .value(field)
    .ok_or_else(|| missing(condition, field.name().to_string()))?;

  let primary = compare(
    condition,
    field,
    value,
    &condition.comparison_type1,
    condition.comparison_value1,
    snapshot,
  )?;

  let secondary = match &condition.comparison_type2 {
    None => true,
    Some(comparison) => {
      // Rank predicates ignore their operand, so only plain comparisons need one.
      let operand = match (condition.comparison_value2, comparison) {
        (Some(v), _) => v,
        (None, ComparisonType::Smallest | ComparisonType::Greatest) => 0.0,
        (None, _) => {
          return Err(NavigationError::InvalidConditionKind {
            condition_id: condition.id.clone(),
            what: "secondary comparison without value",
            value: comparison.to_string(),
          })
        }
      };
      compare(condition, field, value, comparison, operand, snapshot)?
    }
  };

  Ok(primary && secondary)
}

fn compare(
  condition: &Condition,
  field: SnapshotField,
  value: f64,
  comparison: &ComparisonType,
  operand: f64,
  snapshot: &Snapshot,
) -> Result<bool, NavigationError> {
  let holds = match comparison {
    ComparisonType::Smaller => value < operand,
    ComparisonType::SmallerEquals => value <= operand,
    ComparisonType::Equals => value == operand,
    ComparisonType::GreaterEquals => value >= operand,
    ComparisonType::Greater => value > operand,
    // Ties hold the extreme too: two leaders are both GREATEST.
    ComparisonType::Smallest => pool(condition, field, snapshot)?.iter().all(|&other| value <= other),
    ComparisonType::Greatest => pool(condition, field, snapshot)?.iter().all(|&other| value >= other),
    ComparisonType::Unrecognized(raw) => {
      return Err(NavigationError::InvalidConditionKind {
        condition_id: condition.id.clone(),
        what: "comparison type",
        value: raw.clone(),
      })
    }
  };
  Ok(holds)
}

fn pool<'a>(condition: &Condition, field: SnapshotField, snapshot: &'a Snapshot) -> Result<&'a [f64], NavigationError> {
  snapshot
    .pool(field)
    .ok_or_else(|| missing(condition, format!("{} pool", field.name())))
}

fn missing(condition: &Condition, field: String) -> NavigationError {
  NavigationError::MissingSnapshotField { condition_id: condition.id.clone(), field }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ConditionType;

  fn condition(kind: ConditionType, cmp: ComparisonType, operand: f64) -> Condition {
    Condition {
      id: "c1".into(),
      condition_type: kind,
      comparison_type1: cmp,
      comparison_value1: operand,
      comparison_type2: None,
      comparison_value2: None,
      logic_operator: None,
    }
  }

  fn points(p: f64) -> Snapshot {
    Snapshot { points: Some(p), ..Default::default() }
  }

  #[test]
  fn plain_comparisons() {
    let cases = [
      (ComparisonType::Smaller, 4.0, true),
      (ComparisonType::Smaller, 5.0, false),
      (ComparisonType::SmallerEquals, 5.0, true),
      (ComparisonType::Equals, 5.0, true),
      (ComparisonType::Equals, 6.0, false),
      (ComparisonType::GreaterEquals, 5.0, true),
      (ComparisonType::Greater, 5.0, false),
      (ComparisonType::Greater, 6.0, true),
    ];
    for (cmp, value, expected) in cases {
      let c = condition(ConditionType::Points, cmp.clone(), 5.0);
      assert_eq!(evaluate(&c, &points(value)).unwrap(), expected, "{cmp} with value {value}");
    }
  }

  #[test]
  fn range_is_inclusive_on_both_ends() {
    let mut c = condition(ConditionType::Points, ComparisonType::GreaterEquals, 10.0);
    c.comparison_type2 = Some(ComparisonType::SmallerEquals);
    c.comparison_value2 = Some(20.0);

    for value in [10.0, 15.0, 20.0] {
      assert!(evaluate(&c, &points(value)).unwrap(), "{value} should match");
    }
    for value in [9.0, 21.0] {
      assert!(!evaluate(&c, &points(value)).unwrap(), "{value} should not match");
    }
  }

  #[test]
  fn greatest_and_smallest_use_the_pool() {
    let pool = vec![3.0, 8.0, 8.0, 1.0];
    let greatest = condition(ConditionType::Points, ComparisonType::Greatest, 0.0);
    let smallest = condition(ConditionType::Points, ComparisonType::Smallest, 0.0);

    let leader = points(8.0).with_pool(SnapshotField::Points, pool.clone());
    let last = points(1.0).with_pool(SnapshotField::Points, pool.clone());
    let middle = points(3.0).with_pool(SnapshotField::Points, pool);

    assert!(evaluate(&greatest, &leader).unwrap());
    assert!(!evaluate(&greatest, &middle).unwrap());
    assert!(evaluate(&smallest, &last).unwrap());
    assert!(!evaluate(&smallest, &leader).unwrap());
  }

  #[test]
  fn rank_predicate_as_secondary_needs_no_operand() {
    // "scored something, and nobody scored more"
    let mut c = condition(ConditionType::Points, ComparisonType::Greater, 0.0);
    c.comparison_type2 = Some(ComparisonType::Greatest);
    let pool = vec![0.0, 4.0, 9.0];

    assert!(evaluate(&c, &points(9.0).with_pool(SnapshotField::Points, pool.clone())).unwrap());
    assert!(!evaluate(&c, &points(4.0).with_pool(SnapshotField::Points, pool.clone())).unwrap());
    assert!(!evaluate(&c, &points(0.0).with_pool(SnapshotField::Points, vec![0.0, 0.0])).unwrap());
    assert!(matches!(
      evaluate(&c, &points(9.0)),
      Err(NavigationError::MissingSnapshotField { .. })
    ));
  }

  #[test]
  fn rank_predicate_without_pool_is_an_error() {
    let c = condition(ConditionType::Points, ComparisonType::Greatest, 0.0);
    let err = evaluate(&c, &points(8.0)).unwrap_err();
    assert_eq!(
      err,
      NavigationError::MissingSnapshotField { condition_id: "c1".into(), field: "points pool".into() }
    );
  }

  #[test]
  fn missing_scalar_is_an_error_not_false() {
    let c = condition(ConditionType::Rankings, ComparisonType::SmallerEquals, 3.0);
    let err = evaluate(&c, &points(8.0)).unwrap_err();
    assert_eq!(err.kind(), "missing_snapshot_field");
    assert!(err.to_string().contains("ranking"));
  }

  #[test]
  fn unknown_kinds_are_reported() {
    let c = condition(ConditionType::Unrecognized("WEATHER".into()), ComparisonType::Equals, 1.0);
    assert!(matches!(
      evaluate(&c, &points(1.0)),
      Err(NavigationError::InvalidConditionKind { what: "condition type", .. })
    ));

    let c = condition(ConditionType::Points, ComparisonType::Unrecognized("ABOUT".into()), 1.0);
    assert!(matches!(
      evaluate(&c, &points(1.0)),
      Err(NavigationError::InvalidConditionKind { what: "comparison type", .. })
    ));
  }

  #[test]
  fn broken_secondary_is_reported_even_if_primary_fails() {
    let mut c = condition(ConditionType::Points, ComparisonType::Greater, 100.0);
    c.comparison_type2 = Some(ComparisonType::Unrecognized("NEAR".into()));
    c.comparison_value2 = Some(1.0);
    assert!(evaluate(&c, &points(1.0)).is_err());

    let mut c = condition(ConditionType::Points, ComparisonType::Greater, 0.0);
    c.comparison_type2 = Some(ComparisonType::Smaller);
    assert!(evaluate(&c, &points(1.0)).is_err());
  }

  #[test]
  fn time_and_count_fields() {
    let snapshot = Snapshot {
      round_time: Some(4.5),
      game_time: Some(30.0),
      participants: Some(6),
      participants_with_points: Some(2),
      repeats: Some(1),
      ..Default::default()
    };
    let check = |kind, cmp, operand| evaluate(&condition(kind, cmp, operand), &snapshot).unwrap();
    assert!(check(ConditionType::RoundTime, ComparisonType::Smaller, 5.0));
    assert!(check(ConditionType::GameTime, ComparisonType::GreaterEquals, 30.0));
    assert!(check(ConditionType::Participants, ComparisonType::Equals, 6.0));
    assert!(!check(ConditionType::ParticipantsWithPoints, ComparisonType::Greater, 2.0));
    assert!(check(ConditionType::Repeats, ComparisonType::SmallerEquals, 1.0));
  }
}
