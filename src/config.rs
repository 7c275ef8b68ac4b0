//! Loading service configuration (navigation policy + optional game bank) from TOML.
//!
//! Example:
//!
//! ```toml
//! [navigation]
//! unmatched_round = "next_by_index"
//! unmatched_slide = "next_by_index"
//! parallel_threshold = 8
//!
//! [[games]]
//! id = "pubquiz"
//! name = "Friday pubquiz"
//!
//! [[games.rounds]]
//! id = "r1"
//! index = 1
//! navigationMode = "INDIVIDUAL_ROUTES"
//! ```

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::Game;

/// What happens when navigation yields no destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FallbackPolicy {
  /// Continue with the following round/slide by index, ending when there is none.
  #[default]
  NextByIndex,
  /// Remain on the current round/slide.
  Stay,
  /// End the game (or the round, for slides).
  End,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationSettings {
  pub unmatched_round: FallbackPolicy,
  pub unmatched_slide: FallbackPolicy,
  /// Minimum roster size before per-participant routes are resolved in parallel.
  pub parallel_threshold: usize,
}

impl Default for NavigationSettings {
  fn default() -> Self {
    Self {
      unmatched_round: FallbackPolicy::NextByIndex,
      unmatched_slide: FallbackPolicy::NextByIndex,
      parallel_threshold: 8,
    }
  }
}

#[derive(Clone, Debug, Deserialize, Default)]
pub struct QuizzishConfig {
  #[serde(default)]
  pub navigation: NavigationSettings,
  #[serde(default)]
  pub games: Vec<Game>,
}

impl QuizzishConfig {
  pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(s)
  }
}

/// Attempt to load `QuizzishConfig` from QUIZZISH_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<QuizzishConfig> {
  let path = std::env::var("QUIZZISH_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match QuizzishConfig::from_toml(&s) {
      Ok(cfg) => {
        info!(target: "quizzish_backend", %path, games = cfg.games.len(), "Loaded config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "quizzish_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "quizzish_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::NavigationMode;

  #[test]
  fn empty_config_uses_defaults() {
    let cfg = QuizzishConfig::from_toml("").unwrap();
    assert_eq!(cfg.navigation.unmatched_round, FallbackPolicy::NextByIndex);
    assert_eq!(cfg.navigation.parallel_threshold, 8);
    assert!(cfg.games.is_empty());
  }

  #[test]
  fn parses_policy_and_games() {
    let cfg = QuizzishConfig::from_toml(r#"
      [navigation]
      unmatched_round = "end"
      unmatched_slide = "stay"

      [[games]]
      id = "pubquiz"
      name = "Friday pubquiz"

      [[games.rounds]]
      id = "r1"
      index = 1
      navigationMode = "INDIVIDUAL_ROUTES"

      [[games.rounds.nextRoundPossibilities]]
      id = "p1"
      nextRoundId = "r2"

      [[games.rounds.nextRoundPossibilities.conditions]]
      id = "c1"
      conditionType = "POINTS"
      comparisonType1 = "GREATER_EQUALS"
      comparisonValue1 = 50.0

      [[games.rounds]]
      id = "r2"
      index = 2
    "#).unwrap();

    assert_eq!(cfg.navigation.unmatched_round, FallbackPolicy::End);
    assert_eq!(cfg.navigation.unmatched_slide, FallbackPolicy::Stay);
    assert_eq!(cfg.navigation.parallel_threshold, 8);

    let game = &cfg.games[0];
    assert_eq!(game.rounds.len(), 2);
    assert_eq!(game.rounds[0].navigation_mode, NavigationMode::IndividualRoutes);
    let p = &game.rounds[0].next_round_possibilities[0];
    assert_eq!(p.next_round_id.as_deref(), Some("r2"));
    assert_eq!(p.conditions[0].comparison_value1, 50.0);
  }
}
