//! Application state: the in-memory game bank and navigation settings.
//!
//! Games come from the TOML config (if any) plus the built-in seed game, and
//! can be registered at runtime through the API. Either way only games that
//! pass validation enter the bank. The bank is read on every
//! navigation request and written rarely, hence the `RwLock`.

use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::{error, info, instrument};

use crate::config::{load_config_from_env, NavigationSettings, QuizzishConfig};
use crate::domain::Game;
use crate::seeds::{ensure_id, seed_game};

#[derive(Clone)]
pub struct AppState {
    pub games: Arc<RwLock<HashMap<String, Game>>>,
    pub settings: NavigationSettings,
}

impl AppState {
    /// Build state from env: load config, seed the bank.
    #[instrument(level = "info", skip_all)]
    pub fn new() -> Self {
        Self::from_config(load_config_from_env().unwrap_or_default())
    }

    pub fn from_config(cfg: QuizzishConfig) -> Self {
        let mut games = HashMap::<String, Game>::new();

        for game in cfg.games {
            let game = ensure_id(game);
            let issues = game.validate();
            if !issues.is_empty() {
                for issue in &issues {
                    error!(target: "games", id = %game.id, path = %issue.path, message = %issue.message, "Config game issue");
                }
                error!(target: "games", id = %game.id, issues = issues.len(), "Skipping config game with validation issues");
                continue;
            }
            games.insert(game.id.clone(), game);
        }

        // Config wins over the built-in seed on id clashes.
        let seed = seed_game();
        games.entry(seed.id.clone()).or_insert(seed);

        for game in games.values() {
            info!(target: "games", id = %game.id, name = %game.display_name(), rounds = game.rounds.len(), "Game available");
        }
        info!(
            target: "quizzish_backend",
            unmatched_round = ?cfg.navigation.unmatched_round,
            unmatched_slide = ?cfg.navigation.unmatched_slide,
            parallel_threshold = cfg.navigation.parallel_threshold,
            "Navigation settings"
        );

        Self {
            games: Arc::new(RwLock::new(games)),
            settings: cfg.navigation,
        }
    }

    /// Insert or replace a game.
    #[instrument(level = "debug", skip(self, game), fields(id = %game.id))]
    pub async fn insert_game(&self, game: Game) {
        let mut games = self.games.write().await;
        if games.insert(game.id.clone(), game).is_some() {
            info!(target: "games", "Game replaced");
        }
    }

    /// Read-only access to a game by id.
    #[instrument(level = "debug", skip(self), fields(%id))]
    pub async fn get_game(&self, id: &str) -> Option<Game> {
        let games = self.games.read().await;
        games.get(id).cloned()
    }

    /// All games, ordered by id.
    pub async fn list_games(&self) -> Vec<Game> {
        let games = self.games.read().await;
        let mut all: Vec<Game> = games.values().cloned().collect();
        all.sort_by(|a, b| a.id.cmp(&b.id));
        all
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::from_config(QuizzishConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seed_game_is_always_present() {
        let state = AppState::default();
        assert!(state.get_game("pubquiz-demo").await.is_some());
        assert_eq!(state.list_games().await.len(), 1);
    }

    #[tokio::test]
    async fn config_games_override_seed() {
        let cfg = QuizzishConfig::from_toml(
            r#"
            [[games]]
            id = "pubquiz-demo"
            name = "Replaced"

            [[games]]
            name = "No id"
            "#,
        )
        .unwrap();
        let state = AppState::from_config(cfg);
        let games = state.list_games().await;
        assert_eq!(games.len(), 2);
        let demo = state.get_game("pubquiz-demo").await.unwrap();
        assert_eq!(demo.name.as_deref(), Some("Replaced"));
        assert!(games.iter().any(|g| g.name.as_deref() == Some("No id") && !g.id.is_empty()));
    }

    #[tokio::test]
    async fn invalid_config_games_are_skipped() {
        let cfg = QuizzishConfig::from_toml(
            r#"
            [[games]]
            id = "branching-together"

            [[games.rounds]]
            id = "r1"
            index = 1
            navigationMode = "TOGETHER"

            [[games.rounds.nextRoundPossibilities]]
            id = "p1"
            nextRoundId = "r3"

            [[games.rounds]]
            id = "r2"
            index = 2

            [[games.rounds]]
            id = "r3"
            index = 3
            "#,
        )
        .unwrap();
        assert_eq!(cfg.games.len(), 1);
        let state = AppState::from_config(cfg);
        assert!(state.get_game("branching-together").await.is_none());
        assert_eq!(state.list_games().await.len(), 1);
    }
}
