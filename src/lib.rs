//! Quizzish navigation backend.
//!
//! Decides where participants of a quiz, pubquiz or escape-room game go next:
//! which round follows a round, which slide follows a slide, based on the
//! conditions authors attached to each "next possibility".
//!
//! - `navigation`: the pure resolver (conditions, clauses, possibilities, modes)
//! - `progression`: fallback policy and the round state machine
//! - `authoring`: invariants and validation for authored games
//! - `routes`/`logic`/`state`: the axum service around it

pub mod authoring;
pub mod config;
pub mod domain;
pub mod logic;
pub mod navigation;
pub mod progression;
pub mod protocol;
pub mod routes;
pub mod seeds;
pub mod state;
pub mod telemetry;
