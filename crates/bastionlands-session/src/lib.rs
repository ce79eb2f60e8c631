//! Game sessions and the turn pipeline.
//!
//! A session holds the company, its place in the Realm and the world map.
//! Each turn interprets the player's words, resolves them with the rules,
//! asks the model to narrate the result and persists the new snapshot.

pub mod application;
pub mod domain;
