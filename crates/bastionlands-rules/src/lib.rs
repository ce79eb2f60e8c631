//! Rules and resolution for Mythic Bastionlands.
//!
//! Responsible for rolling dice, generating Knights and Squires, resolving
//! virtue saves, applying damage, classifying character status and running
//! exchanges of blows in combat. Every random decision goes through an
//! injected `DeterministicRng`.

pub mod domain;
