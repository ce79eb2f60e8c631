//! Shared domain abstractions for Mythic Bastionlands.
//!
//! This crate defines the fundamental traits and types that every other
//! crate depends on: time, randomness, commands, errors and the session
//! store seam. It contains no infrastructure code.

pub mod command;
pub mod determinism;
pub mod error;
pub mod repository;
