//! Domain model for the rules context.

pub mod action;
pub mod character;
pub mod combat;
pub mod dice;
pub mod resolution;
