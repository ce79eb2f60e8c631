//! Domain model for the narrative context.

pub mod intent;
pub mod interpretation;
pub mod model;
pub mod prompt;
