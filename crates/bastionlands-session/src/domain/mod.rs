//! Domain model for the session context.

pub mod commands;
pub mod context;
pub mod game_session;
pub mod turn;
