//! Application services for the session context.

pub mod command_handlers;
pub mod locks;
pub mod narrator;
pub mod query_handlers;
