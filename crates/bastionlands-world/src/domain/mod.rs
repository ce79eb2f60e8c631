//! Domain model for the world context.

pub mod hex;
pub mod map;
pub mod myth;
pub mod travel;
