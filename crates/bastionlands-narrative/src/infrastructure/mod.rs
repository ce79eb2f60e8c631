//! Outbound adapters.

pub mod ollama;
