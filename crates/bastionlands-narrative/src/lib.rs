//! Narrative generation for Mythic Bastionlands.
//!
//! Owns everything that talks to the language model: the `LanguageModel`
//! seam, the Ollama-compatible chat client, prompt templates and the parsing
//! of model output into a closed `Intent`. Nothing here touches game state;
//! callers hand in a rendered context summary.

pub mod domain;
pub mod infrastructure;
