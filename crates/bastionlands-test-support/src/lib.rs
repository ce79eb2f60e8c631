//! Shared test doubles for the Mythic Bastionlands engine.

mod clock;
mod model;
mod repository;
mod rng;

pub use clock::FixedClock;
pub use model::{FailingLanguageModel, ScriptedLanguageModel, SlowLanguageModel};
pub use repository::FailingSessionRepository;
pub use rng::{MockRng, SequenceRng};
