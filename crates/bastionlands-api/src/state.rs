//! Shared application state.

use std::sync::{Arc, Mutex};

use bastionlands_core::determinism::{Clock, DeterministicRng};
use bastionlands_core::repository::SessionRepository;
use bastionlands_session::application::locks::SessionLocks;
use bastionlands_session::application::narrator::Narrator;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Clock for timestamps.
    pub clock: Arc<dyn Clock + Send + Sync>,
    /// RNG for dice and world generation.
    pub rng: Arc<Mutex<dyn DeterministicRng + Send>>,
    /// Session snapshot store.
    pub session_repository: Arc<dyn SessionRepository>,
    /// Language model calls, with timeout and fallback.
    pub narrator: Narrator,
    /// One turn at a time per session.
    pub locks: Arc<SessionLocks>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        clock: Arc<dyn Clock + Send + Sync>,
        rng: Arc<Mutex<dyn DeterministicRng + Send>>,
        session_repository: Arc<dyn SessionRepository>,
        narrator: Narrator,
    ) -> Self {
        Self {
            clock,
            rng,
            session_repository,
            narrator,
            locks: Arc::new(SessionLocks::new()),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use bastionlands_core::determinism::{Clock, DeterministicRng, SeededRng};
    use bastionlands_narrative::domain::model::LanguageModel;
    use bastionlands_session::application::narrator::Narrator;
    use bastionlands_session_store::in_memory::InMemorySessionRepository;
    use bastionlands_test_support::FixedClock;

    use super::AppState;

    /// In-memory state with a seeded RNG and the given model.
    pub(crate) fn app_state_with(model: Arc<dyn LanguageModel>) -> AppState {
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(FixedClock::new_year());
        let rng: Arc<Mutex<dyn DeterministicRng + Send>> =
            Arc::new(Mutex::new(SeededRng::from_seed(2026)));
        AppState::new(
            clock,
            rng,
            Arc::new(InMemorySessionRepository::new()),
            Narrator::new(model, Duration::from_millis(200)),
        )
    }
}
