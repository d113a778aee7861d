use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
/// The engine itself is stateless; every request carries its own snapshot.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Random source for template bullets: seeded when `ATS_FILL_SEED` is set.
    pub fn fill_rng(&self) -> StdRng {
        match self.config.fill_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
