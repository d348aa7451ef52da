//! Application state shared by every handler

use std::sync::Arc;

use crate::config::Config;
use crate::store::RecordStore;
use crate::utils::time::Clock;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn RecordStore>,
    /// "Now" for floor operations
    pub clock: Clock,
}

impl AppState {
    pub fn new(config: Config, store: Arc<dyn RecordStore>) -> Self {
        let clock = Clock::System(config.timezone);
        Self {
            config: Arc::new(config),
            store,
            clock,
        }
    }

    /// Replace the wall clock, e.g. with a fixed instant
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &dyn RecordStore {
        self.store.as_ref()
    }
}
