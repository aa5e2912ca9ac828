//! Application state management
//!
//! This module contains the shared application state that is passed
//! to all request handlers via Axum's State extractor.

use std::sync::Arc;

use crate::{
    config::Config,
    services::DuelService,
    source::ProblemSource,
    storage::HandleStore,
    utils::Clock,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

/// Inner state (wrapped in Arc for cheap cloning)
struct AppStateInner {
    /// Duel engine, owns the registry
    duels: DuelService,

    /// Linked Codeforces handles
    handles: Arc<HandleStore>,

    /// Problem and submission feed
    source: Arc<dyn ProblemSource>,

    /// Application configuration
    config: Config,
}

impl AppState {
    /// Create a new application state
    pub fn new(
        config: Config,
        source: Arc<dyn ProblemSource>,
        handles: HandleStore,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let handles = Arc::new(handles);
        let duels = DuelService::new(
            source.clone(),
            handles.clone(),
            clock,
            config.duel.clone(),
            config.codeforces.submission_count,
        );

        Self {
            inner: Arc::new(AppStateInner {
                duels,
                handles,
                source,
                config,
            }),
        }
    }

    /// Get a reference to the duel service
    pub fn duels(&self) -> &DuelService {
        &self.inner.duels
    }

    /// Get a reference to the handle store
    pub fn handles(&self) -> &HandleStore {
        &self.inner.handles
    }

    /// Get a reference to the problem source
    pub fn source(&self) -> &dyn ProblemSource {
        self.inner.source.as_ref()
    }

    /// Get a reference to the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }
}
