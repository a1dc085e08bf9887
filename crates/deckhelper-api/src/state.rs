use dashmap::DashMap;
use deckhelper_core::{Collection, Settings};
use deckhelper_sources::Recommender;
use std::sync::Arc;
use uuid::Uuid;

/// Collections built through the session endpoints. Dropped with the server.
pub type SessionStore = DashMap<Uuid, Collection>;

#[derive(Clone)]
pub struct AppState {
    pub recommender: Arc<Recommender>,
    pub settings: Arc<Settings>,
    pub sessions: Arc<SessionStore>,
}

impl AppState {
    /// State backed by the public card and synergy APIs named in `settings`.
    pub fn new(settings: Settings) -> deckhelper_core::Result<Self> {
        let recommender = Recommender::from_settings(&settings)?;
        Ok(Self::with_recommender(settings, recommender))
    }

    pub fn with_recommender(settings: Settings, recommender: Recommender) -> Self {
        Self {
            recommender: Arc::new(recommender),
            settings: Arc::new(settings),
            sessions: Arc::new(SessionStore::new()),
        }
    }
}
