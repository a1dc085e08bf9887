use crate::query::SearchQuery;
use async_trait::async_trait;
use deckhelper_core::{Card, Result, SynergyRecord};

/// Card lookup and search.
#[async_trait]
pub trait CardDatabase: Send + Sync {
    /// Closest card to `name`. `NotFound` when nothing matches.
    async fn named_fuzzy(&self, name: &str) -> Result<Card>;

    /// Every card matching the query, across result pages.
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Card>>;

    fn provider_name(&self) -> &str;
}

/// Per-commander synergy data.
#[async_trait]
pub trait SynergySource: Send + Sync {
    /// Card list published under `page_key`.
    ///
    /// `Ok(None)` when the source has no data set for that commander.
    async fn synergy(&self, page_key: &str) -> Result<Option<Vec<SynergyRecord>>>;

    fn provider_name(&self) -> &str;
}
