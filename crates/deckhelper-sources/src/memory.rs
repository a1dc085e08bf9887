//! In-memory sources for offline runs and tests.

use crate::query::SearchQuery;
use crate::traits::{CardDatabase, SynergySource};
use async_trait::async_trait;
use deckhelper_core::{Card, DeckHelperError, Result, SynergyRecord};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Card database answering searches from canned results keyed by query label.
#[derive(Default)]
pub struct StaticCardDatabase {
    cards: Vec<Card>,
    results: HashMap<&'static str, Vec<Card>>,
    failures: HashMap<&'static str, u16>,
    queries: Mutex<Vec<SearchQuery>>,
}

impl StaticCardDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cards available to `named_fuzzy`.
    pub fn with_cards(mut self, cards: impl IntoIterator<Item = Card>) -> Self {
        self.cards.extend(cards);
        self
    }

    /// Results for every search whose label is `label` (see `SearchQuery`).
    pub fn with_results(
        mut self,
        label: &'static str,
        cards: impl IntoIterator<Item = Card>,
    ) -> Self {
        self.results.entry(label).or_default().extend(cards);
        self
    }

    /// Make searches labelled `label` fail with `status`.
    pub fn failing(mut self, label: &'static str, status: u16) -> Self {
        self.failures.insert(label, status);
        self
    }

    pub fn queries(&self) -> Vec<SearchQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl CardDatabase for StaticCardDatabase {
    async fn named_fuzzy(&self, name: &str) -> Result<Card> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return Err(DeckHelperError::card_not_found(name));
        }
        self.cards
            .iter()
            .find(|c| c.name.to_lowercase() == needle)
            .or_else(|| self.cards.iter().find(|c| c.name.to_lowercase().contains(&needle)))
            .cloned()
            .ok_or_else(|| DeckHelperError::card_not_found(name))
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Card>> {
        self.queries.lock().push(query.clone());
        if let Some(status) = self.failures.get(query.label) {
            return Err(DeckHelperError::request_failed(query.label, *status));
        }
        Ok(self.results.get(query.label).cloned().unwrap_or_default())
    }

    fn provider_name(&self) -> &str {
        "static"
    }
}

/// Synergy pages held in memory, keyed by page key.
#[derive(Default)]
pub struct StaticSynergySource {
    pages: HashMap<String, Vec<SynergyRecord>>,
    broken: Vec<String>,
    latency: Option<Duration>,
    requested: Mutex<Vec<String>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl StaticSynergySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, page_key: impl Into<String>, records: Vec<SynergyRecord>) -> Self {
        self.pages.insert(page_key.into(), records);
        self
    }

    /// Requests for `page_key` fail at the transport level.
    pub fn with_broken_page(mut self, page_key: impl Into<String>) -> Self {
        self.broken.push(page_key.into());
        self
    }

    /// Delay every answer, so overlapping requests can be observed.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }

    /// Highest number of requests that were in flight at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SynergySource for StaticSynergySource {
    async fn synergy(&self, page_key: &str) -> Result<Option<Vec<SynergyRecord>>> {
        self.requested.lock().push(page_key.to_string());
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.broken.iter().any(|k| k == page_key) {
            return Err(DeckHelperError::Transport(format!(
                "connection reset fetching {}",
                page_key
            )));
        }
        Ok(self.pages.get(page_key).cloned())
    }

    fn provider_name(&self) -> &str {
        "static"
    }
}
