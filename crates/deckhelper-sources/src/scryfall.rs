// ABOUTME: Scryfall card database client: fuzzy name lookup and paginated search
// ABOUTME: Non-success statuses surface as RequestFailed; 404 means "nothing matched"
use crate::query::SearchQuery;
use crate::traits::CardDatabase;
use async_trait::async_trait;
use deckhelper_core::{Card, DeckHelperError, Result, ScryfallConfig};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Scryfall list object returned by `/cards/search`
#[derive(Debug, Deserialize)]
struct CardList {
    #[serde(default)]
    data: Option<Vec<Card>>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_page: Option<String>,
}

#[derive(Clone)]
pub struct ScryfallClient {
    client: Client,
    api_base: String,
    max_pages: usize,
    request_delay: Duration,
    tolerate_empty_search: bool,
}

impl ScryfallClient {
    pub fn new(config: &ScryfallConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| DeckHelperError::Config(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            max_pages: config.max_pages,
            request_delay: config.request_delay(),
            tolerate_empty_search: config.tolerate_empty_search,
        })
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        Url::parse_with_params(&format!("{}{}", self.api_base, path), params)
            .map_err(|e| DeckHelperError::Config(format!("invalid card database URL: {}", e)))
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response> {
        self.client
            .get(url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DeckHelperError::Transport(e.to_string()))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeckHelperError::Transport(e.to_string()))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl CardDatabase for ScryfallClient {
    async fn named_fuzzy(&self, name: &str) -> Result<Card> {
        let url = self.endpoint("/cards/named", &[("fuzzy", name)])?;
        let response = self.get(url).await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(DeckHelperError::card_not_found(name));
        }
        if !status.is_success() {
            return Err(DeckHelperError::request_failed("Card lookup", status.as_u16()));
        }

        let card: Card = Self::read_json(response).await?;
        if card.name.is_empty() {
            return Err(DeckHelperError::card_not_found(name));
        }
        debug!("Fuzzy lookup {:?} resolved to {:?}", name, card.name);
        Ok(card)
    }

    async fn search(&self, query: &SearchQuery) -> Result<Vec<Card>> {
        let mut url = self.endpoint("/cards/search", &[("q", query.text.as_str())])?;
        let mut cards = Vec::new();
        let mut truncated = false;

        for page in 0..self.max_pages {
            if page > 0 {
                tokio::time::sleep(self.request_delay).await;
            }

            let response = self.get(url.clone()).await?;
            let status = response.status();
            if status == StatusCode::NOT_FOUND && page == 0 && self.tolerate_empty_search {
                debug!("{} search matched no cards", query.label);
                return Ok(cards);
            }
            if !status.is_success() {
                return Err(DeckHelperError::request_failed(query.label, status.as_u16()));
            }

            let list: CardList = Self::read_json(response).await?;
            let data = list.data.ok_or_else(|| {
                DeckHelperError::MalformedResponse(format!(
                    "No 'data' key in the {} response",
                    query.label
                ))
            })?;
            cards.extend(data);

            match (list.has_more, list.next_page) {
                (true, Some(next)) => {
                    url = Url::parse(&next).map_err(|e| {
                        DeckHelperError::MalformedResponse(format!("bad next_page URL: {}", e))
                    })?;
                    truncated = page + 1 == self.max_pages;
                }
                _ => break,
            }
        }

        if truncated {
            warn!(
                "{} search stopped after {} pages with more results pending",
                query.label, self.max_pages
            );
        }
        info!("{} search returned {} cards", query.label, cards.len());
        Ok(cards)
    }

    fn provider_name(&self) -> &str {
        "scryfall"
    }
}
