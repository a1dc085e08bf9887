// ABOUTME: EDHREC synergy data client, one JSON page per commander
// ABOUTME: A missing page or a page without a card list is reported as "no data", not an error
use crate::traits::SynergySource;
use async_trait::async_trait;
use deckhelper_core::{DeckHelperError, EdhrecConfig, Result, SynergyPage, SynergyRecord};
use reqwest::Client;
use tracing::debug;

#[derive(Clone)]
pub struct EdhrecClient {
    client: Client,
    api_base: String,
}

impl EdhrecClient {
    pub fn new(config: &EdhrecConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| DeckHelperError::Config(format!("building HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
        })
    }

    pub fn page_url(&self, page_key: &str) -> String {
        format!("{}/pages/commanders/{}.json", self.api_base, page_key)
    }
}

#[async_trait]
impl SynergySource for EdhrecClient {
    async fn synergy(&self, page_key: &str) -> Result<Option<Vec<SynergyRecord>>> {
        let url = self.page_url(page_key);
        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| DeckHelperError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            debug!(
                "{} not found at synergy endpoint (HTTP {})",
                page_key,
                response.status()
            );
            return Ok(None);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DeckHelperError::Transport(e.to_string()))?;
        let page: SynergyPage = serde_json::from_slice(&bytes)?;
        if page.cardlist.is_none() {
            debug!("{} page has no card list", page_key);
        }
        Ok(page.cardlist)
    }

    fn provider_name(&self) -> &str {
        "edhrec"
    }
}
