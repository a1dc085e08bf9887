use std::{
    env, fs,
    net::{SocketAddr, ToSocketAddrs},
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use config as cfg;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::scoring::ScoreWeights;

const DEFAULT_CONFIG: &str = include_str!("../../../config/default.toml");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "ServerConfig::default_host")]
    pub host: String,
    #[serde(default = "ServerConfig::default_port")]
    pub port: u16,
}

impl ServerConfig {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        5000
    }

    /// First address `host:port` resolves to.
    pub fn socket_addr(&self) -> crate::Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()?
            .next()
            .ok_or_else(|| {
                crate::DeckHelperError::Config(format!(
                    "{}:{} does not resolve to an address",
                    self.host, self.port
                ))
            })
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScryfallConfig {
    /// Card database base URL
    #[serde(default = "ScryfallConfig::default_api_base")]
    pub api_base: String,
    /// Timeout for a single request (seconds)
    #[serde(default = "ScryfallConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    /// Upper bound on `next_page` hops per search
    #[serde(default = "ScryfallConfig::default_max_pages")]
    pub max_pages: usize,
    /// Pause between consecutive requests (ms)
    #[serde(default = "ScryfallConfig::default_request_delay_ms")]
    pub request_delay_ms: u64,
    /// Read a 404 from search as "no cards matched" instead of a failure
    #[serde(default = "ScryfallConfig::default_tolerate_empty_search")]
    pub tolerate_empty_search: bool,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl ScryfallConfig {
    fn default_api_base() -> String {
        env::var("SCRYFALL_API_BASE").unwrap_or_else(|_| "https://api.scryfall.com".to_string())
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    fn default_max_pages() -> usize {
        10
    }

    fn default_request_delay_ms() -> u64 {
        50
    }

    fn default_tolerate_empty_search() -> bool {
        true
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for ScryfallConfig {
    fn default() -> Self {
        Self {
            api_base: Self::default_api_base(),
            timeout_secs: Self::default_timeout_secs(),
            max_pages: Self::default_max_pages(),
            request_delay_ms: Self::default_request_delay_ms(),
            tolerate_empty_search: Self::default_tolerate_empty_search(),
            user_agent: default_user_agent(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdhrecConfig {
    /// Synergy data base URL; pages live under `/pages/commanders/<key>.json`
    #[serde(default = "EdhrecConfig::default_api_base")]
    pub api_base: String,
    #[serde(default = "EdhrecConfig::default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl EdhrecConfig {
    fn default_api_base() -> String {
        env::var("EDHREC_API_BASE").unwrap_or_else(|_| "https://json.edhrec.com".to_string())
    }

    fn default_timeout_secs() -> u64 {
        30
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for EdhrecConfig {
    fn default() -> Self {
        Self {
            api_base: Self::default_api_base(),
            timeout_secs: Self::default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_user_agent() -> String {
    format!("deckhelper/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    #[serde(default = "ScoringConfig::default_match_base")]
    pub match_base: u32,
    #[serde(default = "ScoringConfig::default_card_is_commander")]
    pub card_is_commander: u32,
    #[serde(default = "ScoringConfig::default_bonus")]
    pub high_synergy: u32,
    #[serde(default = "ScoringConfig::default_bonus")]
    pub high_inclusion: u32,
    #[serde(default = "ScoringConfig::default_synergy_threshold")]
    pub synergy_threshold: f64,
    #[serde(default = "ScoringConfig::default_inclusion_threshold")]
    pub inclusion_threshold: f64,
    #[serde(default = "ScoringConfig::default_scale")]
    pub scale: f64,
    /// Synergy fetches allowed in flight at once
    #[serde(default = "ScoringConfig::default_max_concurrent")]
    pub max_concurrent: usize,
    /// Pause after each synergy fetch (ms)
    #[serde(default = "ScoringConfig::default_request_delay_ms")]
    pub request_delay_ms: u64,
}

impl ScoringConfig {
    fn default_match_base() -> u32 {
        ScoreWeights::default().match_base
    }

    fn default_card_is_commander() -> u32 {
        ScoreWeights::default().card_is_commander
    }

    fn default_bonus() -> u32 {
        1
    }

    fn default_synergy_threshold() -> f64 {
        ScoreWeights::default().synergy_threshold
    }

    fn default_inclusion_threshold() -> f64 {
        ScoreWeights::default().inclusion_threshold
    }

    fn default_scale() -> f64 {
        ScoreWeights::default().scale
    }

    fn default_max_concurrent() -> usize {
        8
    }

    fn default_request_delay_ms() -> u64 {
        50
    }

    pub fn weights(&self) -> ScoreWeights {
        ScoreWeights {
            match_base: self.match_base,
            card_is_commander: self.card_is_commander,
            high_synergy: self.high_synergy,
            high_inclusion: self.high_inclusion,
            synergy_threshold: self.synergy_threshold,
            inclusion_threshold: self.inclusion_threshold,
            scale: self.scale,
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        let weights = ScoreWeights::default();
        Self {
            match_base: weights.match_base,
            card_is_commander: weights.card_is_commander,
            high_synergy: weights.high_synergy,
            high_inclusion: weights.high_inclusion,
            synergy_threshold: weights.synergy_threshold,
            inclusion_threshold: weights.inclusion_threshold,
            scale: weights.scale,
            max_concurrent: Self::default_max_concurrent(),
            request_delay_ms: Self::default_request_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingConfig {
    #[serde(default = "RankingConfig::default_top_n")]
    pub top_n: usize,
}

impl RankingConfig {
    fn default_top_n() -> usize {
        crate::ranking::DEFAULT_TOP_N
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: Self::default_top_n(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_string()
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "Settings::default_env")]
    pub env: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub scryfall: ScryfallConfig,
    #[serde(default)]
    pub edhrec: EdhrecConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            env: Self::default_env(),
            server: ServerConfig::default(),
            scryfall: ScryfallConfig::default(),
            edhrec: EdhrecConfig::default(),
            scoring: ScoringConfig::default(),
            ranking: RankingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Settings {
    fn default_env() -> String {
        env::var("APP_ENV")
            .ok()
            .or_else(|| env::var("RUST_ENV").ok())
            .unwrap_or_else(|| "development".to_string())
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            !self.server.host.trim().is_empty(),
            "server.host cannot be empty"
        );
        anyhow::ensure!(self.server.port > 0, "server.port must be > 0");
        anyhow::ensure!(
            self.scryfall.api_base.starts_with("http"),
            "scryfall.api_base must be an http(s) URL"
        );
        anyhow::ensure!(
            self.edhrec.api_base.starts_with("http"),
            "edhrec.api_base must be an http(s) URL"
        );
        anyhow::ensure!(self.scryfall.max_pages > 0, "scryfall.max_pages must be > 0");
        anyhow::ensure!(
            self.scoring.max_concurrent > 0,
            "scoring.max_concurrent must be > 0"
        );
        anyhow::ensure!(
            (0.0..=1.0).contains(&self.scoring.synergy_threshold),
            "scoring.synergy_threshold must be within 0..=1"
        );
        anyhow::ensure!(
            self.scoring.inclusion_threshold >= 0.0,
            "scoring.inclusion_threshold must be >= 0"
        );
        anyhow::ensure!(self.scoring.scale > 0.0, "scoring.scale must be > 0");
        anyhow::ensure!(self.ranking.top_n > 0, "ranking.top_n must be > 0");
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct ConfigManager {
    settings: Settings,
    config_dir: PathBuf,
}

impl ConfigManager {
    /// Loads settings from the default config directory and environment.
    pub fn new() -> Result<Self> {
        Self::from_dir(Self::default_config_dir(), None)
    }

    pub fn from_dir(config_dir: PathBuf, env_override: Option<String>) -> Result<Self> {
        dotenv::dotenv().ok();
        let env_name = env_override.unwrap_or_else(Settings::default_env);
        let settings = Self::load_from_sources(&config_dir, &env_name)?;
        settings.validate()?;
        Ok(Self {
            settings,
            config_dir,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn into_settings(self) -> Settings {
        self.settings
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Get the default configuration directory.
    ///
    /// Priority order:
    /// 1. ~/.deckhelper/ (user-level config)
    /// 2. ./config/ (project-level config)
    /// 3. Current directory (fallback)
    pub fn default_config_dir() -> PathBuf {
        if let Some(home_dir) = dirs::home_dir() {
            let user_dir = home_dir.join(".deckhelper");
            if user_dir.exists() {
                info!("Using config directory: {:?}", user_dir);
                return user_dir;
            }
        }

        let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let project_config = cwd.join("config");
        if project_config.exists() {
            info!("Using config directory: {:?}", project_config);
            return project_config;
        }

        info!("Using config directory: {:?}", cwd);
        cwd
    }

    /// Creates `dir` if needed and writes `default.toml` unless one already exists.
    /// Returns the path of the default config file.
    pub fn write_default_config(dir: &Path) -> Result<PathBuf> {
        if !dir.exists() {
            fs::create_dir_all(dir).with_context(|| format!("creating {:?}", dir))?;
            info!("Created config directory: {:?}", dir);
        }

        let default_config = dir.join("default.toml");
        if !default_config.exists() {
            fs::write(&default_config, DEFAULT_CONFIG)
                .with_context(|| format!("writing {:?}", default_config))?;
            info!("Created default config: {:?}", default_config);
        }
        Ok(default_config)
    }

    /// Initialize `~/.deckhelper` with a default config file.
    pub fn init_user_config_dir() -> Result<PathBuf> {
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not determine home directory"))?;
        Self::write_default_config(&home_dir.join(".deckhelper"))
    }

    pub fn load_from_sources(config_dir: &Path, env_name: &str) -> Result<Settings> {
        let settings: Settings = cfg::Config::builder()
            .add_source(cfg::File::from(config_dir.join("default.toml")).required(false))
            .add_source(cfg::File::from(config_dir.join("default.yaml")).required(false))
            .add_source(cfg::File::from(config_dir.join("default.json")).required(false))
            .add_source(
                cfg::File::from(config_dir.join(format!("{}.toml", env_name))).required(false),
            )
            .add_source(cfg::File::from(config_dir.join("local.toml")).required(false))
            .add_source(cfg::Environment::with_prefix("DECKHELPER").separator("__"))
            .build()
            .context("building configuration")?
            .try_deserialize()
            .context("deserializing configuration")?;
        Ok(settings)
    }
}
