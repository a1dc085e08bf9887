pub mod collection;
pub mod commander;
pub mod config;
pub mod error;
pub mod naming;
pub mod ranking;
pub mod scoring;
pub mod types;

pub use collection::*;
pub use commander::*;
pub use config::{
    ConfigManager, EdhrecConfig, LoggingConfig, RankingConfig, ScoringConfig, ScryfallConfig,
    ServerConfig, Settings,
};
pub use error::*;
pub use naming::*;
pub use ranking::*;
pub use scoring::*;
pub use types::*;
