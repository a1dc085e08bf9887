pub mod candidates;
pub mod edhrec;
pub mod memory;
pub mod pipeline;
pub mod query;
pub mod scorer;
pub mod scryfall;
pub mod traits;

pub use candidates::CandidateGenerator;
pub use edhrec::EdhrecClient;
pub use memory::{StaticCardDatabase, StaticSynergySource};
pub use pipeline::Recommender;
pub use query::SearchQuery;
pub use scorer::SynergyScorer;
pub use scryfall::ScryfallClient;
pub use traits::{CardDatabase, SynergySource};
