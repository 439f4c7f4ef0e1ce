//! qabot common library
//!
//! Everything that does not touch the terminal: the knowledge base model,
//! its JSON file store, the fuzzy question matcher and user configuration.

pub mod config;
pub mod error;
pub mod knowledge;
pub mod matcher;
pub mod store;

pub use config::{ColorMode, KnowledgeConfig, OutputConfig, QabotConfig, KB_PATH_ENV};
pub use error::StoreError;
pub use knowledge::{KnowledgeBase, QaPair};
pub use matcher::{find_best_match, get_answer, similarity, BestMatch, SIMILARITY_THRESHOLD};
pub use store::{load_or_empty, JsonFileStore, KnowledgeStore, Loaded, DEFAULT_KB_PATH};
