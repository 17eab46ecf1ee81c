//! Service modules for trust verification
//!
//! Outbound clients and storage adapters behind the pipeline's collaborator
//! traits, plus the trust-aware chat built on top of them.

pub mod chat;
pub mod corpus_store;
pub mod llm_client;

pub use chat::{ChatContext, ChatError};
pub use corpus_store::SqliteCorpusStore;
pub use llm_client::{ChatCompletion, ChatMessage, CompletionError, OpenAiClient};
