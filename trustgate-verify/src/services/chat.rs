//! Trust-aware augmented chat
//!
//! Stored documents are grouped by verification level; ad-hoc URLs are
//! extracted live and labelled as unchecked. The chat model sees each group
//! under its own heading so it can weigh sources by trust.

use futures::future::join_all;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{debug, warn};
use trustgate_common::db::{self, VerificationLevel};

use super::llm_client::{ChatCompletion, ChatMessage, CompletionError};
use crate::extractors::TextExtractor;

const SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's question based on the \
provided context. Some context documents can have a known level of trust, and others do not. Use \
the trust level to determine the reliability of the information. If the context doesn't contain \
relevant information, say so shortly and ignore it.";

pub const NO_CONTEXT: &str = "No context provided.";

/// Augmented chat errors
#[derive(Debug, Error)]
pub enum ChatError {
    #[error("Stored document has no content: {0}")]
    EmptyStoredContent(String),

    #[error("Database error: {0}")]
    Database(#[from] trustgate_common::Error),

    #[error("Chat model error: {0}")]
    Completion(#[from] CompletionError),
}

/// Context texts bucketed by trust
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ChatContext {
    pub unchecked: Vec<String>,
    pub unknown: Vec<String>,
    pub machine_checked: Vec<String>,
    pub spot_checked: Vec<String>,
    pub human_verified: Vec<String>,
}

impl ChatContext {
    pub fn is_empty(&self) -> bool {
        self.unchecked.is_empty()
            && self.unknown.is_empty()
            && self.machine_checked.is_empty()
            && self.spot_checked.is_empty()
            && self.human_verified.is_empty()
    }

    fn push_stored(&mut self, level: i64, content: String) {
        match VerificationLevel::from_i64(level) {
            VerificationLevel::MachineChecked => self.machine_checked.push(content),
            VerificationLevel::SpotChecked => self.spot_checked.push(content),
            VerificationLevel::HumanVerified => self.human_verified.push(content),
            VerificationLevel::Untrusted => self.unknown.push(content),
        }
    }
}

/// Collect context for a chat request
///
/// Stored ids that are not in the store are skipped. A stored document with
/// empty content fails the whole request. Unchecked URLs that cannot be
/// extracted are skipped with a warning.
pub async fn gather_context(
    pool: &SqlitePool,
    extractor: &TextExtractor,
    trusted_ids: &[String],
    unchecked_urls: &[String],
) -> Result<ChatContext, ChatError> {
    let mut context = ChatContext::default();

    for id in trusted_ids {
        let Some(document) = db::get_document(pool, id).await? else {
            debug!(id = %id, "Trusted document not found in store, skipping");
            continue;
        };

        match document.content {
            Some(content) if !content.is_empty() => {
                context.push_stored(document.verification_level, content)
            }
            _ => return Err(ChatError::EmptyStoredContent(document.id)),
        }
    }

    let extracted = join_all(unchecked_urls.iter().map(|url| extractor.extract(url))).await;
    for (url, result) in unchecked_urls.iter().zip(extracted) {
        match result {
            Ok(document) => context.unchecked.push(document.text),
            Err(e) => warn!(url = %url, error = %e, "Skipping unchecked source"),
        }
    }

    Ok(context)
}

/// Render context sections in trust order, lowest first
pub fn format_context(context: &ChatContext) -> String {
    if context.is_empty() {
        return NO_CONTEXT.to_string();
    }

    let sections = [
        ("UNCHECKED SOURCES", "Unchecked Source", &context.unchecked),
        ("UNKNOWN TRUST LEVEL SOURCES", "Unknown Trust Level Source", &context.unknown),
        ("MACHINE CHECKED SOURCES", "Machine Checked Source", &context.machine_checked),
        (
            "AI ASSISTED SPOT CHECKED SOURCES",
            "AI Assisted Spot Checked Source",
            &context.spot_checked,
        ),
        ("HUMAN VERIFIED SOURCES", "Human Verified Source", &context.human_verified),
    ];

    sections
        .iter()
        .filter(|(_, _, texts)| !texts.is_empty())
        .map(|(heading, label, texts)| {
            let body = texts
                .iter()
                .enumerate()
                .map(|(i, text)| format!("[{} {}]:\n{}", label, i + 1, text))
                .collect::<Vec<_>>()
                .join("\n\n");
            format!("{}:\n{}", heading, body)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Ask the chat model `prompt` against the formatted context
pub async fn answer(
    model: &dyn ChatCompletion,
    prompt: &str,
    context: &ChatContext,
) -> Result<String, ChatError> {
    let messages = [
        ChatMessage::system(SYSTEM_PROMPT),
        ChatMessage::system(format!("Context information:\n{}\n\n", format_context(context))),
        ChatMessage::user(format!(
            "Please answer the following question based on the context provided: {}",
            prompt
        )),
    ];

    Ok(model.complete(&messages).await?)
}
