//! Language-model backed [`PlausibilityJudge`]

use std::sync::Arc;

use crate::services::llm_client::{ChatCompletion, ChatMessage};
use crate::types::{PlausibilityJudge, VerifyError};

const JUDGE_INSTRUCTIONS: &str = "You are a fact-checking assistant. Assess whether the web \
content supplied by the user is trustworthy: factually plausible, internally coherent and free \
of obvious misinformation. If it is, start your answer with \"Trustworthy\". If it is not, start \
with \"Not reliable\" and do not use the word trustworthy. Then explain your reasoning in a few \
sentences.";

/// Judge that asks a chat model for an assessment
pub struct LlmJudge {
    model: Arc<dyn ChatCompletion>,
}

impl LlmJudge {
    pub fn new(model: Arc<dyn ChatCompletion>) -> Self {
        Self { model }
    }

    fn build_messages(text: &str, references: &[String]) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(JUDGE_INSTRUCTIONS)];

        if !references.is_empty() {
            let formatted = references
                .iter()
                .enumerate()
                .map(|(i, reference)| format!("[Verified Reference {}]:\n{}", i + 1, reference))
                .collect::<Vec<_>>()
                .join("\n\n");
            messages.push(ChatMessage::system(format!(
                "Previously verified reference documents:\n{}",
                formatted
            )));
        }

        messages.push(ChatMessage::user(format!("Content to assess:\n{}", text)));
        messages
    }
}

#[async_trait::async_trait]
impl PlausibilityJudge for LlmJudge {
    async fn judge(&self, text: &str, references: &[String]) -> Result<String, VerifyError> {
        let messages = Self::build_messages(text, references);
        self.model.complete(&messages).await.map_err(|e| {
            tracing::error!(error = %e, "Judge completion failed");
            VerifyError::JudgeUnavailable(e.to_string())
        })
    }
}
