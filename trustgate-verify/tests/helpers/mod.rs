//! Test Helper Utilities
//!
//! Stub collaborators and app builders shared by the trustgate-verify
//! integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use sqlx::SqlitePool;
use trustgate_common::config::VerifierConfig;
use trustgate_common::db::init_memory_database;
use trustgate_verify::services::{ChatCompletion, ChatMessage, CompletionError, SqliteCorpusStore};
use trustgate_verify::types::{
    ContentFetcher, CorpusEntry, CorpusStore, PlausibilityJudge, VerifyError,
};
use trustgate_verify::{AppState, TrustPipeline};

pub const ARTICLE_TEXT: &str = "The municipal water treatment plant publishes quarterly reports on \
contaminant levels and filtration performance for residents of the district.";

pub const UNRELATED_TEXT: &str = "Quantum chromodynamics describes gluons binding quarks inside \
hadrons through color charge interactions at femtometer scales.";

/// Wrap text in a minimal article page
pub fn page(text: &str) -> String {
    format!(
        "<html><head><title>t</title></head><body><nav><p>Menu</p></nav>\
         <article><p>{}</p></article><footer><p>Footer</p></footer></body></html>",
        text
    )
}

/// Fetcher serving canned pages; unknown URLs fail like a 404
#[derive(Default)]
pub struct StubFetcher {
    pages: HashMap<String, String>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn with_page(mut self, url: &str, html: String) -> Self {
        self.pages.insert(url.to_string(), html);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl ContentFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<String, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages.get(url).cloned().ok_or_else(|| VerifyError::Fetch {
            url: url.to_string(),
            reason: "HTTP status 404 Not Found".to_string(),
        })
    }
}

/// In-memory corpus that counts snapshot reads
#[derive(Default)]
pub struct StubCorpus {
    entries: Vec<CorpusEntry>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubCorpus {
    pub fn new(entries: Vec<CorpusEntry>) -> Self {
        Self {
            entries,
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CorpusStore for StubCorpus {
    async fn list_verified_texts(
        &self,
        exclude_id: Option<&str>,
    ) -> Result<Vec<CorpusEntry>, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(VerifyError::CorpusUnavailable(
                "database is locked".to_string(),
            ));
        }
        Ok(self
            .entries
            .iter()
            .filter(|e| Some(e.id.as_str()) != exclude_id)
            .cloned()
            .collect())
    }
}

/// Judge with a canned assessment
pub struct StubJudge {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl StubJudge {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            reply: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl PlausibilityJudge for StubJudge {
    async fn judge(&self, _text: &str, _references: &[String]) -> Result<String, VerifyError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .clone()
            .ok_or_else(|| VerifyError::JudgeUnavailable("connection refused".to_string()))
    }
}

/// Chat model returning a canned reply and recording what it was sent
#[derive(Default)]
pub struct StubChatModel {
    pub seen: Mutex<Vec<ChatMessage>>,
}

#[async_trait::async_trait]
impl ChatCompletion for StubChatModel {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, CompletionError> {
        self.seen.lock().unwrap().extend_from_slice(messages);
        Ok("stub answer".to_string())
    }
}

/// Pipeline over stub collaborators with default thresholds
pub fn stub_pipeline(
    fetcher: Arc<StubFetcher>,
    corpus: Arc<StubCorpus>,
    judge: Arc<StubJudge>,
) -> TrustPipeline {
    TrustPipeline::new(VerifierConfig::default(), fetcher, corpus, judge)
}

/// Router state plus handles for inspecting the stubs afterwards
pub struct TestApp {
    pub state: AppState,
    pub db: SqlitePool,
    pub fetcher: Arc<StubFetcher>,
    pub judge: Arc<StubJudge>,
    pub chat_model: Arc<StubChatModel>,
}

/// App backed by an in-memory store that doubles as the corpus
pub async fn test_app(fetcher: StubFetcher, judge: StubJudge) -> TestApp {
    let db = init_memory_database().await.unwrap();
    let corpus = Arc::new(SqliteCorpusStore::new(db.clone(), 1));
    test_app_with_corpus(db, fetcher, corpus, judge)
}

pub fn test_app_with_corpus(
    db: SqlitePool,
    fetcher: StubFetcher,
    corpus: Arc<dyn CorpusStore>,
    judge: StubJudge,
) -> TestApp {
    let fetcher = Arc::new(fetcher);
    let judge = Arc::new(judge);
    let chat_model = Arc::new(StubChatModel::default());

    let pipeline = Arc::new(TrustPipeline::new(
        VerifierConfig::default(),
        fetcher.clone(),
        corpus,
        judge.clone(),
    ));
    let state = AppState::new(db.clone(), pipeline, chat_model.clone());

    TestApp {
        state,
        db,
        fetcher,
        judge,
        chat_model,
    }
}
