//! Verification Pipeline
//!
//! Single pass, no state kept between requests:
//!
//! 1. **Extract**: fetch the URL and pull its narrative text
//! 2. **Length gate**: texts below `min_text_length` stop here with `TooShort`
//! 3. **Score ∥ Judge**: corpus similarity and plausibility judgment run concurrently
//! 4. **Decide**: Trusted iff the similarity gate and the judgment gate both pass
//!
//! # Error Handling
//! No retries. Any collaborator failure aborts the run with its own error kind;
//! a judge failure is never turned into an `Untrusted` verdict.
//!
//! # Example
//! ```rust,ignore
//! let pipeline = TrustPipeline::new(config, fetcher, corpus, judge);
//! let outcome = pipeline.verify_url("https://example.org/article").await?;
//! println!("{}", outcome.verdict);
//! ```

use std::sync::Arc;

use tracing::{debug, info, warn};
use trustgate_common::config::VerifierConfig;

use super::decision::{decide, similarity_gate};
use crate::extractors::TextExtractor;
use crate::judge::{judgment_result, truncate_chars};
use crate::scoring::score_against_corpus;
use crate::types::{
    ContentFetcher, CorpusEntry, CorpusStore, Document, PlausibilityJudge, SimilarityMatch,
    VerificationOutcome, VerifyError,
};

/// Trust-verification decision engine
pub struct TrustPipeline {
    config: VerifierConfig,
    extractor: TextExtractor,
    corpus: Arc<dyn CorpusStore>,
    judge: Arc<dyn PlausibilityJudge>,
}

impl TrustPipeline {
    pub fn new(
        config: VerifierConfig,
        fetcher: Arc<dyn ContentFetcher>,
        corpus: Arc<dyn CorpusStore>,
        judge: Arc<dyn PlausibilityJudge>,
    ) -> Self {
        Self {
            config,
            extractor: TextExtractor::new(fetcher),
            corpus,
            judge,
        }
    }

    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }

    /// Extractor sharing this pipeline's fetcher
    pub fn extractor(&self) -> &TextExtractor {
        &self.extractor
    }

    /// Fetch, extract and verify one URL
    pub async fn verify_url(&self, url: &str) -> Result<VerificationOutcome, VerifyError> {
        info!(url = %url, "Starting verification");
        let document = self.extractor.extract(url).await?;
        self.verify_document(document).await
    }

    /// Verify an already extracted document
    pub async fn verify_document(
        &self,
        document: Document,
    ) -> Result<VerificationOutcome, VerifyError> {
        let length = document.char_len();
        if length < self.config.min_text_length {
            warn!(
                url = %document.id,
                length,
                minimum = self.config.min_text_length,
                "Extracted text below minimum length"
            );
            return Err(VerifyError::TooShort {
                length,
                minimum: self.config.min_text_length,
            });
        }

        let prompt_text = truncate_chars(&document.text, self.config.max_prompt_chars);

        let (scored, assessment) = if self.config.include_references_in_prompt {
            // The judge needs the corpus snapshot, so load it first and share it
            let corpus = self.load_corpus(&document).await?;
            let references: Vec<String> = corpus
                .iter()
                .map(|entry| truncate_chars(&entry.text, self.config.max_prompt_chars).to_string())
                .collect();
            let assessment = self.judge.judge(prompt_text, &references).await;
            (Ok(self.score(&document, &corpus)), assessment)
        } else {
            tokio::join!(
                async {
                    let corpus = self.load_corpus(&document).await?;
                    Ok::<_, VerifyError>(self.score(&document, &corpus))
                },
                self.judge.judge(prompt_text, &[])
            )
        };

        let (corpus_size, matches) = scored?;
        let judgment = judgment_result(assessment?, &self.config.affirming_keywords);

        if corpus_size == 0 {
            info!(url = %document.id, "Reference corpus is empty; similarity gate passes by default");
        }

        let similarity_passed =
            similarity_gate(corpus_size, &matches, self.config.similarity_threshold);
        let verdict = decide(similarity_passed, judgment.affirms_trust);

        info!(
            url = %document.id,
            verdict = %verdict,
            similarity_passed,
            judgment_passed = judgment.affirms_trust,
            matches = matches.len(),
            "Verification complete"
        );

        Ok(VerificationOutcome {
            document,
            verdict,
            judgment,
            matches,
            similarity_passed,
        })
    }

    async fn load_corpus(&self, document: &Document) -> Result<Vec<CorpusEntry>, VerifyError> {
        let corpus = self.corpus.list_verified_texts(Some(&document.id)).await?;
        debug!(entries = corpus.len(), "Loaded reference corpus snapshot");
        Ok(corpus)
    }

    fn score(&self, document: &Document, corpus: &[CorpusEntry]) -> (usize, Vec<SimilarityMatch>) {
        let matches = score_against_corpus(&document.text, corpus, self.config.top_k);
        (corpus.len(), matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Verdict;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct PageFetcher(String);

    #[async_trait::async_trait]
    impl ContentFetcher for PageFetcher {
        async fn fetch(&self, _url: &str) -> Result<String, VerifyError> {
            Ok(self.0.clone())
        }
    }

    #[derive(Default)]
    struct StubCorpus {
        entries: Vec<CorpusEntry>,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CorpusStore for StubCorpus {
        async fn list_verified_texts(
            &self,
            _exclude_id: Option<&str>,
        ) -> Result<Vec<CorpusEntry>, VerifyError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.entries.clone())
        }
    }

    struct StubJudge {
        reply: &'static str,
        prompts: Mutex<Vec<(String, usize)>>,
    }

    impl StubJudge {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait::async_trait]
    impl PlausibilityJudge for StubJudge {
        async fn judge(&self, text: &str, references: &[String]) -> Result<String, VerifyError> {
            self.prompts
                .lock()
                .unwrap()
                .push((text.to_string(), references.len()));
            Ok(self.reply.to_string())
        }
    }

    fn pipeline(
        config: VerifierConfig,
        corpus: Arc<StubCorpus>,
        judge: Arc<StubJudge>,
    ) -> TrustPipeline {
        TrustPipeline::new(
            config,
            Arc::new(PageFetcher(String::new())),
            corpus,
            judge,
        )
    }

    fn long_text(words: usize) -> String {
        (0..words)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ")
    }

    #[tokio::test]
    async fn test_too_short_skips_corpus_and_judge() {
        let corpus = Arc::new(StubCorpus::default());
        let judge = Arc::new(StubJudge::new("trustworthy"));
        let pipeline = pipeline(VerifierConfig::default(), corpus.clone(), judge.clone());

        let result = pipeline
            .verify_document(Document::new("u", "x".repeat(99)))
            .await;

        assert!(matches!(
            result,
            Err(VerifyError::TooShort { length: 99, minimum: 100 })
        ));
        assert_eq!(corpus.calls.load(Ordering::SeqCst), 0);
        assert!(judge.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exactly_minimum_length_proceeds() {
        let corpus = Arc::new(StubCorpus::default());
        let judge = Arc::new(StubJudge::new("trustworthy"));
        let pipeline = pipeline(VerifierConfig::default(), corpus, judge);

        let outcome = pipeline
            .verify_document(Document::new("u", "é".repeat(100)))
            .await
            .unwrap();
        assert_eq!(outcome.verdict, Verdict::Trusted);
    }

    #[tokio::test]
    async fn test_prompt_truncated_to_max_chars() {
        let corpus = Arc::new(StubCorpus::default());
        let judge = Arc::new(StubJudge::new("trustworthy"));
        let config = VerifierConfig {
            max_prompt_chars: 150,
            ..Default::default()
        };
        let pipeline = pipeline(config, corpus, judge.clone());

        pipeline
            .verify_document(Document::new("u", long_text(200)))
            .await
            .unwrap();

        let prompts = judge.prompts.lock().unwrap();
        assert_eq!(prompts[0].0.chars().count(), 150);
        assert_eq!(prompts[0].1, 0);
    }

    #[tokio::test]
    async fn test_references_sent_when_enabled() {
        let text = long_text(30);
        let corpus = Arc::new(StubCorpus {
            entries: vec![CorpusEntry::new("a", text.clone()), CorpusEntry::new("b", text.clone())],
            ..Default::default()
        });
        let judge = Arc::new(StubJudge::new("trustworthy"));
        let config = VerifierConfig {
            include_references_in_prompt: true,
            ..Default::default()
        };
        let pipeline = pipeline(config, corpus.clone(), judge.clone());

        let outcome = pipeline.verify_document(Document::new("u", text)).await.unwrap();

        assert_eq!(outcome.verdict, Verdict::Trusted);
        assert_eq!(judge.prompts.lock().unwrap()[0].1, 2);
        assert_eq!(corpus.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_custom_threshold_from_config() {
        let candidate = long_text(30);
        let corpus = Arc::new(StubCorpus {
            entries: vec![CorpusEntry::new("partial", long_text(15))],
            ..Default::default()
        });
        let judge = Arc::new(StubJudge::new("trustworthy"));

        let strict = pipeline(VerifierConfig::default(), corpus.clone(), judge.clone());
        let outcome = strict
            .verify_document(Document::new("u", candidate.clone()))
            .await
            .unwrap();
        assert!(outcome.matches[0].score < 0.7);
        assert_eq!(outcome.verdict, Verdict::Untrusted);

        let lenient = pipeline(
            VerifierConfig {
                similarity_threshold: 0.1,
                ..Default::default()
            },
            corpus,
            judge,
        );
        let outcome = lenient.verify_document(Document::new("u", candidate)).await.unwrap();
        assert_eq!(outcome.verdict, Verdict::Trusted);
    }
}
