//! Dispatcher integration tests
//!
//! Exercises the full decision path with a scripted search backend; no
//! network access required.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use aria_assistant::{
    DispatchPolicy, Dispatcher, Error, FaqStore, NO_RESULTS_MESSAGE, SEARCH_FAILED_REPLY,
    SEARCH_UNAVAILABLE_REPLY, SearchBackend, SearchResult,
};

mod common;

use common::{faq_store, result};

/// Query log shared between a test and its scripted backend
type QueryLog = Arc<Mutex<Vec<(String, usize)>>>;

/// Search backend double: returns a fixed outcome and records every call
struct ScriptedSearch {
    outcome: Result<Vec<SearchResult>, String>,
    log: QueryLog,
}

impl ScriptedSearch {
    fn returning(results: Vec<SearchResult>) -> (Box<dyn SearchBackend>, QueryLog) {
        let log = QueryLog::default();
        let backend = Box::new(Self {
            outcome: Ok(results),
            log: Arc::clone(&log),
        });
        (backend, log)
    }

    fn failing(message: &str) -> (Box<dyn SearchBackend>, QueryLog) {
        let log = QueryLog::default();
        let backend = Box::new(Self {
            outcome: Err(message.to_string()),
            log: Arc::clone(&log),
        });
        (backend, log)
    }
}

#[async_trait]
impl SearchBackend for ScriptedSearch {
    async fn search(
        &self,
        query: &str,
        max_results: usize,
    ) -> aria_assistant::Result<Vec<SearchResult>> {
        self.log
            .lock()
            .unwrap()
            .push((query.to_string(), max_results));

        match &self.outcome {
            Ok(results) => Ok(results.clone()),
            Err(message) => Err(Error::Search(message.clone())),
        }
    }
}

fn dispatcher(
    faq: FaqStore,
    search: Option<Box<dyn SearchBackend>>,
    max_results: usize,
) -> Dispatcher {
    Dispatcher::new(faq, search, DispatchPolicy { max_results })
}

#[tokio::test]
async fn faq_answer_wins_even_with_trigger_syntax() {
    // the utterance is both an exact FAQ key and a search trigger
    let faq = faq_store(&[("search: weather today", "Look outside!")], 0.85);
    let (backend, log) = ScriptedSearch::returning(vec![result("A", "s", "l")]);
    let dispatcher = dispatcher(faq, Some(backend), 5);

    let reply = dispatcher.respond("search: weather today").await;

    assert_eq!(reply, "Look outside!");
    assert!(log.lock().unwrap().is_empty(), "search must not be called");
}

#[tokio::test]
async fn fuzzy_faq_match_returns_answer() {
    let faq = faq_store(&[("hello", "hi there")], 0.85);
    let dispatcher = dispatcher(faq, None, 5);

    // one-letter edit scores 8/9 ≈ 0.889
    assert_eq!(dispatcher.respond("helo").await, "hi there");
}

#[tokio::test]
async fn fuzzy_match_below_strict_cutoff_falls_through() {
    let faq = faq_store(&[("hello", "hi there")], 0.9);
    let dispatcher = dispatcher(faq, None, 5);

    let reply = dispatcher.respond("helo").await;
    assert_eq!(
        reply,
        "You said: \"helo\". I don't have an answer for that yet."
    );
}

#[tokio::test]
async fn default_reply_echoes_utterance_verbatim() {
    let dispatcher = dispatcher(faq_store(&[], 0.85), None, 5);

    let reply = dispatcher.respond("how are you?").await;
    assert_eq!(
        reply,
        "You said: \"how are you?\". I don't have an answer for that yet."
    );
}

#[tokio::test]
async fn trigger_extracts_exact_query() {
    let (backend, log) = ScriptedSearch::returning(vec![]);
    let dispatcher = dispatcher(faq_store(&[], 0.85), Some(backend), 5);

    dispatcher.respond("search: weather today").await;

    let calls = log.lock().unwrap();
    assert_eq!(calls.as_slice(), &[("weather today".to_string(), 5)]);
}

#[tokio::test]
async fn max_results_bound_is_forwarded() {
    let (backend, log) = ScriptedSearch::returning(vec![]);
    let dispatcher = dispatcher(faq_store(&[], 0.85), Some(backend), 3);

    dispatcher.respond("search: rust news").await;

    assert_eq!(log.lock().unwrap()[0].1, 3);
}

#[tokio::test]
async fn results_are_summarized_in_numbered_style() {
    let (backend, _log) = ScriptedSearch::returning(vec![
        result("A", "s1", "L1"),
        result("B", "s2", "L2"),
    ]);
    let dispatcher = dispatcher(faq_store(&[], 0.85), Some(backend), 5);

    let reply = dispatcher.respond("search: anything").await;
    assert_eq!(reply, "1. A - s1 (Source: L1)\n2. B - s2 (Source: L2)");
}

#[tokio::test]
async fn empty_results_yield_fixed_message() {
    let (backend, _log) = ScriptedSearch::returning(vec![]);
    let dispatcher = dispatcher(faq_store(&[], 0.85), Some(backend), 5);

    assert_eq!(dispatcher.respond("search: nothing").await, NO_RESULTS_MESSAGE);
}

#[tokio::test]
async fn backend_failure_becomes_apology() {
    let (backend, log) = ScriptedSearch::failing("connection refused");
    let dispatcher = dispatcher(faq_store(&[], 0.85), Some(backend), 5);

    let reply = dispatcher.respond("search: weather").await;

    assert_eq!(reply, SEARCH_FAILED_REPLY);
    assert_eq!(log.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_backend_reports_unavailable() {
    let dispatcher = dispatcher(faq_store(&[], 0.85), None, 5);

    let reply = dispatcher.respond("search: x").await;
    assert_eq!(reply, SEARCH_UNAVAILABLE_REPLY);
}

#[tokio::test]
async fn repeated_calls_are_independent() {
    let (backend, log) = ScriptedSearch::returning(vec![result("A", "s", "l")]);
    let faq = faq_store(&[("hello", "hi there")], 0.85);
    let dispatcher = dispatcher(faq, Some(backend), 5);

    assert_eq!(dispatcher.respond("hello").await, "hi there");
    let first = dispatcher.respond("search: rust").await;
    let second = dispatcher.respond("search: rust").await;

    assert_eq!(first, second);
    assert_eq!(log.lock().unwrap().len(), 2);
}
