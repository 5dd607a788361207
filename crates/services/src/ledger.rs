//! Durable record of topics learned and quizzes completed.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use learn_core::model::{QuizResult, TopicName};
use learn_core::progress::{ChartPoint, ProgressSnapshot, ProgressStats, QuizHistoryEntry, RecentActivity};
use storage::repository::KeyValueStore;

/// Store key holding the JSON array of learned topic names.
pub const TOPICS_LEARNED_KEY: &str = "topicsLearned";
/// Store key holding the JSON array of quiz results.
pub const QUIZ_RESULTS_KEY: &str = "quizResults";

/// Single source of truth for historical learning activity.
///
/// Keeps an in-process snapshot and writes whole collections back to the
/// store after every change. Persistence failures never reach callers: reads
/// degrade to empty collections and failed writes are logged.
pub struct ProgressLedger {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<ProgressSnapshot>,
    // Held from mutation through `set` so a stale payload never lands last.
    writes: tokio::sync::Mutex<()>,
}

impl ProgressLedger {
    /// Create a ledger with empty state without reading the store.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            state: Mutex::new(ProgressSnapshot::default()),
            writes: tokio::sync::Mutex::new(()),
        }
    }

    /// Create a ledger whose in-process state starts from the persisted one.
    pub async fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let ledger = Self::new(store);
        let persisted = ledger.load_state().await;
        *ledger.lock() = persisted;
        ledger
    }

    /// Read both collections from the store.
    ///
    /// The in-process state is left alone, so entries recorded by this ledger
    /// are never dropped by a later read.
    pub async fn load_state(&self) -> ProgressSnapshot {
        let topics: Vec<TopicName> = self.read_collection(TOPICS_LEARNED_KEY).await;
        let results: Vec<QuizResult> = self.read_collection(QUIZ_RESULTS_KEY).await;
        ProgressSnapshot::from_parts(topics, results)
    }

    /// Record that `topic` was studied. Returns `true` if it was new.
    pub async fn record_topic_learned(&self, topic: TopicName) -> bool {
        let _write = self.writes.lock().await;
        let payload = {
            let mut state = self.lock();
            if !state.add_topic(topic) {
                return false;
            }
            encode(TOPICS_LEARNED_KEY, state.topics())
        };
        if let Some(payload) = payload {
            self.persist(TOPICS_LEARNED_KEY, &payload).await;
        }
        true
    }

    /// Append a completed quiz to the log.
    pub async fn record_quiz_result(&self, result: QuizResult) {
        let _write = self.writes.lock().await;
        let payload = {
            let mut state = self.lock();
            state.push_result(result);
            encode(QUIZ_RESULTS_KEY, state.results())
        };
        if let Some(payload) = payload {
            self.persist(QUIZ_RESULTS_KEY, &payload).await;
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.lock().clone()
    }

    #[must_use]
    pub fn average_score_percent(&self) -> u32 {
        self.lock().average_score_percent()
    }

    #[must_use]
    pub fn recent_activity(&self, n: usize) -> RecentActivity {
        self.lock().recent_activity(n)
    }

    #[must_use]
    pub fn chart_series(&self, k: usize) -> Vec<ChartPoint> {
        self.lock().chart_series(k)
    }

    #[must_use]
    pub fn stats(&self) -> ProgressStats {
        self.lock().stats()
    }

    #[must_use]
    pub fn quiz_history(&self, n: usize) -> Vec<QuizHistoryEntry> {
        self.lock().quiz_history(n)
    }

    fn lock(&self) -> MutexGuard<'_, ProgressSnapshot> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn read_collection<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let raw = match self.store.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                tracing::warn!(key, error = %err, "failed to read progress, starting empty");
                return Vec::new();
            }
        };
        decode_entries(key, &raw)
    }

    async fn persist(&self, key: &str, payload: &str) {
        if let Err(err) = self.store.set(key, payload).await {
            tracing::warn!(key, error = %err, "failed to persist progress");
        }
    }
}

fn encode<T: Serialize>(key: &str, items: &[T]) -> Option<String> {
    match serde_json::to_string(items) {
        Ok(payload) => Some(payload),
        Err(err) => {
            tracing::warn!(key, error = %err, "failed to serialize progress");
            None
        }
    }
}

/// Decode a JSON array, skipping entries that fail validation.
///
/// Anything other than an array decodes as empty.
fn decode_entries<T: DeserializeOwned>(key: &str, raw: &str) -> Vec<T> {
    let entries: Vec<Value> = match serde_json::from_str(raw) {
        Ok(entries) => entries,
        Err(err) => {
            tracing::warn!(key, error = %err, "stored progress is malformed, treating as empty");
            return Vec::new();
        }
    };
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(err) => {
                tracing::warn!(key, error = %err, "skipping malformed progress entry");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FailingStore, SlowFirstWriteStore, topic};
    use learn_core::time::fixed_now;
    use storage::repository::InMemoryStore;

    fn result(name: &str, score: u32, total: u32) -> QuizResult {
        QuizResult::new(topic(name), score, total, fixed_now()).unwrap()
    }

    #[tokio::test]
    async fn recording_a_topic_twice_keeps_one_entry() {
        let store = InMemoryStore::new();
        let ledger = ProgressLedger::new(Arc::new(store.clone()));

        assert!(ledger.record_topic_learned(topic("Rust")).await);
        assert!(!ledger.record_topic_learned(topic("Rust")).await);

        let reloaded = ProgressLedger::open(Arc::new(store)).await;
        assert_eq!(reloaded.snapshot().topics(), &[topic("Rust")]);
    }

    #[tokio::test]
    async fn quiz_result_round_trips_through_store() {
        let store = InMemoryStore::new();
        let ledger = ProgressLedger::new(Arc::new(store.clone()));
        let recorded = result("Biology", 3, 5);
        ledger.record_quiz_result(recorded.clone()).await;

        let snapshot = ProgressLedger::new(Arc::new(store)).load_state().await;
        assert_eq!(snapshot.results(), &[recorded]);
    }

    #[tokio::test]
    async fn persisted_layout_uses_fixed_keys() {
        let store = InMemoryStore::new();
        let ledger = ProgressLedger::new(Arc::new(store.clone()));
        ledger.record_topic_learned(topic("Rust")).await;
        ledger.record_quiz_result(result("Rust", 4, 5)).await;

        let topics = store.get(TOPICS_LEARNED_KEY).await.unwrap().unwrap();
        assert_eq!(topics, r#"["Rust"]"#);
        let results = store.get(QUIZ_RESULTS_KEY).await.unwrap().unwrap();
        assert_eq!(
            results,
            r#"[{"topic":"Rust","score":4,"total":5,"date":"2023-11-14T22:13:20Z"}]"#
        );
    }

    #[tokio::test]
    async fn malformed_values_load_as_empty() {
        let store = InMemoryStore::new();
        store.set(TOPICS_LEARNED_KEY, "{not json").await.unwrap();
        store.set(QUIZ_RESULTS_KEY, r#"{"topic":"x"}"#).await.unwrap();

        let snapshot = ProgressLedger::new(Arc::new(store)).load_state().await;
        assert!(snapshot.topics().is_empty());
        assert!(snapshot.results().is_empty());
    }

    #[tokio::test]
    async fn invalid_entries_are_skipped() {
        let store = InMemoryStore::new();
        store
            .set(
                QUIZ_RESULTS_KEY,
                r#"[
                    {"topic":"Math","score":9,"total":5,"date":"2024-01-01T00:00:00.000Z"},
                    {"topic":"Math","score":2,"total":5,"date":"2024-01-02T00:00:00.000Z"}
                ]"#,
            )
            .await
            .unwrap();
        store
            .set(TOPICS_LEARNED_KEY, r#"["Math", "", "Math", "Art"]"#)
            .await
            .unwrap();

        let snapshot = ProgressLedger::new(Arc::new(store)).load_state().await;
        assert_eq!(snapshot.results().len(), 1);
        assert_eq!(snapshot.results()[0].score(), 2);
        assert_eq!(snapshot.topics(), &[topic("Math"), topic("Art")]);
    }

    #[tokio::test]
    async fn storage_failures_are_not_surfaced() {
        let ledger = ProgressLedger::open(Arc::new(FailingStore)).await;
        assert_eq!(ledger.stats(), ProgressStats::default());

        assert!(ledger.record_topic_learned(topic("Chemistry")).await);
        ledger.record_quiz_result(result("Chemistry", 5, 5)).await;

        assert_eq!(ledger.stats().topics_learned, 1);
        assert_eq!(ledger.stats().quizzes_completed, 1);
    }

    #[tokio::test]
    async fn aggregates_follow_recorded_results() {
        let ledger = ProgressLedger::new(Arc::new(InMemoryStore::new()));
        ledger.record_quiz_result(result("a", 2, 5)).await;
        ledger.record_quiz_result(result("b", 4, 4)).await;

        assert_eq!(ledger.average_score_percent(), 70);
        assert_eq!(ledger.chart_series(5).len(), 2);
        assert_eq!(ledger.recent_activity(1).quizzes[0].topic().as_str(), "b");
        assert_eq!(ledger.quiz_history(10)[0].percent, 100);
    }

    #[tokio::test]
    async fn overlapping_writes_persist_every_result() {
        let store = SlowFirstWriteStore::default();
        let ledger = ProgressLedger::new(Arc::new(store.clone()));

        tokio::join!(
            ledger.record_quiz_result(result("first", 1, 5)),
            ledger.record_quiz_result(result("second", 2, 5)),
        );

        assert_eq!(ledger.snapshot().results().len(), 2);
        let persisted = ProgressLedger::open(Arc::new(store.inner())).await;
        assert_eq!(persisted.snapshot().results().len(), 2);
    }

    #[tokio::test]
    async fn load_state_leaves_unpersisted_entries_in_place() {
        let ledger = ProgressLedger::open(Arc::new(FailingStore)).await;
        ledger.record_quiz_result(result("Chemistry", 5, 5)).await;

        let persisted = ledger.load_state().await;
        assert!(persisted.results().is_empty());
        assert_eq!(ledger.snapshot().results().len(), 1);
    }
}
