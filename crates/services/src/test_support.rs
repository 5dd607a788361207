use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use learn_core::model::{Difficulty, Flashcard, QUIZ_LENGTH, Question, TopicName};
use storage::repository::{InMemoryStore, KeyValueStore, StorageError};

use crate::error::GenerationError;
use crate::generation::GenerationClient;

/// Generation client returning canned content; unset responses fail.
#[derive(Default)]
pub(crate) struct ScriptedClient {
    explanation: Option<String>,
    quiz: Option<Vec<Question>>,
    flashcards: Option<Vec<Flashcard>>,
    summary: Option<String>,
    quote: Option<String>,
    calls: AtomicUsize,
}

impl ScriptedClient {
    pub(crate) fn with_explanation(mut self, text: &str) -> Self {
        self.explanation = Some(text.to_string());
        self
    }

    pub(crate) fn with_quiz(mut self, questions: Vec<Question>) -> Self {
        self.quiz = Some(questions);
        self
    }

    pub(crate) fn with_flashcards(mut self, cards: Vec<Flashcard>) -> Self {
        self.flashcards = Some(cards);
        self
    }

    pub(crate) fn with_summary(mut self, text: &str) -> Self {
        self.summary = Some(text.to_string());
        self
    }

    pub(crate) fn with_quote(mut self, text: &str) -> Self {
        self.quote = Some(text.to_string());
        self
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn scripted<T: Clone>(&self, value: Option<&T>) -> Result<T, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        value
            .cloned()
            .ok_or_else(|| GenerationError::Malformed("scripted failure".into()))
    }
}

#[async_trait]
impl GenerationClient for ScriptedClient {
    async fn explain(
        &self,
        _topic: &TopicName,
        _difficulty: Difficulty,
    ) -> Result<String, GenerationError> {
        self.scripted(self.explanation.as_ref())
    }

    async fn generate_quiz(&self, _topic: &TopicName) -> Result<Vec<Question>, GenerationError> {
        self.scripted(self.quiz.as_ref())
    }

    async fn generate_flashcards(
        &self,
        _topic: &TopicName,
    ) -> Result<Vec<Flashcard>, GenerationError> {
        self.scripted(self.flashcards.as_ref())
    }

    async fn summarize(&self, _text: &str) -> Result<String, GenerationError> {
        self.scripted(self.summary.as_ref())
    }

    async fn motivational_quote(&self) -> Result<String, GenerationError> {
        self.scripted(self.quote.as_ref())
    }
}

/// Store whose every read and write fails.
pub(crate) struct FailingStore;

#[async_trait]
impl KeyValueStore for FailingStore {
    async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Connection("offline".into()))
    }

    async fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Connection("offline".into()))
    }
}

/// In-memory store whose first write yields to the scheduler before landing.
#[derive(Clone, Default)]
pub(crate) struct SlowFirstWriteStore {
    inner: InMemoryStore,
    writes: Arc<AtomicUsize>,
}

impl SlowFirstWriteStore {
    pub(crate) fn inner(&self) -> InMemoryStore {
        self.inner.clone()
    }
}

#[async_trait]
impl KeyValueStore for SlowFirstWriteStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.writes.fetch_add(1, Ordering::SeqCst) == 0 {
            for _ in 0..20 {
                tokio::task::yield_now().await;
            }
        }
        self.inner.set(key, value).await
    }
}

pub(crate) fn question(i: usize, correct: usize) -> Question {
    Question::new(
        format!("Question {i}?"),
        vec!["A".into(), "B".into(), "C".into(), "D".into()],
        correct,
    )
    .unwrap()
}

/// A full quiz whose answer to question `i` is `i % 4`.
pub(crate) fn quiz() -> Vec<Question> {
    (0..QUIZ_LENGTH).map(|i| question(i, i % 4)).collect()
}

pub(crate) fn cards(n: usize) -> Vec<Flashcard> {
    (0..n)
        .map(|i| Flashcard::new(format!("front {i}"), format!("back {i}")).unwrap())
        .collect()
}

pub(crate) fn topic(name: &str) -> TopicName {
    TopicName::new(name).unwrap()
}
