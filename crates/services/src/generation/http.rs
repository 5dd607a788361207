use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use learn_core::model::{Difficulty, Flashcard, Question, TopicName};

use super::{GenerationClient, collect_flashcards, select_quiz_questions};
use crate::error::GenerationError;

const DEFAULT_TIMEOUT_SECS: u64 = 60;

const EXPLAIN_FN: &str = "ai-explain";
const QUIZ_FN: &str = "generate-quiz";
const FLASHCARDS_FN: &str = "generate-flashcards";
const SUMMARIZE_FN: &str = "summarize-text";
const QUOTE_FN: &str = "motivational-quote";

#[derive(Clone, Debug)]
pub struct GenerationConfig {
    /// Base URL under which each generation function is served.
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
}

impl GenerationConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read `LEARN_AI_BASE_URL`, `LEARN_AI_API_KEY` and `LEARN_AI_TIMEOUT_SECS`.
    ///
    /// Returns `None` when no base URL is set.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("LEARN_AI_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        let api_key = env::var("LEARN_AI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());
        let timeout = env::var("LEARN_AI_TIMEOUT_SECS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Some(Self {
            base_url,
            api_key,
            timeout,
        })
    }
}

/// `GenerationClient` that calls the generation functions over HTTP.
#[derive(Clone)]
pub struct HttpGenerationClient {
    client: Client,
    config: Option<GenerationConfig>,
}

impl HttpGenerationClient {
    /// Build a client from environment configuration.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Http` if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::new(GenerationConfig::from_env())
    }

    /// Build a client; `None` yields a disabled client whose calls all fail.
    ///
    /// # Errors
    ///
    /// Returns `GenerationError::Http` if the HTTP client cannot be built.
    pub fn new(config: Option<GenerationConfig>) -> Result<Self, GenerationError> {
        let client = match &config {
            Some(config) => Client::builder().timeout(config.timeout).build()?,
            None => Client::new(),
        };
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }

    async fn invoke<B, R>(&self, function: &str, body: &B) -> Result<R, GenerationError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;
        let url = format!("{}/{function}", config.base_url.trim_end_matches('/'));
        tracing::debug!(function, "invoking generation function");

        let mut request = self.client.post(url).json(body);
        if let Some(api_key) = &config.api_key {
            request = request.bearer_auth(api_key);
        }
        let response = request.send().await?;

        if !response.status().is_success() {
            tracing::debug!(function, status = %response.status(), "generation function failed");
            return Err(GenerationError::HttpStatus(response.status()));
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|err| GenerationError::Malformed(err.to_string()))
    }
}

fn non_blank(text: String) -> Result<String, GenerationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenerationError::EmptyResponse);
    }
    Ok(trimmed.to_string())
}

#[async_trait]
impl GenerationClient for HttpGenerationClient {
    async fn explain(
        &self,
        topic: &TopicName,
        difficulty: Difficulty,
    ) -> Result<String, GenerationError> {
        let body: ExplainResponse = self
            .invoke(
                EXPLAIN_FN,
                &ExplainRequest {
                    topic: topic.as_str(),
                    difficulty,
                },
            )
            .await?;
        non_blank(body.explanation)
    }

    async fn generate_quiz(&self, topic: &TopicName) -> Result<Vec<Question>, GenerationError> {
        let body: QuizResponse = self
            .invoke(
                QUIZ_FN,
                &TopicRequest {
                    topic: topic.as_str(),
                },
            )
            .await?;
        select_quiz_questions(body.questions.into_iter().filter_map(WireQuestion::parse))
    }

    async fn generate_flashcards(
        &self,
        topic: &TopicName,
    ) -> Result<Vec<Flashcard>, GenerationError> {
        let body: FlashcardsResponse = self
            .invoke(
                FLASHCARDS_FN,
                &TopicRequest {
                    topic: topic.as_str(),
                },
            )
            .await?;
        collect_flashcards(body.flashcards.into_iter().filter_map(WireFlashcard::parse))
    }

    async fn summarize(&self, text: &str) -> Result<String, GenerationError> {
        if text.trim().is_empty() {
            return Err(GenerationError::EmptyInput);
        }
        let body: SummaryResponse = self.invoke(SUMMARIZE_FN, &SummaryRequest { text }).await?;
        non_blank(body.summary)
    }

    async fn motivational_quote(&self) -> Result<String, GenerationError> {
        let body: QuoteResponse = self.invoke(QUOTE_FN, &serde_json::json!({})).await?;
        non_blank(body.quote)
    }
}

//
// ─── WIRE TYPES ────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
struct ExplainRequest<'a> {
    topic: &'a str,
    difficulty: Difficulty,
}

#[derive(Debug, Serialize)]
struct TopicRequest<'a> {
    topic: &'a str,
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct ExplainResponse {
    explanation: String,
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    quote: String,
}

// Entries stay as raw JSON so one malformed item does not sink the payload.
#[derive(Debug, Deserialize)]
struct QuizResponse {
    questions: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct FlashcardsResponse {
    flashcards: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct WireQuestion {
    question: String,
    options: Vec<String>,
    correct: i64,
}

impl WireQuestion {
    /// `None` means the entry is not even shaped like a question.
    fn parse(value: Value) -> Option<Result<Question, learn_core::model::QuestionError>> {
        let wire: WireQuestion = match serde_json::from_value(value) {
            Ok(wire) => wire,
            Err(err) => {
                tracing::debug!(error = %err, "skipping undecodable question");
                return None;
            }
        };
        let Ok(correct) = usize::try_from(wire.correct) else {
            tracing::debug!(correct = wire.correct, "skipping question with negative answer index");
            return None;
        };
        Some(Question::new(wire.question, wire.options, correct))
    }
}

#[derive(Debug, Deserialize)]
struct WireFlashcard {
    front: String,
    back: String,
}

impl WireFlashcard {
    fn parse(value: Value) -> Option<Result<Flashcard, learn_core::model::FlashcardError>> {
        match serde_json::from_value::<WireFlashcard>(value) {
            Ok(wire) => Some(Flashcard::new(wire.front, wire.back)),
            Err(err) => {
                tracing::debug!(error = %err, "skipping undecodable flashcard");
                None
            }
        }
    }
}
