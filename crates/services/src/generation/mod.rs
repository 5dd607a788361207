//! Boundary to the remote content-generation service.

mod http;

use async_trait::async_trait;

use learn_core::model::{
    Difficulty, Flashcard, FlashcardError, QUIZ_LENGTH, Question, QuestionError, TopicName,
};

use crate::error::GenerationError;

pub use http::{GenerationConfig, HttpGenerationClient};

/// Shown when a motivational quote cannot be fetched.
pub const FALLBACK_QUOTE: &str = "Every expert was once a beginner. Keep learning, keep growing! 🌱";

/// Requests AI-generated learning content.
///
/// Every call is single-shot: it either returns the full payload or fails
/// with a `GenerationError`. Retries belong to the transport, not to callers.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Explain `topic` at the requested depth.
    async fn explain(
        &self,
        topic: &TopicName,
        difficulty: Difficulty,
    ) -> Result<String, GenerationError>;

    /// Generate exactly `QUIZ_LENGTH` multiple-choice questions about `topic`.
    async fn generate_quiz(&self, topic: &TopicName) -> Result<Vec<Question>, GenerationError>;

    /// Generate a non-empty deck of flashcards about `topic`.
    async fn generate_flashcards(
        &self,
        topic: &TopicName,
    ) -> Result<Vec<Flashcard>, GenerationError>;

    /// Summarize a block of text.
    async fn summarize(&self, text: &str) -> Result<String, GenerationError>;

    async fn motivational_quote(&self) -> Result<String, GenerationError>;
}

/// Fetch a quote, substituting `FALLBACK_QUOTE` on any failure.
pub async fn quote_or_fallback(client: &dyn GenerationClient) -> String {
    match client.motivational_quote().await {
        Ok(quote) => quote,
        Err(err) => {
            tracing::warn!(error = %err, "motivational quote unavailable, using fallback");
            FALLBACK_QUOTE.to_string()
        }
    }
}

/// Keep well-formed questions in order and cut the set to `QUIZ_LENGTH`.
///
/// # Errors
///
/// Returns `GenerationError::IncompleteQuiz` if fewer than `QUIZ_LENGTH`
/// questions survive validation.
pub fn select_quiz_questions<I>(candidates: I) -> Result<Vec<Question>, GenerationError>
where
    I: IntoIterator<Item = Result<Question, QuestionError>>,
{
    let mut questions = Vec::with_capacity(QUIZ_LENGTH);
    for candidate in candidates {
        match candidate {
            Ok(question) => questions.push(question),
            Err(err) => tracing::debug!(error = %err, "dropping malformed question"),
        }
    }
    if questions.len() < QUIZ_LENGTH {
        return Err(GenerationError::IncompleteQuiz {
            expected: QUIZ_LENGTH,
            got: questions.len(),
        });
    }
    questions.truncate(QUIZ_LENGTH);
    Ok(questions)
}

/// Keep well-formed cards in order.
///
/// # Errors
///
/// Returns `GenerationError::EmptyDeck` if no card survives validation.
pub fn collect_flashcards<I>(candidates: I) -> Result<Vec<Flashcard>, GenerationError>
where
    I: IntoIterator<Item = Result<Flashcard, FlashcardError>>,
{
    let cards: Vec<Flashcard> = candidates
        .into_iter()
        .filter_map(|candidate| {
            candidate
                .map_err(|err| tracing::debug!(error = %err, "dropping malformed flashcard"))
                .ok()
        })
        .collect();
    if cards.is_empty() {
        return Err(GenerationError::EmptyDeck);
    }
    Ok(cards)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedClient, question};

    #[test]
    fn select_quiz_questions_requires_five_valid() {
        let mut candidates: Vec<Result<Question, QuestionError>> =
            (0..4).map(|i| Ok(question(i, 0))).collect();
        candidates.push(Err(QuestionError::EmptyPrompt));

        let err = select_quiz_questions(candidates).unwrap_err();
        assert!(matches!(
            err,
            GenerationError::IncompleteQuiz { expected: 5, got: 4 }
        ));
    }

    #[test]
    fn select_quiz_questions_truncates_extra_questions() {
        let candidates = (0..7).map(|i| Ok(question(i, 1)));
        let questions = select_quiz_questions(candidates).unwrap();
        assert_eq!(questions.len(), QUIZ_LENGTH);
        assert_eq!(questions[4].prompt(), "Question 4?");
    }

    #[test]
    fn collect_flashcards_rejects_empty_deck() {
        let err = collect_flashcards(vec![Err(FlashcardError::EmptyFront)]).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyDeck));
    }

    #[tokio::test]
    async fn quote_falls_back_silently() {
        let client = ScriptedClient::default();
        assert_eq!(quote_or_fallback(&client).await, FALLBACK_QUOTE);

        let client = ScriptedClient::default().with_quote("Stay curious.");
        assert_eq!(quote_or_fallback(&client).await, "Stay curious.");
    }
}
