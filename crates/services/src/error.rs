//! Shared error types for the services crate.

use thiserror::Error;

use learn_core::model::QuizResultError;
use storage::sqlite::SqliteInitError;

/// User input rejected before any remote call is made.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("please enter a topic")]
    EmptyTopic,
    #[error("please enter some text")]
    EmptyText,
}

/// Errors emitted by a `GenerationClient`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GenerationError {
    #[error("content generation is not configured")]
    Disabled,
    #[error("generation request input is empty")]
    EmptyInput,
    #[error("generation returned an empty response")]
    EmptyResponse,
    #[error("generation request failed with status {0}")]
    HttpStatus(reqwest::StatusCode),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("malformed generation response: {0}")]
    Malformed(String),
    #[error("expected {expected} well-formed questions, got {got}")]
    IncompleteQuiz { expected: usize, got: usize },
    #[error("generation returned no flashcards")]
    EmptyDeck,
}

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("cannot {action} while the quiz is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
    #[error("option {index} does not exist (question has {len} options)")]
    OptionOutOfRange { index: usize, len: usize },
    #[error("select an answer before continuing")]
    NoSelection,
    #[error(transparent)]
    Result(#[from] QuizResultError),
}

/// Errors emitted by `FlashcardSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("cannot {action} while the deck is {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

/// Errors emitted by `ExplainService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExplainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}

/// Errors emitted by `SummaryService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SummaryError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
    #[error("failed to save summary: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Generation(#[from] GenerationError),
}
