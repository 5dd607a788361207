mod flashcards;
mod quiz;

// Public API of the session subsystem.
pub use crate::error::{FlashcardError, QuizError};
pub use flashcards::{FlashcardSession, FlashcardState, StudyDeck};
pub use quiz::{AdvanceOutcome, QuizProgress, QuizSession, QuizState};
