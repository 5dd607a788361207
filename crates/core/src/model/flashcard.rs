use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum FlashcardError {
    #[error("flashcard front cannot be empty")]
    EmptyFront,
    #[error("flashcard back cannot be empty")]
    EmptyBack,
}

/// A two-sided study card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    front: String,
    back: String,
}

impl Flashcard {
    /// Build a card, trimming both sides.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError` if either side is blank.
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Result<Self, FlashcardError> {
        let front = front.into().trim().to_string();
        let back = back.into().trim().to_string();
        if front.is_empty() {
            return Err(FlashcardError::EmptyFront);
        }
        if back.is_empty() {
            return Err(FlashcardError::EmptyBack);
        }
        Ok(Self { front, back })
    }

    #[must_use]
    pub fn front(&self) -> &str {
        &self.front
    }

    #[must_use]
    pub fn back(&self) -> &str {
        &self.back
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_sides() {
        assert_eq!(Flashcard::new(" ", "b").unwrap_err(), FlashcardError::EmptyFront);
        assert_eq!(Flashcard::new("f", "").unwrap_err(), FlashcardError::EmptyBack);
    }

    #[test]
    fn trims_sides() {
        let card = Flashcard::new(" hola ", " hello ").unwrap();
        assert_eq!(card.front(), "hola");
        assert_eq!(card.back(), "hello");
    }
}
