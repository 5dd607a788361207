use std::sync::Arc;

use learn_core::model::{Flashcard, TopicName};

use crate::error::{FlashcardError, GenerationError, ValidationError};
use crate::generation::GenerationClient;

/// A generated deck being studied one card at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudyDeck {
    topic: TopicName,
    cards: Vec<Flashcard>,
    index: usize,
    flipped: bool,
}

impl StudyDeck {
    #[must_use]
    pub fn topic(&self) -> &TopicName {
        &self.topic
    }

    #[must_use]
    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the back of the current card is showing.
    #[must_use]
    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    #[must_use]
    pub fn current_card(&self) -> &Flashcard {
        &self.cards[self.index]
    }

    /// Text of the visible side of the current card.
    #[must_use]
    pub fn visible_side(&self) -> &str {
        let card = self.current_card();
        if self.flipped { card.back() } else { card.front() }
    }

    /// One-based position and deck size, e.g. `(3, 10)`.
    #[must_use]
    pub fn position(&self) -> (usize, usize) {
        (self.index + 1, self.cards.len())
    }

    #[must_use]
    pub fn is_first(&self) -> bool {
        self.index == 0
    }

    #[must_use]
    pub fn is_last(&self) -> bool {
        self.index + 1 == self.cards.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FlashcardState {
    #[default]
    Idle,
    Generating {
        topic: TopicName,
    },
    Studying(StudyDeck),
}

impl FlashcardState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FlashcardState::Idle => "idle",
            FlashcardState::Generating { .. } => "generating",
            FlashcardState::Studying(_) => "studying",
        }
    }
}

/// Drives generation and navigation of a flashcard deck.
///
/// Study sessions are not recorded as progress.
pub struct FlashcardSession {
    client: Arc<dyn GenerationClient>,
    state: FlashcardState,
}

impl FlashcardSession {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self {
            client,
            state: FlashcardState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &FlashcardState {
        &self.state
    }

    #[must_use]
    pub fn deck(&self) -> Option<&StudyDeck> {
        match &self.state {
            FlashcardState::Studying(deck) => Some(deck),
            _ => None,
        }
    }

    /// Generate a deck for `topic` and start studying its first card.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::InvalidTransition` unless idle,
    /// `FlashcardError::Validation` for a blank topic and
    /// `FlashcardError::Generation` on failure or an empty deck. On error the
    /// session is idle.
    pub async fn start(&mut self, topic: &str) -> Result<usize, FlashcardError> {
        if !matches!(self.state, FlashcardState::Idle) {
            return Err(FlashcardError::InvalidTransition {
                action: "start",
                state: self.state.name(),
            });
        }
        let topic = TopicName::new(topic).map_err(|_| ValidationError::EmptyTopic)?;

        self.state = FlashcardState::Generating {
            topic: topic.clone(),
        };
        let generated = self
            .client
            .generate_flashcards(&topic)
            .await
            .and_then(|cards| {
                if cards.is_empty() {
                    Err(GenerationError::EmptyDeck)
                } else {
                    Ok(cards)
                }
            });

        match generated {
            Ok(cards) => {
                let count = cards.len();
                self.state = FlashcardState::Studying(StudyDeck {
                    topic,
                    cards,
                    index: 0,
                    flipped: false,
                });
                Ok(count)
            }
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "flashcard generation failed");
                self.state = FlashcardState::Idle;
                Err(err.into())
            }
        }
    }

    /// Turn the current card over.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::InvalidTransition` when not studying.
    pub fn flip(&mut self) -> Result<(), FlashcardError> {
        let deck = self.deck_mut("flip")?;
        deck.flipped = !deck.flipped;
        Ok(())
    }

    /// Move to the next card, showing its front. No-op on the last card.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::InvalidTransition` when not studying.
    pub fn next(&mut self) -> Result<(), FlashcardError> {
        let deck = self.deck_mut("move to the next card")?;
        if !deck.is_last() {
            deck.index += 1;
            deck.flipped = false;
        }
        Ok(())
    }

    /// Move to the previous card, showing its front. No-op on the first card.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::InvalidTransition` when not studying.
    pub fn previous(&mut self) -> Result<(), FlashcardError> {
        let deck = self.deck_mut("move to the previous card")?;
        if !deck.is_first() {
            deck.index -= 1;
            deck.flipped = false;
        }
        Ok(())
    }

    /// Drop the current deck and go back to topic entry.
    ///
    /// # Errors
    ///
    /// Returns `FlashcardError::InvalidTransition` when not studying.
    pub fn new_deck(&mut self) -> Result<(), FlashcardError> {
        self.deck_mut("start a new deck")?;
        self.state = FlashcardState::Idle;
        Ok(())
    }

    fn deck_mut(&mut self, action: &'static str) -> Result<&mut StudyDeck, FlashcardError> {
        match &mut self.state {
            FlashcardState::Studying(deck) => Ok(deck),
            other => Err(FlashcardError::InvalidTransition {
                action,
                state: other.name(),
            }),
        }
    }
}
