mod difficulty;
mod flashcard;
mod quiz;
mod topic;

pub use difficulty::{Difficulty, DifficultyError};
pub use flashcard::{Flashcard, FlashcardError};
pub use quiz::{QUIZ_LENGTH, Question, QuestionError, QuizResult, QuizResultError};
pub use topic::{TopicError, TopicName};
pub(crate) use quiz::round_percent;
