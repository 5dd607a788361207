use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::TopicName;

/// Number of questions in a generated quiz.
pub const QUIZ_LENGTH: usize = 5;

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,
    #[error("question needs at least two options, got {len}")]
    TooFewOptions { len: usize },
    #[error("option {index} is empty")]
    EmptyOption { index: usize },
    #[error("correct index {index} is out of bounds for {len} options")]
    CorrectIndexOutOfRange { index: usize, len: usize },
}

/// A multiple-choice question with exactly one correct option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    prompt: String,
    options: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt is blank, fewer than two options are
    /// given, an option is blank, or `correct_index` does not name an option.
    pub fn new(
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into().trim().to_string();
        if prompt.is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < 2 {
            return Err(QuestionError::TooFewOptions { len: options.len() });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                index: correct_index,
                len: options.len(),
            });
        }
        Ok(Self {
            prompt,
            options,
            correct_index,
        })
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    #[must_use]
    pub fn is_correct(&self, option: usize) -> bool {
        option == self.correct_index
    }
}

//
// ─── QUIZ RESULT ───────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizResultError {
    #[error("quiz total must be greater than zero")]
    EmptyQuiz,
    #[error("score {score} exceeds total {total}")]
    ScoreExceedsTotal { score: u32, total: u32 },
}

/// Outcome of one completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuizResultRecord")]
pub struct QuizResult {
    topic: TopicName,
    score: u32,
    total: u32,
    date: DateTime<Utc>,
}

/// Unchecked persisted shape, validated on the way in.
#[derive(Deserialize)]
struct QuizResultRecord {
    topic: TopicName,
    score: u32,
    total: u32,
    date: DateTime<Utc>,
}

impl TryFrom<QuizResultRecord> for QuizResult {
    type Error = QuizResultError;

    fn try_from(record: QuizResultRecord) -> Result<Self, Self::Error> {
        Self::new(record.topic, record.score, record.total, record.date)
    }
}

impl QuizResult {
    /// Build a result.
    ///
    /// # Errors
    ///
    /// Returns `QuizResultError::EmptyQuiz` if `total` is zero and
    /// `QuizResultError::ScoreExceedsTotal` if `score > total`.
    pub fn new(
        topic: TopicName,
        score: u32,
        total: u32,
        date: DateTime<Utc>,
    ) -> Result<Self, QuizResultError> {
        if total == 0 {
            return Err(QuizResultError::EmptyQuiz);
        }
        if score > total {
            return Err(QuizResultError::ScoreExceedsTotal { score, total });
        }
        Ok(Self {
            topic,
            score,
            total,
            date,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &TopicName {
        &self.topic
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total(&self) -> u32 {
        self.total
    }

    #[must_use]
    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Unrounded percentage of correct answers.
    #[must_use]
    pub fn ratio_percent(&self) -> f64 {
        f64::from(self.score) / f64::from(self.total) * 100.0
    }

    /// Percentage of correct answers rounded to the nearest integer.
    #[must_use]
    pub fn percent(&self) -> u32 {
        round_percent(self.ratio_percent())
    }
}

/// Rounds a percentage in `0.0..=100.0` half-up to an integer.
#[must_use]
pub(crate) fn round_percent(value: f64) -> u32 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = value.clamp(0.0, 100.0).round() as u32;
    rounded
}
