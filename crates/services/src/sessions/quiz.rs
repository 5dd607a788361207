use std::sync::Arc;

use learn_core::model::{QUIZ_LENGTH, Question, QuizResult, TopicName};

use crate::Clock;
use crate::error::{GenerationError, QuizError, ValidationError};
use crate::generation::GenerationClient;
use crate::ledger::ProgressLedger;

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Answering state of a quiz that has questions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    topic: TopicName,
    questions: Vec<Question>,
    index: usize,
    selected: Option<usize>,
    score: u32,
}

impl QuizProgress {
    fn new(topic: TopicName, questions: Vec<Question>) -> Self {
        Self {
            topic,
            questions,
            index: 0,
            selected: None,
            score: 0,
        }
    }

    #[must_use]
    pub fn topic(&self) -> &TopicName {
        &self.topic
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Zero-based index of the question being answered.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Correct answers so far, not counting the current question.
    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        &self.questions[self.index]
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.index + 1 == self.questions.len()
    }
}

/// Lifecycle of a single quiz attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum QuizState {
    #[default]
    Idle,
    Generating {
        topic: TopicName,
    },
    InProgress(QuizProgress),
    Completed(QuizResult),
}

impl QuizState {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            QuizState::Idle => "idle",
            QuizState::Generating { .. } => "generating",
            QuizState::InProgress(_) => "in progress",
            QuizState::Completed(_) => "completed",
        }
    }
}

/// What `advance` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// Moved on to the question at this index.
    NextQuestion { index: usize },
    /// The quiz ended; the result has been recorded.
    Finished(QuizResult),
}

//
// ─── CONTROLLER ────────────────────────────────────────────────────────────────
//

/// Drives one quiz from topic entry to a recorded result.
pub struct QuizSession {
    clock: Clock,
    client: Arc<dyn GenerationClient>,
    ledger: Arc<ProgressLedger>,
    state: QuizState,
}

impl QuizSession {
    #[must_use]
    pub fn new(
        clock: Clock,
        client: Arc<dyn GenerationClient>,
        ledger: Arc<ProgressLedger>,
    ) -> Self {
        Self {
            clock,
            client,
            ledger,
            state: QuizState::Idle,
        }
    }

    #[must_use]
    pub fn state(&self) -> &QuizState {
        &self.state
    }

    /// The quiz being answered, if any.
    #[must_use]
    pub fn progress(&self) -> Option<&QuizProgress> {
        match &self.state {
            QuizState::InProgress(progress) => Some(progress),
            _ => None,
        }
    }

    /// The recorded result once the quiz is completed.
    #[must_use]
    pub fn result(&self) -> Option<&QuizResult> {
        match &self.state {
            QuizState::Completed(result) => Some(result),
            _ => None,
        }
    }

    #[must_use]
    pub fn topic(&self) -> Option<&TopicName> {
        match &self.state {
            QuizState::Idle => None,
            QuizState::Generating { topic } => Some(topic),
            QuizState::InProgress(progress) => Some(progress.topic()),
            QuizState::Completed(result) => Some(result.topic()),
        }
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.progress().map(QuizProgress::current_question)
    }

    /// One-based question number and question count while answering.
    #[must_use]
    pub fn question_number(&self) -> Option<(usize, usize)> {
        self.progress()
            .map(|progress| (progress.index + 1, progress.questions.len()))
    }

    #[must_use]
    pub fn score(&self) -> Option<u32> {
        match &self.state {
            QuizState::InProgress(progress) => Some(progress.score),
            QuizState::Completed(result) => Some(result.score()),
            _ => None,
        }
    }

    /// Rounded percentage of a completed quiz.
    #[must_use]
    pub fn percent(&self) -> Option<u32> {
        self.result().map(QuizResult::percent)
    }

    /// Generate questions for `topic` and begin answering.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless the session is idle,
    /// `QuizError::Validation` for a blank topic, and `QuizError::Generation`
    /// if no complete question set could be generated. On error the session
    /// is idle.
    pub async fn start(&mut self, topic: &str) -> Result<(), QuizError> {
        if !matches!(self.state, QuizState::Idle) {
            return Err(self.invalid("start"));
        }
        let topic = TopicName::new(topic).map_err(|_| ValidationError::EmptyTopic)?;

        self.state = QuizState::Generating {
            topic: topic.clone(),
        };
        let generated = self
            .client
            .generate_quiz(&topic)
            .await
            .and_then(require_full_quiz);

        match generated {
            Ok(questions) => {
                self.state = QuizState::InProgress(QuizProgress::new(topic, questions));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(topic = %topic, error = %err, "quiz generation failed");
                self.state = QuizState::Idle;
                Err(err.into())
            }
        }
    }

    /// Choose an answer for the current question without advancing.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::OptionOutOfRange` if the option does not exist; the
    /// previous selection is kept.
    pub fn select(&mut self, option: usize) -> Result<(), QuizError> {
        let progress = self.progress_mut("select an answer")?;
        let len = progress.current_question().options().len();
        if option >= len {
            return Err(QuizError::OptionOutOfRange { index: option, len });
        }
        progress.selected = Some(option);
        Ok(())
    }

    /// Score the selected answer and move on.
    ///
    /// After the last question the quiz completes and its result is written to
    /// the ledger, including the answer just given.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::NoSelection` if no answer is selected.
    pub async fn advance(&mut self) -> Result<AdvanceOutcome, QuizError> {
        let progress = self.progress_mut("advance")?;
        let Some(selected) = progress.selected else {
            return Err(QuizError::NoSelection);
        };

        let score = progress.score + u32::from(progress.current_question().is_correct(selected));

        if !progress.is_last_question() {
            progress.score = score;
            progress.index += 1;
            progress.selected = None;
            return Ok(AdvanceOutcome::NextQuestion {
                index: progress.index,
            });
        }

        // state only changes once the result is built
        let topic = progress.topic.clone();
        let total = u32::try_from(progress.questions.len()).unwrap_or(u32::MAX);
        let result = QuizResult::new(topic, score, total, self.clock.now())?;

        self.state = QuizState::Completed(result.clone());
        self.ledger.record_quiz_result(result.clone()).await;
        Ok(AdvanceOutcome::Finished(result))
    }

    /// Discard the finished quiz and return to topic entry.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::InvalidTransition` unless the quiz is completed.
    pub fn retry(&mut self) -> Result<(), QuizError> {
        if !matches!(self.state, QuizState::Completed(_)) {
            return Err(self.invalid("retry"));
        }
        self.state = QuizState::Idle;
        Ok(())
    }

    fn progress_mut(&mut self, action: &'static str) -> Result<&mut QuizProgress, QuizError> {
        match &mut self.state {
            QuizState::InProgress(progress) => Ok(progress),
            other => Err(QuizError::InvalidTransition {
                action,
                state: other.name(),
            }),
        }
    }

    fn invalid(&self, action: &'static str) -> QuizError {
        QuizError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }
}

fn require_full_quiz(mut questions: Vec<Question>) -> Result<Vec<Question>, GenerationError> {
    if questions.len() < QUIZ_LENGTH {
        return Err(GenerationError::IncompleteQuiz {
            expected: QUIZ_LENGTH,
            got: questions.len(),
        });
    }
    questions.truncate(QUIZ_LENGTH);
    Ok(questions)
}
