use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Validated topic name (trimmed, non-empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TopicName(String);

impl TopicName {
    /// Create a validated topic name.
    ///
    /// # Errors
    ///
    /// Returns `TopicError::Empty` if the name is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, TopicError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(TopicError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened label for compact displays such as chart axes.
    ///
    /// Names longer than `max_chars` characters are cut and suffixed with `...`.
    #[must_use]
    pub fn short_label(&self, max_chars: usize) -> String {
        if self.0.chars().count() <= max_chars {
            return self.0.clone();
        }
        let mut label: String = self.0.chars().take(max_chars).collect();
        label.push_str("...");
        label
    }
}

impl std::fmt::Display for TopicName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for TopicName {
    type Error = TopicError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<TopicName> for String {
    fn from(value: TopicName) -> Self {
        value.0
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TopicError {
    #[error("topic cannot be empty")]
    Empty,
}
