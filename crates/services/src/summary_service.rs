use std::path::Path;
use std::sync::Arc;

use crate::error::{SummaryError, ValidationError};
use crate::generation::GenerationClient;

/// Default file name used when saving a summary.
pub const SUMMARY_FILE_NAME: &str = "summary.txt";

#[derive(Clone)]
pub struct SummaryService {
    client: Arc<dyn GenerationClient>,
}

impl SummaryService {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        Self { client }
    }

    /// Summarize `text`.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::Validation` for blank text and
    /// `SummaryError::Generation` if the summary cannot be produced.
    pub async fn summarize(&self, text: &str) -> Result<String, SummaryError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyText.into());
        }
        Ok(self.client.summarize(text).await?)
    }

    /// Write a summary to `path` as plain text.
    ///
    /// # Errors
    ///
    /// Returns `SummaryError::Io` if the file cannot be written.
    pub fn save_summary(path: &Path, summary: &str) -> Result<(), SummaryError> {
        std::fs::write(path, summary)?;
        Ok(())
    }
}
