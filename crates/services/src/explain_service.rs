use std::sync::Arc;

use learn_core::model::{Difficulty, TopicName};

use crate::error::{ExplainError, ValidationError};
use crate::generation::GenerationClient;
use crate::ledger::ProgressLedger;

/// A generated explanation of a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Explanation {
    pub topic: TopicName,
    pub difficulty: Difficulty,
    pub text: String,
}

/// Requests explanations and marks explained topics as learned.
#[derive(Clone)]
pub struct ExplainService {
    client: Arc<dyn GenerationClient>,
    ledger: Arc<ProgressLedger>,
}

impl ExplainService {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, ledger: Arc<ProgressLedger>) -> Self {
        Self { client, ledger }
    }

    /// Explain `topic` at `difficulty` and record it as learned.
    ///
    /// # Errors
    ///
    /// Returns `ExplainError::Validation` for a blank topic and
    /// `ExplainError::Generation` if the explanation cannot be produced. Nothing
    /// is recorded on error.
    pub async fn explain(
        &self,
        topic: &str,
        difficulty: Difficulty,
    ) -> Result<Explanation, ExplainError> {
        let topic = TopicName::new(topic).map_err(|_| ValidationError::EmptyTopic)?;
        let text = self.client.explain(&topic, difficulty).await?;
        self.ledger.record_topic_learned(topic.clone()).await;
        Ok(Explanation {
            topic,
            difficulty,
            text,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{ScriptedClient, topic};
    use storage::repository::InMemoryStore;

    fn service(client: ScriptedClient) -> (ExplainService, Arc<ProgressLedger>) {
        let ledger = Arc::new(ProgressLedger::new(Arc::new(InMemoryStore::new())));
        (
            ExplainService::new(Arc::new(client), Arc::clone(&ledger)),
            ledger,
        )
    }

    #[tokio::test]
    async fn successful_explanation_records_topic_once() {
        let (service, ledger) = service(ScriptedClient::default().with_explanation("Light in, sugar out."));

        let explanation = service.explain(" Photosynthesis ", Difficulty::Easy).await.unwrap();
        assert_eq!(explanation.text, "Light in, sugar out.");
        assert_eq!(explanation.topic, topic("Photosynthesis"));

        service.explain("Photosynthesis", Difficulty::Advanced).await.unwrap();
        assert_eq!(ledger.snapshot().topics(), &[topic("Photosynthesis")]);
    }

    #[tokio::test]
    async fn failed_explanation_records_nothing() {
        let (service, ledger) = service(ScriptedClient::default());
        let err = service.explain("Photosynthesis", Difficulty::Medium).await.unwrap_err();
        assert!(matches!(err, ExplainError::Generation(_)));
        assert!(ledger.snapshot().topics().is_empty());
    }

    #[tokio::test]
    async fn blank_topic_is_rejected() {
        let (service, _) = service(ScriptedClient::default().with_explanation("x"));
        let err = service.explain("  ", Difficulty::Medium).await.unwrap_err();
        assert!(matches!(err, ExplainError::Validation(ValidationError::EmptyTopic)));
    }
}
