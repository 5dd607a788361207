use std::sync::Arc;

use storage::repository::Storage;

use crate::Clock;
use crate::dashboard_service::DashboardService;
use crate::error::AppServicesError;
use crate::explain_service::ExplainService;
use crate::generation::{GenerationClient, HttpGenerationClient};
use crate::ledger::ProgressLedger;
use crate::sessions::{FlashcardSession, QuizSession};
use crate::summary_service::SummaryService;

/// Assembles app-facing services around one ledger and generation client.
#[derive(Clone)]
pub struct AppServices {
    clock: Clock,
    client: Arc<dyn GenerationClient>,
    ledger: Arc<ProgressLedger>,
    explain: Arc<ExplainService>,
    summary: Arc<SummaryService>,
    dashboard: Arc<DashboardService>,
}

impl AppServices {
    /// Build services backed by `SQLite` storage and the HTTP generation client
    /// configured from the environment.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the HTTP
    /// client cannot be built.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        let client: Arc<dyn GenerationClient> = Arc::new(HttpGenerationClient::from_env()?);
        Ok(Self::with_parts(&storage, client, clock).await)
    }

    /// Build services from an existing storage backend and client.
    pub async fn with_parts(
        storage: &Storage,
        client: Arc<dyn GenerationClient>,
        clock: Clock,
    ) -> Self {
        let ledger = Arc::new(ProgressLedger::open(Arc::clone(&storage.kv)).await);
        let explain = Arc::new(ExplainService::new(Arc::clone(&client), Arc::clone(&ledger)));
        let summary = Arc::new(SummaryService::new(Arc::clone(&client)));
        let dashboard = Arc::new(DashboardService::new(Arc::clone(&client), Arc::clone(&ledger)));

        Self {
            clock,
            client,
            ledger,
            explain,
            summary,
            dashboard,
        }
    }

    #[must_use]
    pub fn ledger(&self) -> Arc<ProgressLedger> {
        Arc::clone(&self.ledger)
    }

    #[must_use]
    pub fn explain(&self) -> Arc<ExplainService> {
        Arc::clone(&self.explain)
    }

    #[must_use]
    pub fn summary(&self) -> Arc<SummaryService> {
        Arc::clone(&self.summary)
    }

    #[must_use]
    pub fn dashboard(&self) -> Arc<DashboardService> {
        Arc::clone(&self.dashboard)
    }

    /// A fresh quiz controller sharing this ledger.
    #[must_use]
    pub fn quiz_session(&self) -> QuizSession {
        QuizSession::new(self.clock, Arc::clone(&self.client), Arc::clone(&self.ledger))
    }

    #[must_use]
    pub fn flashcard_session(&self) -> FlashcardSession {
        FlashcardSession::new(Arc::clone(&self.client))
    }
}
