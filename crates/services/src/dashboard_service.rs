use std::sync::Arc;

use learn_core::model::{QuizResult, TopicName};
use learn_core::progress::{ChartPoint, ProgressStats};

use crate::generation::{GenerationClient, quote_or_fallback};
use crate::ledger::ProgressLedger;

const CHART_QUIZZES: usize = 5;
const RECENT_TOPICS: usize = 5;
const RECENT_QUIZZES: usize = 3;

/// Everything the home screen shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dashboard {
    pub quote: String,
    pub stats: ProgressStats,
    pub chart: Vec<ChartPoint>,
    pub recent_topics: Vec<TopicName>,
    pub recent_quizzes: Vec<QuizResult>,
}

#[derive(Clone)]
pub struct DashboardService {
    client: Arc<dyn GenerationClient>,
    ledger: Arc<ProgressLedger>,
}

impl DashboardService {
    #[must_use]
    pub fn new(client: Arc<dyn GenerationClient>, ledger: Arc<ProgressLedger>) -> Self {
        Self { client, ledger }
    }

    /// Build the dashboard. Never fails; a missing quote falls back silently.
    pub async fn load(&self) -> Dashboard {
        let quote = quote_or_fallback(self.client.as_ref()).await;
        let snapshot = self.ledger.snapshot();
        let recent = snapshot.recent_activity_split(RECENT_TOPICS, RECENT_QUIZZES);
        Dashboard {
            quote,
            stats: snapshot.stats(),
            chart: snapshot.chart_series(CHART_QUIZZES),
            recent_topics: recent.topics,
            recent_quizzes: recent.quizzes,
        }
    }
}
