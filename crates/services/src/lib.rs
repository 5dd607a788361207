#![forbid(unsafe_code)]

pub mod app_services;
pub mod dashboard_service;
pub mod error;
pub mod explain_service;
pub mod generation;
pub mod ledger;
pub mod sessions;
pub mod summary_service;

#[cfg(test)]
pub(crate) mod test_support;

pub use learn_core::Clock;

pub use app_services::AppServices;
pub use dashboard_service::{Dashboard, DashboardService};
pub use error::{
    AppServicesError, ExplainError, FlashcardError, GenerationError, QuizError, SummaryError,
    ValidationError,
};
pub use explain_service::{Explanation, ExplainService};
pub use generation::{
    FALLBACK_QUOTE, GenerationClient, GenerationConfig, HttpGenerationClient, quote_or_fallback,
};
pub use ledger::ProgressLedger;
pub use sessions::{
    AdvanceOutcome, FlashcardSession, FlashcardState, QuizProgress, QuizSession, QuizState,
    StudyDeck,
};
pub use summary_service::SummaryService;
