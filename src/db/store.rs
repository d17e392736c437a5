use futures::future::BoxFuture;
use thiserror::Error;
use tracing::warn;

use crate::models::{
    quiz_models::{Quiz, QuizAttempt, QuizQuestion, QuizResponse, SpecialSurvey, WhitelistEntry},
    response_models::ResponseRecord,
    survey_models::Survey,
};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Survey store not configured: {0}")]
    Configuration(String),

    #[error("Survey store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Survey store rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Survey store returned malformed data: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence for surveys and their responses.
///
/// Implementations are selected once at startup by
/// [`init_store`](crate::db::connection::init_store) and shared behind an
/// `Arc<dyn SurveyStore>`.
pub trait SurveyStore: Send + Sync {
    /// Short name used in logs.
    fn backend(&self) -> &'static str;

    /// All surveys, oldest first.
    fn list_surveys(&self) -> BoxFuture<'_, StoreResult<Vec<Survey>>>;

    fn create_survey(&self, survey: Survey) -> BoxFuture<'_, StoreResult<Survey>>;

    /// Matches either the internal id or the public id.
    fn get_survey<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<Survey>>>;

    /// Deletes by internal id. Returns whether anything was removed.
    fn delete_survey<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<bool>>;

    /// Responses for one survey, oldest first.
    fn list_responses<'a>(
        &'a self,
        survey_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<ResponseRecord>>>;

    fn insert_response<'a>(
        &'a self,
        survey_id: &'a str,
        record: ResponseRecord,
    ) -> BoxFuture<'a, StoreResult<()>>;

    fn increment_response_count<'a>(&'a self, survey_id: &'a str)
        -> BoxFuture<'a, StoreResult<()>>;

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>>;

    /// Stores the response, then bumps the survey's response counter.
    ///
    /// The counter is advisory: a failed increment is logged and the call
    /// still succeeds once the response row itself is stored.
    fn add_response<'a>(
        &'a self,
        survey_id: &'a str,
        record: ResponseRecord,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.insert_response(survey_id, record).await?;

            if let Err(e) = self.increment_response_count(survey_id).await {
                warn!(
                    survey_id,
                    backend = self.backend(),
                    "Failed to increment response count: {e}"
                );
            }

            Ok(())
        })
    }
}

/// Persistence for quizzes, their attempts, and the resulting whitelist.
///
/// Lookups by id return `None` when nothing matches. Updates of a row that
/// does not exist are store errors.
pub trait QuizStore: Send + Sync {
    fn create_quiz(&self, quiz: Quiz) -> BoxFuture<'_, StoreResult<Quiz>>;

    /// Active quizzes only.
    fn get_quiz<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<Quiz>>>;

    /// Removes the quiz with its questions, attempts, answers, whitelist and
    /// special surveys. Returns whether the quiz existed.
    fn delete_quiz<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<bool>>;

    fn add_quiz_question(&self, question: QuizQuestion) -> BoxFuture<'_, StoreResult<QuizQuestion>>;

    /// Questions in `position` order.
    fn list_quiz_questions<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizQuestion>>>;

    fn create_attempt(&self, attempt: QuizAttempt) -> BoxFuture<'_, StoreResult<QuizAttempt>>;

    fn get_attempt<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<QuizAttempt>>>;

    /// Attempts on a quiz, highest score first, optionally for one wallet.
    fn list_attempts<'a>(
        &'a self,
        quiz_id: &'a str,
        participant_wallet: Option<&'a str>,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizAttempt>>>;

    fn update_attempt(&self, attempt: QuizAttempt) -> BoxFuture<'_, StoreResult<QuizAttempt>>;

    fn insert_quiz_response(
        &self,
        response: QuizResponse,
    ) -> BoxFuture<'_, StoreResult<QuizResponse>>;

    fn get_quiz_response<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<QuizResponse>>>;

    /// Answers of one attempt, oldest first.
    fn list_quiz_responses<'a>(
        &'a self,
        attempt_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<QuizResponse>>>;

    fn update_quiz_response(
        &self,
        response: QuizResponse,
    ) -> BoxFuture<'_, StoreResult<QuizResponse>>;

    /// The wallet's active entry for the quiz, expired or not.
    fn get_whitelist_entry<'a>(
        &'a self,
        quiz_id: &'a str,
        wallet_address: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<WhitelistEntry>>>;

    /// Active entries, most recently whitelisted first.
    fn list_whitelist<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<WhitelistEntry>>>;

    fn add_to_whitelist(&self, entry: WhitelistEntry) -> BoxFuture<'_, StoreResult<WhitelistEntry>>;

    /// Deactivates the wallet's entries. Returns whether any were active.
    fn remove_from_whitelist<'a>(
        &'a self,
        quiz_id: &'a str,
        wallet_address: &'a str,
    ) -> BoxFuture<'a, StoreResult<bool>>;

    fn create_special_survey(
        &self,
        survey: SpecialSurvey,
    ) -> BoxFuture<'_, StoreResult<SpecialSurvey>>;

    fn get_special_survey<'a>(
        &'a self,
        id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Option<SpecialSurvey>>>;

    /// Active special surveys of a quiz, newest first.
    fn list_special_surveys<'a>(
        &'a self,
        quiz_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<SpecialSurvey>>>;
}
