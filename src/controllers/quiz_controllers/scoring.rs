use chrono::{DateTime, Utc};
use tracing::info;
use uuid::Uuid;

use crate::models::quiz_models::{Quiz, QuizAttempt, WhitelistEntry};
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    grading::score_attempt,
};

/// The quiz, or 404 when it is missing or no longer active.
pub async fn load_quiz(state: &AppState, quiz_id: &str) -> AppResult<Quiz> {
    state
        .quizzes
        .get_quiz(quiz_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Quiz not found".to_string()))
}

/// The attempt, or 404 when it does not belong to `quiz_id`.
pub async fn load_attempt(
    state: &AppState,
    quiz_id: &str,
    attempt_id: &str,
) -> AppResult<QuizAttempt> {
    state
        .quizzes
        .get_attempt(attempt_id)
        .await?
        .filter(|attempt| attempt.quiz_id == quiz_id)
        .ok_or_else(|| AppError::NotFound("Attempt not found".to_string()))
}

/// Rescores an attempt from its stored answers and whitelists the
/// participant once it passes.
pub async fn settle_attempt(
    state: &AppState,
    quiz: &Quiz,
    mut attempt: QuizAttempt,
    now: DateTime<Utc>,
) -> AppResult<QuizAttempt> {
    let responses = state.quizzes.list_quiz_responses(&attempt.id).await?;
    score_attempt(&mut attempt, &responses, quiz.minimum_score);
    let attempt = state.quizzes.update_attempt(attempt).await?;

    info!(
        attempt_id = %attempt.id,
        score = attempt.total_score,
        percentage = attempt.percentage,
        passed = attempt.is_passed,
        "Attempt scored"
    );

    if attempt.is_passed {
        whitelist_attempt(state, &attempt, now).await?;
    }

    Ok(attempt)
}

/// Whitelists the attempt's wallet unless it already holds a current entry.
/// Stale entries are deactivated first so a wallet has one active row.
pub async fn whitelist_attempt(
    state: &AppState,
    attempt: &QuizAttempt,
    now: DateTime<Utc>,
) -> AppResult<WhitelistEntry> {
    let wallet = &attempt.participant_wallet;

    if let Some(entry) = state
        .quizzes
        .get_whitelist_entry(&attempt.quiz_id, wallet)
        .await?
    {
        if entry.is_current(now) {
            return Ok(entry);
        }
        state
            .quizzes
            .remove_from_whitelist(&attempt.quiz_id, wallet)
            .await?;
    }

    let entry = state
        .quizzes
        .add_to_whitelist(WhitelistEntry {
            id: Uuid::new_v4().to_string(),
            wallet_address: wallet.clone(),
            quiz_id: attempt.quiz_id.clone(),
            attempt_id: attempt.id.clone(),
            score: attempt.total_score,
            percentage: attempt.percentage,
            whitelisted_at: now,
            expires_at: None,
            is_active: true,
        })
        .await?;

    info!(quiz_id = %entry.quiz_id, wallet = %entry.wallet_address, "Wallet whitelisted");

    Ok(entry)
}
