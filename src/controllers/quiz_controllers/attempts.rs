use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::controllers::quiz_controllers::{
    models::{require_wallet, AttemptsQuery, StartAttemptRequest, SubmitAttemptRequest},
    scoring::{load_attempt, load_quiz, settle_attempt},
};
use crate::models::quiz_models::{AttemptStatus, QuizAttempt, QuizResponse};
use crate::state::AppState;
use crate::utils::{
    error::{AppError, AppResult},
    grading::{grade_answer, Grade},
    response::ApiResponse,
};

/// Starts an attempt, or hands back the wallet's unfinished one.
pub async fn start_attempt(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<StartAttemptRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<QuizAttempt>>)> {
    require_wallet(&payload.participant_wallet)?;
    let quiz = load_quiz(&state, &quiz_id).await?;

    let now = Utc::now();
    if !quiz.is_accepting_responses(now) {
        return Err(AppError::BadRequest(
            "Quiz is no longer accepting attempts".to_string(),
        ));
    }

    let attempts = state
        .quizzes
        .list_attempts(&quiz.id, Some(payload.participant_wallet.as_str()))
        .await?;

    if let Some(open) = attempts
        .iter()
        .find(|a| a.status == AttemptStatus::InProgress)
    {
        return Ok((StatusCode::OK, Json(ApiResponse::ok(open.clone()))));
    }

    if attempts.len() >= quiz.max_attempts as usize {
        return Err(AppError::BadRequest(format!(
            "Maximum of {} attempts reached",
            quiz.max_attempts
        )));
    }

    let attempt = state
        .quizzes
        .create_attempt(QuizAttempt {
            id: Uuid::new_v4().to_string(),
            quiz_id: quiz.id.clone(),
            participant_wallet: payload.participant_wallet,
            attempt_number: attempts.len() as u32 + 1,
            started_at: now,
            submitted_at: None,
            time_taken_minutes: None,
            total_score: 0.0,
            max_possible_score: quiz.total_points,
            percentage: 0.0,
            is_passed: false,
            status: AttemptStatus::InProgress,
        })
        .await?;

    info!(
        quiz_id = %quiz.id,
        attempt_id = %attempt.id,
        attempt_number = attempt.attempt_number,
        "Attempt started"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(attempt))))
}

/// Attempts ranked by score, optionally for one wallet.
pub async fn list_attempts(
    Path(quiz_id): Path<String>,
    State(state): State<AppState>,
    WithRejection(Query(query), _): WithRejection<Query<AttemptsQuery>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<QuizAttempt>>>> {
    let quiz = load_quiz(&state, &quiz_id).await?;
    let attempts = state
        .quizzes
        .list_attempts(&quiz.id, query.participant_wallet.as_deref())
        .await?;

    Ok(Json(ApiResponse::ok(attempts)))
}

/// Grades every answer it can and scores the attempt. Text answers stay
/// ungraded until a grader marks them.
pub async fn submit_attempt(
    Path((quiz_id, attempt_id)): Path<(String, String)>,
    State(state): State<AppState>,
    WithRejection(Json(payload), _): WithRejection<Json<SubmitAttemptRequest>, AppError>,
) -> AppResult<Json<ApiResponse<QuizAttempt>>> {
    let quiz = load_quiz(&state, &quiz_id).await?;
    let mut attempt = load_attempt(&state, &quiz.id, &attempt_id).await?;

    if attempt.status != AttemptStatus::InProgress {
        return Err(AppError::BadRequest(
            "Attempt was already submitted".to_string(),
        ));
    }

    let questions = state.quizzes.list_quiz_questions(&quiz.id).await?;

    let mut graded: Vec<(&str, Grade)> = Vec::with_capacity(payload.answers.len());
    for answer in &payload.answers {
        let question = questions
            .iter()
            .find(|q| q.id == answer.question_id)
            .ok_or_else(|| {
                AppError::BadRequest(format!("Quiz has no question {}", answer.question_id))
            })?;
        if graded.iter().any(|(id, _)| *id == question.id) {
            return Err(AppError::BadRequest(format!(
                "Question {} was answered twice",
                question.id
            )));
        }
        graded.push((question.id.as_str(), grade_answer(question, &answer.response)));
    }

    let now = Utc::now();
    for (answer, (question_id, grade)) in payload.answers.into_iter().zip(graded) {
        state
            .quizzes
            .insert_quiz_response(QuizResponse {
                id: Uuid::new_v4().to_string(),
                attempt_id: attempt.id.clone(),
                question_id: question_id.to_string(),
                response_data: answer.response,
                is_correct: grade.is_correct,
                points_awarded: grade.points,
                is_graded: grade.is_graded,
                graded_by: None,
                graded_at: grade.is_graded.then_some(now),
                feedback: None,
                created_at: now,
            })
            .await?;
    }

    attempt.submitted_at = Some(now);
    attempt.time_taken_minutes = Some((now - attempt.started_at).num_seconds() as f64 / 60.0);
    let attempt = settle_attempt(&state, &quiz, attempt, now).await?;

    info!(attempt_id = %attempt.id, status = ?attempt.status, "Attempt submitted");

    Ok(Json(ApiResponse::ok(attempt)))
}

pub async fn list_attempt_responses(
    Path((quiz_id, attempt_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<QuizResponse>>>> {
    let attempt = load_attempt(&state, &quiz_id, &attempt_id).await?;
    let responses = state.quizzes.list_quiz_responses(&attempt.id).await?;

    Ok(Json(ApiResponse::ok(responses)))
}
