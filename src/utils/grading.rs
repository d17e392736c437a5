use serde::Serialize;
use serde_json::Value;

use crate::models::{
    quiz_models::{AttemptStatus, QuizAttempt, QuizQuestion, QuizResponse},
    survey_models::QuestionKind,
};

/// Outcome of grading one answer at submission time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grade {
    pub is_correct: Option<bool>,
    pub points: f64,
    /// `false` when the answer waits for a human grader.
    pub is_graded: bool,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnalytics {
    pub total_attempts: usize,
    pub passed_attempts: usize,
    pub average_score: f64,
    pub average_time: f64,
    pub completion_rate: f64,
}

fn normalize(answer: &str) -> String {
    answer.trim().to_lowercase()
}

/// The answer text inside a response payload. Payloads are either the bare
/// answer or an object carrying it under `answer` or `value`.
fn answer_text(response: &Value) -> Option<String> {
    let value = match response {
        Value::Object(fields) => fields
            .get("answer")
            .filter(|v| answer_text(v).is_some())
            .or_else(|| fields.get("value"))?,
        other => other,
    };

    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

/// Compares an answer to the question's key, ignoring case and surrounding
/// whitespace.
pub fn is_correct(question: &QuizQuestion, response: &Value) -> bool {
    let Some(answer) = answer_text(response).map(|a| normalize(&a)) else {
        return false;
    };

    question
        .correct_answer
        .iter()
        .chain(question.correct_answers.iter().flatten())
        .any(|key| normalize(key) == answer)
}

/// Grades an answer at submission. Keyed multiple-choice answers are marked
/// automatically, ratings and unkeyed choices earn full points, and text
/// answers wait for a grader.
pub fn grade_answer(question: &QuizQuestion, response: &Value) -> Grade {
    match question.question_type {
        QuestionKind::MultipleChoice if question.has_answer_key() => {
            let correct = is_correct(question, response);
            Grade {
                is_correct: Some(correct),
                points: if correct { question.points } else { 0.0 },
                is_graded: true,
            }
        }
        QuestionKind::MultipleChoice | QuestionKind::Rating => Grade {
            is_correct: None,
            points: question.points,
            is_graded: true,
        },
        QuestionKind::Text => Grade {
            is_correct: None,
            points: 0.0,
            is_graded: false,
        },
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Recomputes score, percentage, pass flag and status from the attempt's
/// graded answers. An attempt only passes once nothing is left to grade.
pub fn score_attempt(attempt: &mut QuizAttempt, responses: &[QuizResponse], minimum_score: f64) {
    let total: f64 = responses.iter().map(|r| r.points_awarded).sum();
    let fully_graded = responses.iter().all(|r| r.is_graded);

    attempt.total_score = round2(total);
    attempt.percentage = if attempt.max_possible_score > 0.0 {
        round2(total / attempt.max_possible_score * 100.0)
    } else {
        0.0
    };
    attempt.is_passed = fully_graded && attempt.percentage >= minimum_score;
    attempt.status = if fully_graded {
        AttemptStatus::Graded
    } else {
        AttemptStatus::Submitted
    };
}

pub fn quiz_analytics(attempts: &[QuizAttempt]) -> QuizAnalytics {
    let total = attempts.len();
    let passed = attempts.iter().filter(|a| a.is_passed).count();
    let completed = attempts
        .iter()
        .filter(|a| a.status != AttemptStatus::InProgress)
        .count();

    let average_score = if total > 0 {
        attempts.iter().map(|a| a.total_score).sum::<f64>() / total as f64
    } else {
        0.0
    };
    let average_time = if completed > 0 {
        attempts.iter().filter_map(|a| a.time_taken_minutes).sum::<f64>() / completed as f64
    } else {
        0.0
    };
    let completion_rate = if total > 0 {
        completed as f64 / total as f64 * 100.0
    } else {
        0.0
    };

    QuizAnalytics {
        total_attempts: total,
        passed_attempts: passed,
        average_score: round2(average_score),
        average_time: round2(average_time),
        completion_rate: round2(completion_rate),
    }
}
