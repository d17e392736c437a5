use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::survey_models::QuestionKind;

/// A graded quiz built on top of one survey's questions.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Quiz {
    pub id: String,
    pub survey_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Pass mark, as a percentage of `total_points`.
    pub minimum_score: f64,
    pub total_points: f64,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    pub max_attempts: u32,
    #[serde(default)]
    pub availability_ends_at: Option<DateTime<Utc>>,
    pub creator_wallet: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Quiz {
    pub fn is_accepting_responses(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.availability_ends_at.map_or(true, |ends| now < ends)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizQuestion {
    pub id: String,
    pub quiz_id: String,
    pub survey_question_id: String,
    pub position: u32,
    pub question_text: String,
    pub question_type: QuestionKind,
    #[serde(default)]
    pub options: Option<Vec<String>>,
    pub points: f64,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub correct_answers: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl QuizQuestion {
    pub fn has_answer_key(&self) -> bool {
        self.correct_answer.is_some()
            || self.correct_answers.as_ref().map_or(false, |a| !a.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AttemptStatus {
    InProgress,
    /// Submitted with answers still waiting for manual grading.
    Submitted,
    Graded,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizAttempt {
    pub id: String,
    pub quiz_id: String,
    pub participant_wallet: String,
    pub attempt_number: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub time_taken_minutes: Option<f64>,
    pub total_score: f64,
    pub max_possible_score: f64,
    pub percentage: f64,
    pub is_passed: bool,
    pub status: AttemptStatus,
}

/// One graded answer inside an attempt.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QuizResponse {
    pub id: String,
    pub attempt_id: String,
    pub question_id: String,
    pub response_data: Value,
    #[serde(default)]
    pub is_correct: Option<bool>,
    pub points_awarded: f64,
    pub is_graded: bool,
    #[serde(default)]
    pub graded_by: Option<String>,
    #[serde(default)]
    pub graded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub feedback: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A wallet that passed a quiz and may open its special surveys.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WhitelistEntry {
    pub id: String,
    pub wallet_address: String,
    pub quiz_id: String,
    pub attempt_id: String,
    pub score: f64,
    pub percentage: f64,
    pub whitelisted_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl WhitelistEntry {
    pub fn is_current(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.expires_at.map_or(true, |expires| now < expires)
    }
}

/// A survey only whitelisted wallets of `quiz_id` may answer.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SpecialSurvey {
    pub id: String,
    pub survey_id: String,
    pub quiz_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}


#[cfg(test)]
mod tests {
    use super::fixtures::{at, entry, quiz};
    use super::*;
    use chrono::Duration;

    #[test]
    fn availability_window_closes_quiz() {
        let now = at(0);
        let mut quiz = quiz("q");
        assert!(quiz.is_accepting_responses(now));

        quiz.availability_ends_at = Some(now + Duration::minutes(5));
        assert!(quiz.is_accepting_responses(now));
        assert!(!quiz.is_accepting_responses(now + Duration::minutes(5)));

        quiz.availability_ends_at = None;
        quiz.is_active = false;
        assert!(!quiz.is_accepting_responses(now));
    }

    #[test]
    fn expired_whitelist_entries_are_not_current() {
        let mut entry = entry("alice", 0);
        assert!(entry.is_current(at(10)));

        entry.expires_at = Some(at(5));
        assert!(!entry.is_current(at(10)));

        entry.expires_at = None;
        entry.is_active = false;
        assert!(!entry.is_current(at(10)));
    }

    #[test]
    fn attempt_status_uses_snake_case() {
        assert_eq!(
            serde_json::to_value(AttemptStatus::InProgress).unwrap(),
            "in_progress"
        );
    }
}
