use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::models::{
    quiz_models::{Quiz, QuizAttempt, QuizQuestion, QuizResponse},
    survey_models::Survey,
};
use crate::utils::error::{AppError, AppResult};
use crate::wallet::is_valid_public_key;

fn default_points() -> f64 {
    1.0
}

fn default_max_attempts() -> u32 {
    1
}

pub fn require_wallet(wallet: &str) -> AppResult<()> {
    if is_valid_public_key(wallet) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!("Invalid wallet address {wallet}")))
    }
}

/// Body of `POST /api/quizzes`.
///
/// Questions point at questions of `survey_id`. With no questions listed the
/// quiz takes every survey question at one point each, without answer keys.
#[derive(Deserialize, Debug)]
pub struct CreateQuizRequest {
    pub survey_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub minimum_score: f64,
    #[serde(default)]
    pub time_limit_minutes: Option<u32>,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Hours from creation until the quiz stops taking attempts.
    #[serde(default)]
    pub availability_hours: Option<i64>,
    pub creator_wallet: String,
    #[serde(default)]
    pub questions: Vec<QuizQuestionInput>,
}

#[derive(Deserialize, Debug)]
pub struct QuizQuestionInput {
    pub survey_question_id: String,
    #[serde(default = "default_points")]
    pub points: f64,
    #[serde(default)]
    pub correct_answer: Option<String>,
    #[serde(default)]
    pub correct_answers: Option<Vec<String>>,
    #[serde(default)]
    pub explanation: Option<String>,
}

impl CreateQuizRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Quiz title is required".to_string()));
        }
        if !(0.0..=100.0).contains(&self.minimum_score) {
            return Err(AppError::BadRequest(
                "minimum_score must be a percentage between 0 and 100".to_string(),
            ));
        }
        if self.max_attempts == 0 {
            return Err(AppError::BadRequest(
                "max_attempts must be at least 1".to_string(),
            ));
        }
        if self.availability_hours.map_or(false, |hours| hours <= 0) {
            return Err(AppError::BadRequest(
                "availability_hours must be positive".to_string(),
            ));
        }
        require_wallet(&self.creator_wallet)?;

        let mut seen: Vec<&str> = Vec::new();
        for question in &self.questions {
            if seen.contains(&question.survey_question_id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Question {} is listed twice",
                    question.survey_question_id
                )));
            }
            seen.push(&question.survey_question_id);

            if !question.points.is_finite() || question.points <= 0.0 {
                return Err(AppError::BadRequest(format!(
                    "Question {} must be worth more than 0 points",
                    question.survey_question_id
                )));
            }
        }

        Ok(())
    }

    /// Builds the quiz and its questions from the survey they draw on.
    pub fn into_quiz(
        self,
        survey: &Survey,
        now: DateTime<Utc>,
    ) -> AppResult<(Quiz, Vec<QuizQuestion>)> {
        let quiz_id = Uuid::new_v4().to_string();

        let inputs = if self.questions.is_empty() {
            survey
                .questions
                .iter()
                .map(|q| QuizQuestionInput {
                    survey_question_id: q.id.clone(),
                    points: default_points(),
                    correct_answer: None,
                    correct_answers: None,
                    explanation: None,
                })
                .collect()
        } else {
            self.questions
        };
        if inputs.is_empty() {
            return Err(AppError::BadRequest(
                "A quiz needs at least one question".to_string(),
            ));
        }

        let mut questions = Vec::with_capacity(inputs.len());
        for (position, input) in inputs.into_iter().enumerate() {
            let source = survey
                .questions
                .iter()
                .find(|q| q.id == input.survey_question_id)
                .ok_or_else(|| {
                    AppError::BadRequest(format!(
                        "Survey has no question {}",
                        input.survey_question_id
                    ))
                })?;

            questions.push(QuizQuestion {
                id: Uuid::new_v4().to_string(),
                quiz_id: quiz_id.clone(),
                survey_question_id: source.id.clone(),
                position: position as u32,
                question_text: source.text.clone(),
                question_type: source.kind,
                options: source.options.clone(),
                points: input.points,
                correct_answer: input.correct_answer,
                correct_answers: input.correct_answers,
                explanation: input.explanation,
            });
        }

        let quiz = Quiz {
            id: quiz_id,
            survey_id: survey.id.clone(),
            title: self.title,
            description: self.description,
            minimum_score: self.minimum_score,
            total_points: questions.iter().map(|q| q.points).sum(),
            time_limit_minutes: self.time_limit_minutes,
            max_attempts: self.max_attempts,
            availability_ends_at: self.availability_hours.map(|h| now + Duration::hours(h)),
            creator_wallet: self.creator_wallet,
            is_active: true,
            created_at: now,
        };

        Ok((quiz, questions))
    }
}

/// A quiz with its questions in position order.
#[derive(Serialize, Deserialize, Debug)]
pub struct QuizDetail {
    pub quiz: Quiz,
    pub questions: Vec<QuizQuestion>,
}

impl QuizDetail {
    /// The participant view: answer keys removed.
    pub fn without_answers(mut self) -> Self {
        for question in &mut self.questions {
            question.correct_answer = None;
            question.correct_answers = None;
        }
        self
    }
}

#[derive(Deserialize, Debug)]
pub struct StartAttemptRequest {
    pub participant_wallet: String,
}

#[derive(Deserialize, Debug, Default)]
pub struct AttemptsQuery {
    pub participant_wallet: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SubmitAttemptRequest {
    pub answers: Vec<AnswerInput>,
}

#[derive(Deserialize, Debug)]
pub struct AnswerInput {
    pub question_id: String,
    pub response: Value,
}

#[derive(Deserialize, Debug)]
pub struct GradeResponseRequest {
    pub points_awarded: f64,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub graded_by: Option<String>,
}

/// The graded answer and the attempt rescored with it.
#[derive(Serialize, Deserialize, Debug)]
pub struct GradeOutcome {
    pub response: QuizResponse,
    pub attempt: QuizAttempt,
}

#[derive(Deserialize, Debug)]
pub struct AddWhitelistRequest {
    pub attempt_id: String,
}

#[derive(Deserialize, Debug)]
pub struct CreateSpecialSurveyRequest {
    pub survey_id: String,
    pub quiz_id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct SurveyAccess {
    pub special_survey_id: String,
    pub wallet_address: String,
    pub access: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::survey_models::{Question, QuestionKind};
    use serde_json::json;

    const WALLET: &str = "9xQeWvG816bUx9EPjHmaT23yvVM2ZWbrrpZb9PusVFin";

    fn survey() -> Survey {
        Survey {
            id: "s1".to_string(),
            public_id: "p1".to_string(),
            title: "Capitals".to_string(),
            description: String::new(),
            question_count: 2,
            response_count: 0,
            created_at: Utc::now(),
            is_active: true,
            start_date: None,
            end_date: None,
            max_responses: None,
            keywords: Vec::new(),
            questions: vec![
                Question {
                    id: "q1".to_string(),
                    text: "Capital of France?".to_string(),
                    kind: QuestionKind::MultipleChoice,
                    options: Some(vec!["Paris".to_string(), "Lyon".to_string()]),
                },
                Question {
                    id: "q2".to_string(),
                    text: "Why?".to_string(),
                    kind: QuestionKind::Text,
                    options: None,
                },
            ],
        }
    }

    fn request(body: Value) -> CreateQuizRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn rejects_out_of_range_pass_mark_and_bad_wallet() {
        let req = request(json!({
            "survey_id": "s1", "title": "Quiz", "minimum_score": 120, "creator_wallet": WALLET
        }));
        assert!(req.validate().is_err());

        let req = request(json!({
            "survey_id": "s1", "title": "Quiz", "minimum_score": 50, "creator_wallet": "nope"
        }));
        assert!(req.validate().is_err());

        let req = request(json!({
            "survey_id": "s1", "title": "Quiz", "minimum_score": 50,
            "creator_wallet": WALLET, "max_attempts": 0
        }));
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_question_list_takes_every_survey_question() {
        let req = request(json!({
            "survey_id": "s1", "title": "Quiz", "minimum_score": 50,
            "creator_wallet": WALLET, "availability_hours": 2
        }));
        req.validate().unwrap();

        let now = Utc::now();
        let (quiz, questions) = req.into_quiz(&survey(), now).unwrap();
        assert_eq!(quiz.total_points, 2.0);
        assert_eq!(quiz.max_attempts, 1);
        assert_eq!(quiz.availability_ends_at, Some(now + Duration::hours(2)));
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[1].position, 1);
        assert_eq!(questions[1].question_type, QuestionKind::Text);
        assert!(questions.iter().all(|q| q.quiz_id == quiz.id));
    }

    #[test]
    fn listed_questions_carry_keys_and_points() {
        let req = request(json!({
            "survey_id": "s1", "title": "Quiz", "minimum_score": 50, "creator_wallet": WALLET,
            "questions": [{ "survey_question_id": "q1", "points": 3, "correct_answer": "Paris" }]
        }));

        let (quiz, questions) = req.into_quiz(&survey(), Utc::now()).unwrap();
        assert_eq!(quiz.total_points, 3.0);
        assert_eq!(questions[0].question_text, "Capital of France?");
        assert_eq!(questions[0].correct_answer.as_deref(), Some("Paris"));
    }

    #[test]
    fn unknown_survey_question_is_rejected() {
        let req = request(json!({
            "survey_id": "s1", "title": "Quiz", "minimum_score": 50, "creator_wallet": WALLET,
            "questions": [{ "survey_question_id": "missing" }]
        }));

        assert!(matches!(
            req.into_quiz(&survey(), Utc::now()),
            Err(AppError::BadRequest(_))
        ));
    }
}
