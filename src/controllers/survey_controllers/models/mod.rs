use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::survey_models::{Question, QuestionKind, Survey};
use crate::utils::error::{AppError, AppResult};

/// Body of `POST /api/surveys`.
///
/// Callers either send a complete survey (with `id`, `publicId`, `createdAt`
/// and `responseCount`) or only the authored fields, in which case the server
/// fills in the rest. `keywords` and `questions` may be `null`.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CreateSurveyRequest {
    pub id: Option<String>,
    pub public_id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub response_count: Option<i64>,
    pub keywords: Option<Vec<String>>,
    pub question_count: Option<usize>,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub is_active: Option<bool>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_responses: Option<u32>,
    pub questions: Option<Vec<Question>>,
}

impl CreateSurveyRequest {
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::BadRequest("Survey title is required".to_string()));
        }

        let mut seen_ids: Vec<&str> = Vec::new();
        for question in self.questions.iter().flatten() {
            if question.id.trim().is_empty() {
                return Err(AppError::BadRequest("Every question needs an id".to_string()));
            }
            if seen_ids.contains(&question.id.as_str()) {
                return Err(AppError::BadRequest(format!(
                    "Duplicate question id {}",
                    question.id
                )));
            }
            seen_ids.push(&question.id);

            if question.kind == QuestionKind::MultipleChoice
                && question.options.as_ref().map_or(0, Vec::len) < 2
            {
                return Err(AppError::BadRequest(format!(
                    "Question {} needs at least 2 options",
                    question.id
                )));
            }
        }

        Ok(())
    }

    /// Builds the survey to store. Missing server-owned fields are synthesized
    /// from `now`, with an id derived from the current epoch milliseconds.
    pub fn into_survey(self, now: DateTime<Utc>) -> Survey {
        let questions = self.questions.unwrap_or_default();

        match (self.id, self.public_id, self.created_at, self.response_count) {
            (Some(id), Some(public_id), Some(created_at), Some(response_count)) => Survey {
                id,
                public_id,
                title: self.title,
                description: self.description,
                question_count: self.question_count.unwrap_or(questions.len()),
                response_count,
                created_at,
                is_active: self.is_active.unwrap_or(true),
                start_date: self.start_date,
                end_date: self.end_date,
                max_responses: self.max_responses,
                keywords: self.keywords.unwrap_or_default(),
                questions,
            },
            _ => {
                let id = now.timestamp_millis().to_string();
                Survey {
                    public_id: id.clone(),
                    id,
                    title: self.title,
                    description: self.description,
                    question_count: questions.len(),
                    response_count: 0,
                    created_at: now,
                    is_active: self.is_active.unwrap_or(true),
                    start_date: self.start_date,
                    end_date: self.end_date,
                    max_responses: self.max_responses,
                    keywords: Vec::new(),
                    questions,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn request(body: serde_json::Value) -> CreateSurveyRequest {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn minimal_form_fills_server_fields() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let survey = request(json!({
            "title": "Team lunch",
            "description": "Where should we go?",
            "questions": [
                { "id": "q1", "text": "Rate last week", "type": "rating" },
                { "id": "q2", "text": "Anything else?", "type": "text" }
            ]
        }))
        .into_survey(now);

        assert_eq!(survey.id, now.timestamp_millis().to_string());
        assert_eq!(survey.public_id, survey.id);
        assert_eq!(survey.created_at, now);
        assert_eq!(survey.question_count, 2);
        assert_eq!(survey.response_count, 0);
        assert!(survey.is_active);
        assert!(survey.keywords.is_empty());
    }

    #[test]
    fn partial_server_fields_fall_back_to_minimal_form() {
        let now = Utc::now();
        let survey = request(json!({ "title": "Poll", "id": "custom", "keywords": ["x"] }))
            .into_survey(now);

        assert_ne!(survey.id, "custom");
        assert!(survey.keywords.is_empty());
    }

    #[test]
    fn full_form_is_kept_as_given() {
        let survey = request(json!({
            "id": "internal-9",
            "publicId": "share-9",
            "createdAt": "2024-04-01T08:00:00Z",
            "responseCount": 4,
            "keywords": ["food"],
            "questionCount": 7,
            "title": "Imported",
            "isActive": false
        }))
        .into_survey(Utc::now());

        assert_eq!(survey.id, "internal-9");
        assert_eq!(survey.public_id, "share-9");
        assert_eq!(survey.response_count, 4);
        assert_eq!(survey.question_count, 7);
        assert!(!survey.is_active);
        assert_eq!(survey.keywords, vec!["food"]);
    }

    #[test]
    fn null_keywords_keep_the_full_form() {
        let survey = request(json!({
            "id": "internal-1",
            "publicId": "share-1",
            "createdAt": "2024-04-01T08:00:00Z",
            "responseCount": 0,
            "keywords": null,
            "title": "Imported"
        }))
        .into_survey(Utc::now());

        assert_eq!(survey.id, "internal-1");
        assert_eq!(survey.public_id, "share-1");
        assert!(survey.keywords.is_empty());
    }

    #[test]
    fn null_questions_become_empty() {
        let survey = request(json!({ "title": "T", "questions": null })).into_survey(Utc::now());

        assert!(survey.questions.is_empty());
        assert_eq!(survey.question_count, 0);
    }

    #[test]
    fn validation_rejects_bad_surveys() {
        assert!(request(json!({ "title": "   " })).validate().is_err());
        assert!(request(json!({
            "title": "Dup",
            "questions": [
                { "id": "q1", "text": "a", "type": "text" },
                { "id": "q1", "text": "b", "type": "text" }
            ]
        }))
        .validate()
        .is_err());
        assert!(request(json!({
            "title": "Choice",
            "questions": [{ "id": "q1", "text": "a", "type": "multiple-choice", "options": ["only"] }]
        }))
        .validate()
        .is_err());
        assert!(request(json!({
            "title": "Fine",
            "questions": [{ "id": "q1", "text": "a", "type": "multiple-choice", "options": ["x", "y"] }]
        }))
        .validate()
        .is_ok());
    }
}
