use serde::Serialize;
use serde_json::Value;

use crate::models::{
    response_models::ResponseRecord,
    survey_models::{Question, QuestionKind, Survey},
};

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SurveyStats {
    pub survey_id: String,
    /// Number of stored response rows.
    pub total_responses: usize,
    /// The survey's advisory `responseCount` counter, which may lag behind.
    pub recorded_response_count: i64,
    /// Percentage of responses that answered every question.
    pub completion_rate: u32,
    pub question_stats: Vec<QuestionStats>,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
    pub question_id: String,
    pub question_text: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub response_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_distribution: Option<[usize; 5]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub choice_distribution: Option<Vec<ChoiceCount>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_responses: Option<Vec<String>>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct ChoiceCount {
    pub option: String,
    pub count: usize,
    pub percentage: u32,
}

fn is_answered(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        Value::Array(items) => !items.is_empty(),
        _ => true,
    }
}

fn answered(record: &ResponseRecord, question: &Question) -> bool {
    record
        .responses
        .get(&question.id)
        .map_or(false, is_answered)
}

fn as_rating(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

fn question_stats(question: &Question, answers: &[&Value]) -> QuestionStats {
    let mut stats = QuestionStats {
        question_id: question.id.clone(),
        question_text: question.text.clone(),
        kind: question.kind,
        response_count: answers.len(),
        average_rating: None,
        rating_distribution: None,
        choice_distribution: None,
        text_responses: None,
    };

    match question.kind {
        QuestionKind::Rating => {
            let ratings: Vec<f64> = answers.iter().filter_map(|v| as_rating(v)).collect();
            let mut distribution = [0usize; 5];
            for rating in &ratings {
                let bucket = rating.round() as i64;
                if (1..=5).contains(&bucket) {
                    distribution[(bucket - 1) as usize] += 1;
                }
            }
            if !ratings.is_empty() {
                let mean = ratings.iter().sum::<f64>() / ratings.len() as f64;
                stats.average_rating = Some((mean * 10.0).round() / 10.0);
            }
            stats.rating_distribution = Some(distribution);
        }
        QuestionKind::MultipleChoice => {
            let options = question.options.as_deref().unwrap_or_default();
            let counts = options
                .iter()
                .map(|option| {
                    let count = answers
                        .iter()
                        .filter(|v| v.as_str() == Some(option.as_str()))
                        .count();
                    ChoiceCount {
                        option: option.clone(),
                        count,
                        percentage: percentage(count, answers.len()),
                    }
                })
                .collect();
            stats.choice_distribution = Some(counts);
        }
        QuestionKind::Text => {
            let texts = answers
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.trim().to_string())
                .collect();
            stats.text_responses = Some(texts);
        }
    }

    stats
}

/// Aggregates stored responses per question.
pub fn survey_stats(survey: &Survey, responses: &[ResponseRecord]) -> SurveyStats {
    let complete = responses
        .iter()
        .filter(|record| survey.questions.iter().all(|q| answered(record, q)))
        .count();

    let question_stats = survey
        .questions
        .iter()
        .map(|question| {
            let answers: Vec<&Value> = responses
                .iter()
                .filter_map(|record| record.responses.get(&question.id))
                .filter(|value| is_answered(value))
                .collect();
            question_stats(question, &answers)
        })
        .collect();

    SurveyStats {
        survey_id: survey.id.clone(),
        total_responses: responses.len(),
        recorded_response_count: survey.response_count,
        completion_rate: percentage(complete, responses.len()),
        question_stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::{json, Map};

    fn question(id: &str, kind: QuestionKind, options: Option<&[&str]>) -> Question {
        Question {
            id: id.to_string(),
            text: format!("Question {id}"),
            kind,
            options: options.map(|o| o.iter().map(|s| s.to_string()).collect()),
        }
    }

    fn survey() -> Survey {
        Survey {
            id: "s1".to_string(),
            public_id: "s1".to_string(),
            title: "Lunch".to_string(),
            description: String::new(),
            question_count: 3,
            response_count: 1,
            created_at: Utc::now(),
            is_active: true,
            start_date: None,
            end_date: None,
            max_responses: None,
            keywords: Vec::new(),
            questions: vec![
                question("rate", QuestionKind::Rating, None),
                question("pick", QuestionKind::MultipleChoice, Some(&["Pizza", "Salad"])),
                question("why", QuestionKind::Text, None),
            ],
        }
    }

    fn response(answers: Value) -> ResponseRecord {
        let responses: Map<String, Value> = serde_json::from_value(answers).unwrap();
        ResponseRecord {
            timestamp: Utc::now(),
            responses,
            arcium: None,
        }
    }

    #[test]
    fn aggregates_each_question_kind() {
        let responses = vec![
            response(json!({ "rate": 5, "pick": "Pizza", "why": "tasty" })),
            response(json!({ "rate": "4", "pick": "Pizza", "why": "  " })),
            response(json!({ "rate": 2, "pick": "Salad" })),
        ];

        let stats = survey_stats(&survey(), &responses);
        assert_eq!(stats.total_responses, 3);
        assert_eq!(stats.recorded_response_count, 1);
        assert_eq!(stats.completion_rate, 33);

        let rate = &stats.question_stats[0];
        assert_eq!(rate.response_count, 3);
        assert_eq!(rate.average_rating, Some(3.7));
        assert_eq!(rate.rating_distribution, Some([0, 1, 0, 1, 1]));

        let pick = &stats.question_stats[1];
        let choices = pick.choice_distribution.as_ref().unwrap();
        assert_eq!(choices[0].count, 2);
        assert_eq!(choices[0].percentage, 67);
        assert_eq!(choices[1].count, 1);
        assert_eq!(choices[1].percentage, 33);

        let why = &stats.question_stats[2];
        assert_eq!(why.response_count, 1);
        assert_eq!(why.text_responses, Some(vec!["tasty".to_string()]));
    }

    #[test]
    fn empty_survey_has_zero_rates() {
        let stats = survey_stats(&survey(), &[]);
        assert_eq!(stats.total_responses, 0);
        assert_eq!(stats.completion_rate, 0);
        assert_eq!(stats.question_stats[0].average_rating, None);
        assert_eq!(stats.question_stats[1].choice_distribution.as_ref().unwrap()[0].percentage, 0);
    }
}
