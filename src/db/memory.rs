use std::collections::HashMap;

use futures::future::BoxFuture;
use tokio::sync::RwLock;

use crate::db::store::{StoreError, StoreResult, SurveyStore};
use crate::models::{response_models::ResponseRecord, survey_models::Survey};

mod quizzes;

/// Process-local store. Nothing survives a restart.
#[derive(Default)]
pub struct MemoryStore {
    surveys: RwLock<Vec<Survey>>,
    responses: RwLock<HashMap<String, Vec<ResponseRecord>>>,
    quiz: RwLock<quizzes::QuizTables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SurveyStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    fn list_surveys(&self) -> BoxFuture<'_, StoreResult<Vec<Survey>>> {
        Box::pin(async move {
            let mut surveys = self.surveys.read().await.clone();
            surveys.sort_by_key(|survey| survey.created_at);
            Ok(surveys)
        })
    }

    fn create_survey(&self, survey: Survey) -> BoxFuture<'_, StoreResult<Survey>> {
        Box::pin(async move {
            let mut surveys = self.surveys.write().await;

            if surveys.iter().any(|existing| existing.id == survey.id) {
                return Err(StoreError::Rejected {
                    status: 409,
                    message: format!("Survey with id {} already exists", survey.id),
                });
            }

            surveys.push(survey.clone());
            Ok(survey)
        })
    }

    fn get_survey<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<Survey>>> {
        Box::pin(async move {
            let surveys = self.surveys.read().await;
            let mut matching = surveys.iter().filter(|survey| survey.matches(id));

            match (matching.next(), matching.next()) {
                (None, _) => Ok(None),
                (Some(survey), None) => Ok(Some(survey.clone())),
                (Some(_), Some(_)) => Err(StoreError::Rejected {
                    status: 406,
                    message: format!("Multiple surveys match {id}"),
                }),
            }
        })
    }

    fn delete_survey<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move {
            let mut surveys = self.surveys.write().await;
            let before = surveys.len();
            surveys.retain(|survey| survey.id != id);
            Ok(surveys.len() < before)
        })
    }

    fn list_responses<'a>(
        &'a self,
        survey_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<ResponseRecord>>> {
        Box::pin(async move {
            let mut records = self
                .responses
                .read()
                .await
                .get(survey_id)
                .cloned()
                .unwrap_or_default();
            records.sort_by_key(|record| record.timestamp);
            Ok(records)
        })
    }

    fn insert_response<'a>(
        &'a self,
        survey_id: &'a str,
        record: ResponseRecord,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            self.responses
                .write()
                .await
                .entry(survey_id.to_string())
                .or_default()
                .push(record);
            Ok(())
        })
    }

    fn increment_response_count<'a>(
        &'a self,
        survey_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let mut surveys = self.surveys.write().await;
            let survey = surveys
                .iter_mut()
                .find(|survey| survey.matches(survey_id))
                .ok_or_else(|| StoreError::Rejected {
                    status: 404,
                    message: format!("No survey {survey_id} to count responses for"),
                })?;

            survey.response_count += 1;
            Ok(())
        })
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
