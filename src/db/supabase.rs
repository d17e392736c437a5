use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION},
    Client, RequestBuilder, Response,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::db::store::{StoreError, StoreResult, SurveyStore};
use crate::models::{
    response_models::{ResponseMeta, ResponseRecord},
    survey_models::{Question, Survey},
};

const SURVEYS: &str = "surveys";
const RESPONSES: &str = "responses";
const INCREMENT_RPC: &str = "increment_response_count";

mod quizzes;

#[cfg(test)]
mod fake;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub key: String,
}

/// Survey store backed by a Supabase project, spoken to over PostgREST.
pub struct SupabaseStore {
    client: Client,
    rest_url: String,
}

impl SupabaseStore {
    pub fn new(config: SupabaseConfig) -> StoreResult<Self> {
        let key = HeaderValue::from_str(&config.key)
            .map_err(|_| StoreError::Configuration("Supabase key is not a valid header".into()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.key))
            .map_err(|_| StoreError::Configuration("Supabase key is not a valid header".into()))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);

        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", config.url.trim_end_matches('/')),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.rest_url, path)
    }
}

/// Row shape of the `surveys` table. `keywords` and `questions` are nullable.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SurveyRow {
    id: String,
    public_id: String,
    title: String,
    #[serde(default)]
    description: String,
    question_count: usize,
    #[serde(default)]
    response_count: i64,
    created_at: DateTime<Utc>,
    is_active: bool,
    start_date: Option<String>,
    end_date: Option<String>,
    max_responses: Option<u32>,
    keywords: Option<Vec<String>>,
    questions: Option<Vec<Question>>,
}

impl From<Survey> for SurveyRow {
    fn from(survey: Survey) -> Self {
        Self {
            id: survey.id,
            public_id: survey.public_id,
            title: survey.title,
            description: survey.description,
            question_count: survey.question_count,
            response_count: survey.response_count,
            created_at: survey.created_at,
            is_active: survey.is_active,
            start_date: survey.start_date,
            end_date: survey.end_date,
            max_responses: survey.max_responses,
            keywords: Some(survey.keywords),
            questions: Some(survey.questions),
        }
    }
}

impl From<SurveyRow> for Survey {
    fn from(row: SurveyRow) -> Self {
        Self {
            id: row.id,
            public_id: row.public_id,
            title: row.title,
            description: row.description,
            question_count: row.question_count,
            response_count: row.response_count,
            created_at: row.created_at,
            is_active: row.is_active,
            start_date: row.start_date,
            end_date: row.end_date,
            max_responses: row.max_responses,
            keywords: row.keywords.unwrap_or_default(),
            questions: row.questions.unwrap_or_default(),
        }
    }
}

/// Row shape of the `responses` table.
#[derive(Debug, Serialize, Deserialize)]
struct ResponseRow {
    survey_id: String,
    timestamp: DateTime<Utc>,
    responses: Option<Map<String, Value>>,
    arcium: Option<ResponseMeta>,
}

impl From<ResponseRow> for ResponseRecord {
    fn from(row: ResponseRow) -> Self {
        Self {
            timestamp: row.timestamp,
            responses: row.responses.unwrap_or_default(),
            arcium: row.arcium,
        }
    }
}

#[derive(Deserialize)]
struct PostgrestError {
    message: String,
}

/// Quotes a value for use inside a PostgREST logical filter such as `or=(...)`.
fn quote_filter_value(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

fn one_of(values: &[String]) -> String {
    let quoted: Vec<String> = values.iter().map(|v| quote_filter_value(v)).collect();
    format!("in.({})", quoted.join(","))
}

async fn send(request: RequestBuilder) -> StoreResult<Response> {
    let response = request.send().await?;
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<PostgrestError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(StoreError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn read_json<T: DeserializeOwned>(response: Response) -> StoreResult<T> {
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}

impl SupabaseStore {
    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let request = self
            .client
            .get(self.endpoint(table))
            .query(&[("select", "*")])
            .query(query);

        read_json(send(request).await?).await
    }

    async fn select_one<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Option<T>> {
        let rows: Vec<T> = self.select(table, query).await?;
        Ok(rows.into_iter().next())
    }

    async fn insert<T: Serialize + DeserializeOwned>(&self, table: &str, row: &T) -> StoreResult<T> {
        let request = self
            .client
            .post(self.endpoint(table))
            .query(&[("select", "*")])
            .header("Prefer", "return=representation")
            .json(row);

        let rows: Vec<T> = read_json(send(request).await?).await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Rejected {
            status: 500,
            message: format!("Insert into {table} returned no row"),
        })
    }

    /// PATCHes every row matching `filters` and returns the updated rows.
    async fn update<B: Serialize, T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
        body: &B,
    ) -> StoreResult<Vec<T>> {
        let request = self
            .client
            .patch(self.endpoint(table))
            .query(&[("select", "*")])
            .query(filters)
            .header("Prefer", "return=representation")
            .json(body);

        read_json(send(request).await?).await
    }

    /// Replaces the row with the same `id`.
    async fn replace<T: Serialize + DeserializeOwned>(
        &self,
        table: &str,
        id: &str,
        row: &T,
    ) -> StoreResult<T> {
        let rows: Vec<T> = self.update(table, &[("id", eq(id))], row).await?;
        rows.into_iter().next().ok_or_else(|| StoreError::Rejected {
            status: 404,
            message: format!("No {table} row with id {id}"),
        })
    }

    /// Deletes every row matching `filters`, returning how many went.
    async fn delete_where(&self, table: &str, filters: &[(&str, String)]) -> StoreResult<usize> {
        let request = self
            .client
            .delete(self.endpoint(table))
            .query(&[("select", "id")])
            .query(filters)
            .header("Prefer", "return=representation");

        let removed: Vec<Value> = read_json(send(request).await?).await?;
        Ok(removed.len())
    }
}

impl SurveyStore for SupabaseStore {
    fn backend(&self) -> &'static str {
        "supabase"
    }

    fn list_surveys(&self) -> BoxFuture<'_, StoreResult<Vec<Survey>>> {
        Box::pin(async move {
            let rows: Vec<SurveyRow> = self
                .select(SURVEYS, &[("order", "createdAt.asc".to_string())])
                .await?;
            Ok(rows.into_iter().map(Survey::from).collect())
        })
    }

    fn create_survey(&self, survey: Survey) -> BoxFuture<'_, StoreResult<Survey>> {
        Box::pin(async move {
            let row = self.insert(SURVEYS, &SurveyRow::from(survey)).await?;
            Ok(Survey::from(row))
        })
    }

    fn get_survey<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<Option<Survey>>> {
        Box::pin(async move {
            let value = quote_filter_value(id);
            let filter = format!("(id.eq.{value},publicId.eq.{value})");

            let mut rows: Vec<SurveyRow> = self.select(SURVEYS, &[("or", filter)]).await?;
            if rows.len() > 1 {
                return Err(StoreError::Rejected {
                    status: 406,
                    message: format!("Multiple surveys match {id}"),
                });
            }

            Ok(rows.pop().map(Survey::from))
        })
    }

    fn delete_survey<'a>(&'a self, id: &'a str) -> BoxFuture<'a, StoreResult<bool>> {
        Box::pin(async move { Ok(self.delete_where(SURVEYS, &[("id", eq(id))]).await? > 0) })
    }

    fn list_responses<'a>(
        &'a self,
        survey_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<Vec<ResponseRecord>>> {
        Box::pin(async move {
            let rows: Vec<ResponseRow> = self
                .select(
                    RESPONSES,
                    &[
                        ("survey_id", eq(survey_id)),
                        ("order", "timestamp.asc".to_string()),
                    ],
                )
                .await?;
            Ok(rows.into_iter().map(ResponseRecord::from).collect())
        })
    }

    fn insert_response<'a>(
        &'a self,
        survey_id: &'a str,
        record: ResponseRecord,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let row = ResponseRow {
                survey_id: survey_id.to_string(),
                timestamp: record.timestamp,
                responses: Some(record.responses),
                arcium: record.arcium,
            };
            let request = self
                .client
                .post(self.endpoint(RESPONSES))
                .header("Prefer", "return=minimal")
                .json(&row);

            send(request).await?;
            Ok(())
        })
    }

    fn increment_response_count<'a>(
        &'a self,
        survey_id: &'a str,
    ) -> BoxFuture<'a, StoreResult<()>> {
        Box::pin(async move {
            let request = self
                .client
                .post(self.endpoint(&format!("rpc/{INCREMENT_RPC}")))
                .json(&json!({ "survey_id_input": survey_id }));

            send(request).await?;
            Ok(())
        })
    }

    fn ping(&self) -> BoxFuture<'_, StoreResult<()>> {
        Box::pin(async move {
            let request = self
                .client
                .get(self.endpoint(SURVEYS))
                .query(&[("select", "id"), ("limit", "1")]);

            send(request).await?;
            Ok(())
        })
    }
}
