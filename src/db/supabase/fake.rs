//! In-process stand-in for the PostgREST endpoints the store talks to.
//!
//! Understands `eq.` and `in.(...)` column filters, `or=(...)`, `order` and
//! `limit`, which is all the store sends.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::Mutex};

use super::{SupabaseConfig, SupabaseStore};

pub const KEY: &str = "service-role-key";

#[derive(Default)]
pub struct FakeDb {
    pub tables: HashMap<String, Vec<Value>>,
    pub rpc_calls: Vec<Value>,
    pub fail_rpc: bool,
}

impl FakeDb {
    pub fn rows(&self, table: &str) -> &[Value] {
        self.tables.get(table).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn seed(&mut self, table: &str, row: Value) {
        self.tables.entry(table.to_string()).or_default().push(row);
    }
}

pub type Shared = Arc<Mutex<FakeDb>>;

type Reply = (StatusCode, Json<Value>);

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("apikey").map(|v| v == KEY).unwrap_or(false)
        && headers
            .get("authorization")
            .map(|v| v == format!("Bearer {KEY}").as_str())
            .unwrap_or(false)
}

fn reject(status: StatusCode, message: &str) -> Reply {
    (status, Json(json!({ "message": message })))
}

fn as_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn matches_condition(row: &Value, column: &str, condition: &str) -> bool {
    if let Some(expected) = condition.strip_prefix("eq.") {
        return as_text(&row[column]) == expected.trim_matches('"');
    }
    if let Some(list) = condition
        .strip_prefix("in.(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        let actual = as_text(&row[column]);
        return list.split(',').any(|item| item.trim_matches('"') == actual);
    }
    false
}

fn matches_any(row: &Value, filter: &str) -> bool {
    filter
        .trim_start_matches('(')
        .trim_end_matches(')')
        .split(',')
        .filter_map(|clause| clause.split_once('.'))
        .any(|(column, condition)| matches_condition(row, column, condition))
}

fn keep(row: &Value, params: &HashMap<String, String>) -> bool {
    params.iter().all(|(key, value)| match key.as_str() {
        "select" | "order" | "limit" => true,
        "or" => matches_any(row, value),
        column => matches_condition(row, column, value),
    })
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (a.as_f64(), b.as_f64()) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        _ => as_text(a).cmp(&as_text(b)),
    }
}

fn sort_rows(rows: &mut [Value], order: &str) {
    let (column, direction) = order.split_once('.').unwrap_or((order, "asc"));
    rows.sort_by(|a, b| {
        let ordering = compare(&a[column], &b[column]);
        if direction == "desc" {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

async fn select_rows(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    if !authorized(&headers) {
        return reject(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    let db = db.lock().await;

    let mut rows: Vec<Value> = db
        .rows(&table)
        .iter()
        .filter(|row| keep(row, &params))
        .cloned()
        .collect();
    if let Some(order) = params.get("order") {
        sort_rows(&mut rows, order);
    }
    if let Some(limit) = params.get("limit").and_then(|l| l.parse().ok()) {
        rows.truncate(limit);
    }

    (StatusCode::OK, Json(Value::Array(rows)))
}

async fn insert_rows(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return reject(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    if body["survey_id"] == "locked" {
        return reject(
            StatusCode::FORBIDDEN,
            "new row violates row-level security policy",
        );
    }

    let rows = match body {
        Value::Array(rows) => rows,
        row => vec![row],
    };
    let mut db = db.lock().await;
    for row in &rows {
        if !row["id"].is_null() && db.rows(&table).iter().any(|r| r["id"] == row["id"]) {
            return reject(
                StatusCode::CONFLICT,
                "duplicate key value violates unique constraint",
            );
        }
    }
    db.tables.entry(table).or_default().extend(rows.iter().cloned());

    (StatusCode::CREATED, Json(Value::Array(rows)))
}

async fn update_rows(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
    Json(patch): Json<Value>,
) -> Reply {
    if !authorized(&headers) {
        return reject(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    let Value::Object(fields) = patch else {
        return reject(StatusCode::BAD_REQUEST, "PATCH body must be an object");
    };

    let mut db = db.lock().await;
    let mut updated = Vec::new();
    if let Some(rows) = db.tables.get_mut(&table) {
        for row in rows.iter_mut().filter(|row| keep(row, &params)) {
            if let Value::Object(target) = row {
                for (key, value) in &fields {
                    target.insert(key.clone(), value.clone());
                }
            }
            updated.push(row.clone());
        }
    }

    (StatusCode::OK, Json(Value::Array(updated)))
}

async fn delete_rows(
    State(db): State<Shared>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Reply {
    if !authorized(&headers) {
        return reject(StatusCode::UNAUTHORIZED, "Invalid API key");
    }
    let mut db = db.lock().await;
    let rows = db.tables.entry(table).or_default();
    let (removed, kept): (Vec<Value>, Vec<Value>) =
        rows.drain(..).partition(|row| keep(row, &params));
    *rows = kept;

    (StatusCode::OK, Json(Value::Array(removed)))
}

async fn increment(State(db): State<Shared>, Json(args): Json<Value>) -> Reply {
    let mut db = db.lock().await;
    db.rpc_calls.push(args);
    if db.fail_rpc {
        return reject(
            StatusCode::NOT_FOUND,
            "Could not find the function increment_response_count",
        );
    }
    (StatusCode::OK, Json(Value::Null))
}

/// Serves the fake on an ephemeral port and returns its base URL.
pub async fn spawn(db: Shared) -> String {
    let app = Router::new()
        .route("/rest/v1/rpc/increment_response_count", post(increment))
        .route(
            "/rest/v1/:table",
            get(select_rows)
                .post(insert_rows)
                .patch(update_rows)
                .delete(delete_rows),
        )
        .with_state(db);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/")
}

pub fn store_for(url: String, key: &str) -> SupabaseStore {
    SupabaseStore::new(SupabaseConfig {
        url,
        key: key.to_string(),
    })
    .unwrap()
}

/// A store wired to a fresh fake, plus the fake's tables.
pub async fn connected() -> (SupabaseStore, Shared) {
    let db = Shared::default();
    let store = store_for(spawn(db.clone()).await, KEY);
    (store, db)
}
