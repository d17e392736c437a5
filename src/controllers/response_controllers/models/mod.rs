use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::response_models::{ResponseMeta, ResponseRecord};

/// Body of `POST /api/surveys/:id/responses`.
#[derive(Deserialize, Debug)]
pub struct AddResponseRequest {
    pub timestamp: Option<DateTime<Utc>>,
    pub responses: Map<String, Value>,
    #[serde(default)]
    pub arcium: Option<ResponseMeta>,
}

impl AddResponseRequest {
    pub fn into_record(self, now: DateTime<Utc>) -> ResponseRecord {
        ResponseRecord {
            timestamp: self.timestamp.unwrap_or(now),
            responses: self.responses,
            arcium: self.arcium,
        }
    }
}
