use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ResponseRecord {
    pub timestamp: DateTime<Utc>,
    pub responses: Map<String, Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arcium: Option<ResponseMeta>,
}

/// Signatures returned by the MPC submission that encrypted this response.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseMeta {
    pub queue_sig: String,
    pub finalize_sig: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decrypted_response: Option<String>,
}
