use std::time::Instant;

use axum::Json;
use once_cell::sync::Lazy;
use serde_json::json;

pub static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

fn format_uptime(seconds: u64) -> String {
    let minutes = seconds / 60;
    let hours = minutes / 60;
    let days = hours / 24;

    if days > 0 {
        format!("{}d {}h {}m {}s", days, hours % 24, minutes % 60, seconds % 60)
    } else if hours > 0 {
        format!("{}h {}m {}s", hours, minutes % 60, seconds % 60)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds % 60)
    } else {
        format!("{}s", seconds)
    }
}

pub async fn root() -> Json<serde_json::Value> {
    let uptime = format_uptime(START_TIME.elapsed().as_secs());

    Json(json!({
        "status": "ok",
        "message": format!("Survey API is running! Uptime: {}", uptime)
    }))
}
