use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::routes::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub catalog: HealthCheck,
    pub ai_parsing: bool,
    pub parsing_method: &'static str,
    pub model: Option<String>,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let catalog = catalog_check(&state);
    let ready = catalog.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "outfitter-server runtime initialized".to_string(),
        },
        catalog,
        ai_parsing: state.parser.uses_llm(),
        parsing_method: if state.parser.uses_llm() { "gemini_ai" } else { "rules" },
        model: state.parser.model().map(str::to_string),
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn catalog_check(state: &AppState) -> HealthCheck {
    match state.catalog.validate(&state.directory) {
        Ok(()) => HealthCheck {
            status: "ready",
            detail: format!(
                "{} products across {} retailers",
                state.catalog.product_count(),
                state.directory.len()
            ),
        },
        Err(error) => HealthCheck {
            status: "degraded",
            detail: format!("catalog integrity check failed: {error}"),
        },
    }
}
