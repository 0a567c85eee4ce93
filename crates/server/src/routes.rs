//! HTTP API routes.
//!
//! - `GET  /`                      — embedded demo page
//! - `POST /api/parse-brief`       — free text → shopping brief
//! - `POST /api/discover-products` — brief → ranked products, cart, summaries
//! - `POST /api/checkout`          — cart → simulated checkout steps
//! - `GET  /api/retailers`         — retailer directory
//! - `GET  /api/health`            — readiness report

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use outfitter_agent::{BriefParser, ParseMethod};
use outfitter_core::catalog::{Catalog, RetailerDirectory};
use outfitter_core::checkout::{simulate_checkout, CheckoutStep};
use outfitter_core::discovery::{discover, Cart};
use outfitter_core::domain::brief::ShoppingBrief;

use crate::health;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub directory: Arc<RetailerDirectory>,
    pub parser: Arc<BriefParser>,
}

#[derive(Debug, Deserialize)]
pub struct ParseBriefRequest {
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ParseBriefResponse {
    #[serde(flatten)]
    pub brief: ShoppingBrief,
    pub parsing_method: ParseMethod,
}

#[derive(Debug, Deserialize)]
pub struct DiscoverRequest {
    pub spec: Option<ShoppingBrief>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub cart: Cart,
}

#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub steps: Vec<CheckoutStep>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/parse-brief", post(parse_brief))
        .route("/api/discover-products", post(discover_products))
        .route("/api/checkout", post(checkout))
        .route("/api/retailers", get(retailers))
        .route("/api/health", get(health::health))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("../assets/index.html"))
}

async fn parse_brief(
    State(state): State<AppState>,
    Json(request): Json<ParseBriefRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let message = request.message.trim();
    if message.is_empty() {
        return bad_request(&correlation_id, "No message provided");
    }

    let parsed = state.parser.parse(message).await;
    info!(
        event_name = "api.parse_brief.ok",
        correlation_id = %correlation_id,
        parsing_method = ?parsed.method,
        items = parsed.brief.items.len(),
        "parsed shopping brief"
    );

    (
        StatusCode::OK,
        Json(ParseBriefResponse { brief: parsed.brief, parsing_method: parsed.method }),
    )
        .into_response()
}

async fn discover_products(
    State(state): State<AppState>,
    Json(request): Json<DiscoverRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    let Some(brief) = request.spec else {
        return bad_request(&correlation_id, "No specification provided");
    };

    match discover(&brief, &state.catalog, &state.directory) {
        Ok(discovery) => {
            info!(
                event_name = "api.discover.ok",
                correlation_id = %correlation_id,
                categories = discovery.products.len(),
                cart_size = discovery.auto_cart.len(),
                total = %discovery.total,
                "discovery pass complete"
            );
            (StatusCode::OK, Json(discovery)).into_response()
        }
        Err(error) => {
            warn!(
                event_name = "api.discover.invalid_brief",
                correlation_id = %correlation_id,
                error = %error,
                "rejected discovery request"
            );
            bad_request(&correlation_id, &error.to_string())
        }
    }
}

async fn checkout(
    State(state): State<AppState>,
    Json(request): Json<CheckoutRequest>,
) -> Response {
    let correlation_id = Uuid::new_v4().to_string();
    if request.cart.is_empty() {
        return bad_request(&correlation_id, "Empty cart");
    }

    let steps = simulate_checkout(&request.cart, &state.directory);
    info!(
        event_name = "api.checkout.ok",
        correlation_id = %correlation_id,
        cart_size = request.cart.len(),
        steps = steps.len(),
        "simulated checkout"
    );
    (StatusCode::OK, Json(CheckoutResponse { steps })).into_response()
}

async fn retailers(State(state): State<AppState>) -> Response {
    (StatusCode::OK, Json(state.directory.as_map())).into_response()
}

fn bad_request(correlation_id: &str, message: &str) -> Response {
    warn!(
        event_name = "api.bad_request",
        correlation_id = %correlation_id,
        error = message,
        "request rejected"
    );
    (StatusCode::BAD_REQUEST, Json(ErrorBody { error: message.to_string() })).into_response()
}
