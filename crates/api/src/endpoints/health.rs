//! Liveness check.

use axum::{Router, routing::get};
use serde::Serialize;

use crate::{middleware::AppState, response::ApiResponse};

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

async fn healthcheck() -> ApiResponse<Health> {
    ApiResponse::ok(Health { status: "ok" }).message("Server is healthy")
}

pub fn router() -> Router<AppState> {
    Router::new().route("/healthcheck", get(healthcheck))
}
