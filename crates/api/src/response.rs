//! API response types.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use vidhub_core::ToggleOutcome;

/// Standard success envelope: `{ statusCode, data, message }`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status: StatusCode,
    pub status_code: u16,
    pub data: T,
    pub message: String,
}

impl<T: Serialize> ApiResponse<T> {
    fn with_status(status: StatusCode, data: T, message: &str) -> Self {
        Self {
            status,
            status_code: status.as_u16(),
            data,
            message: message.to_string(),
        }
    }

    /// 200 response.
    pub fn ok(data: T) -> Self {
        Self::with_status(StatusCode::OK, data, "Success")
    }

    /// 201 response.
    pub fn created(data: T) -> Self {
        Self::with_status(StatusCode::CREATED, data, "Created")
    }

    /// Replace the default message.
    #[must_use]
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

/// Body of a toggle response.
#[derive(Debug, Serialize)]
pub struct ToggleState {
    pub state: ToggleOutcome,
}

impl ApiResponse<ToggleState> {
    /// 201 when the relation was created, 200 when it was removed.
    #[must_use]
    pub fn toggled(outcome: ToggleOutcome, added: &str, removed: &str) -> Self {
        let state = ToggleState { state: outcome };
        match outcome {
            ToggleOutcome::Added => Self::created(state).message(added),
            ToggleOutcome::Removed => Self::ok(state).message(removed),
        }
    }
}
