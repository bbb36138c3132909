//! Account endpoints.

use axum::{
    Router,
    extract::State,
    routing::{get, post},
};
use vidhub_common::AppResult;
use vidhub_core::{
    AuthSession, LoginInput, RegisterInput,
    views::{AccountView, VideoView, WithOwner},
};

use crate::{
    extractors::{AuthUser, Json},
    middleware::AppState,
    response::ApiResponse,
};

/// Create a new account.
async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.user_service.register(req).await?;
    Ok(ApiResponse::created(session).message("User registered successfully"))
}

/// Log in with username or email.
async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginInput>,
) -> AppResult<ApiResponse<AuthSession>> {
    let session = state.user_service.login(req).await?;
    Ok(ApiResponse::ok(session).message("User logged in successfully"))
}

/// Invalidate the current token.
async fn logout(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<()>> {
    state.user_service.regenerate_token(&user.id).await?;
    Ok(ApiResponse::ok(()).message("User logged out"))
}

async fn me(AuthUser(user): AuthUser) -> ApiResponse<AccountView> {
    ApiResponse::ok(AccountView::from(&user))
}

/// Videos the current user watched, newest first.
async fn history(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
) -> AppResult<ApiResponse<Vec<WithOwner<VideoView>>>> {
    let videos = state.user_service.watch_history(&user.id).await?;
    Ok(ApiResponse::ok(videos).message("Watch history fetched successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/history", get(history))
}
