//! vidhub server entry point.

use std::sync::Arc;

use axum::{Router, middleware};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vidhub_api::{AppState, auth_middleware, router as api_router};
use vidhub_common::{CloudinaryStore, Config, MediaStore};
use vidhub_core::{
    CascadeDeleter, CommentService, DashboardService, LikeService, PlaylistService,
    SubscriptionService, ToggleEngine, TweetService, UserService, VideoService,
};
use vidhub_db::repositories::{
    CommentRepository, LikeRepository, PlaylistRepository, SubscriptionRepository,
    TweetRepository, UserRepository, VideoRepository, WatchHistoryRepository,
};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
///
/// On Unix systems, this listens for both SIGINT (Ctrl+C) and SIGTERM.
/// On Windows, this only listens for Ctrl+C.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received SIGINT, initiating graceful shutdown...");
        },
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        },
    }
}

/// Wire repositories and services over one connection pool.
fn build_state(db: &Arc<sea_orm::DatabaseConnection>, media: Arc<dyn MediaStore>) -> AppState {
    let user_repo = UserRepository::new(Arc::clone(db));
    let video_repo = VideoRepository::new(Arc::clone(db));
    let comment_repo = CommentRepository::new(Arc::clone(db));
    let tweet_repo = TweetRepository::new(Arc::clone(db));
    let like_repo = LikeRepository::new(Arc::clone(db));
    let playlist_repo = PlaylistRepository::new(Arc::clone(db));
    let subscription_repo = SubscriptionRepository::new(Arc::clone(db));
    let history_repo = WatchHistoryRepository::new(Arc::clone(db));

    let engine = ToggleEngine::new(Arc::clone(db));
    let cascade = CascadeDeleter::new(Arc::clone(db), Arc::clone(&media));

    AppState {
        user_service: UserService::new(user_repo.clone(), video_repo.clone(), history_repo.clone()),
        video_service: VideoService::new(
            video_repo.clone(),
            comment_repo.clone(),
            like_repo.clone(),
            user_repo.clone(),
            history_repo,
            media,
            cascade.clone(),
        ),
        comment_service: CommentService::new(
            comment_repo.clone(),
            video_repo.clone(),
            like_repo.clone(),
            user_repo.clone(),
            cascade.clone(),
        ),
        tweet_service: TweetService::new(
            tweet_repo.clone(),
            like_repo.clone(),
            user_repo.clone(),
            cascade,
        ),
        like_service: LikeService::new(
            engine.clone(),
            like_repo.clone(),
            video_repo.clone(),
            comment_repo,
            tweet_repo,
            user_repo.clone(),
        ),
        playlist_service: PlaylistService::new(playlist_repo, video_repo.clone(), user_repo.clone()),
        subscription_service: SubscriptionService::new(engine, subscription_repo.clone(), user_repo),
        dashboard_service: DashboardService::new(video_repo, like_repo, subscription_repo),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env is fine
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vidhub=debug,tower_http=debug".into()),
        )
        .init();

    info!("Starting vidhub server...");

    // Load configuration
    let config = Config::load()?;

    let db = Arc::new(vidhub_db::init(&config.database).await?);
    vidhub_db::migrate(&db).await?;

    let media: Arc<dyn MediaStore> = Arc::new(CloudinaryStore::new(&config.media)?);
    info!(cloud = %config.media.cloud_name, "Media client ready");

    let state = build_state(&db, media);

    let app = Router::new()
        .nest("/api/v1", api_router(&config.server))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state);

    // Start server with graceful shutdown
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    match Arc::try_unwrap(db) {
        Ok(db) => db.close().await?,
        Err(_) => warn!("Database pool still shared at shutdown, leaving it to drop"),
    }

    info!("Server shutdown complete");
    Ok(())
}
