//! HTTP API layer for vidhub.
//!
//! - **Endpoints**: users, videos, comments, tweets, likes, subscriptions,
//!   playlists and the channel dashboard
//! - **Extractors**: bearer-token authentication
//! - **Upload**: multipart spooling to temporary files
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod upload;

pub use endpoints::router;
pub use middleware::{AppState, auth_middleware};
