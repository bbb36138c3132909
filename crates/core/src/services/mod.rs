//! Business logic services.

#![allow(missing_docs)]

pub mod comment;
pub mod dashboard;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;

pub use comment::CommentService;
pub use dashboard::DashboardService;
pub use like::LikeService;
pub use playlist::PlaylistService;
pub use subscription::SubscriptionService;
pub use tweet::TweetService;
pub use user::{AuthSession, LoginInput, RegisterInput, UserService};
pub use video::{PublishVideoInput, UpdateVideoInput, VideoListQuery, VideoService};
