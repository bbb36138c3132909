//! Database repositories.

pub mod comment;
pub mod like;
pub mod playlist;
pub mod subscription;
pub mod tweet;
pub mod user;
pub mod video;
pub mod watch_history;

pub use comment::CommentRepository;
pub use like::{LikeKind, LikeRepository};
pub use playlist::PlaylistRepository;
pub use subscription::SubscriptionRepository;
pub use tweet::TweetRepository;
pub use user::UserRepository;
pub use video::{SortOrder, VideoFilter, VideoRepository, VideoSortField};
pub use watch_history::WatchHistoryRepository;
