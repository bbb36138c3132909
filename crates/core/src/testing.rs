//! Shared fixtures for service tests.

#![allow(clippy::unwrap_used, missing_docs)]

use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;
use vidhub_common::{AppError, AppResult, MediaKind, MediaStore, UploadedMedia};
use vidhub_db::entities::{comment, like, playlist, tweet, user, video};

/// Media store that records calls instead of talking to a host.
#[derive(Default)]
pub struct RecordingMediaStore {
    uploads: Mutex<Vec<(String, MediaKind)>>,
    deletes: Mutex<Vec<String>>,
    fail_uploads_of: Option<MediaKind>,
    stall_uploads_of: Option<MediaKind>,
    fail_deletes: bool,
}

impl RecordingMediaStore {
    /// Every call fails.
    pub fn failing() -> Self {
        Self {
            fail_uploads_of: Some(MediaKind::Video),
            fail_deletes: true,
            ..Default::default()
        }
    }

    /// Uploads of `kind` fail; everything else succeeds.
    pub fn failing_uploads_of(kind: MediaKind) -> Self {
        Self {
            fail_uploads_of: Some(kind),
            ..Default::default()
        }
    }

    /// Uploads of `kind` never complete.
    pub fn stalling_uploads_of(kind: MediaKind) -> Self {
        Self {
            stall_uploads_of: Some(kind),
            ..Default::default()
        }
    }

    pub fn uploaded(&self) -> Vec<(String, MediaKind)> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<String> {
        self.deletes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl MediaStore for RecordingMediaStore {
    async fn upload(&self, path: &Path, kind: MediaKind) -> AppResult<UploadedMedia> {
        if self.fail_uploads_of == Some(kind) {
            return Err(AppError::ExternalService("upload refused".to_string()));
        }
        if self.stall_uploads_of == Some(kind) {
            std::future::pending::<()>().await;
        }

        let name = path.file_name().unwrap().to_string_lossy().to_string();
        self.uploads.lock().unwrap().push((name.clone(), kind));

        Ok(UploadedMedia {
            url: format!("https://media.test/{}/{name}", kind.resource_type()),
            public_id: name,
            duration: (kind == MediaKind::Video).then_some(61.5),
        })
    }

    async fn delete(&self, url: &str, _kind: MediaKind) -> AppResult<()> {
        if self.fail_deletes {
            return Err(AppError::ExternalService("delete refused".to_string()));
        }
        self.deletes.lock().unwrap().push(url.to_string());
        Ok(())
    }
}

pub fn test_user(id: &str, username: &str) -> user::Model {
    user::Model {
        id: id.to_string(),
        username: username.to_string(),
        email: format!("{username}@example.com"),
        full_name: format!("{username} full"),
        avatar_url: None,
        cover_image_url: None,
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".to_string(),
        token: Some(format!("token-{id}")),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn test_video(id: &str, user_id: &str) -> video::Model {
    video::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        title: format!("Video {id}"),
        description: "A video".to_string(),
        video_url: format!("https://media.test/video/{id}.mp4"),
        thumbnail_url: format!("https://media.test/image/{id}.jpg"),
        duration: 30.0,
        views: 10,
        is_published: true,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn test_comment(id: &str, video_id: &str, user_id: &str) -> comment::Model {
    comment::Model {
        id: id.to_string(),
        video_id: video_id.to_string(),
        user_id: user_id.to_string(),
        content: format!("Comment {id}"),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn test_tweet(id: &str, user_id: &str) -> tweet::Model {
    tweet::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        content: format!("Tweet {id}"),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn test_playlist(id: &str, user_id: &str) -> playlist::Model {
    playlist::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        name: format!("Playlist {id}"),
        description: String::new(),
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

pub fn test_like(id: &str, user_id: &str, video_id: Option<&str>, tweet_id: Option<&str>) -> like::Model {
    like::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        video_id: video_id.map(str::to_string),
        comment_id: None,
        tweet_id: tweet_id.map(str::to_string),
        created_at: Utc::now().into(),
    }
}

pub fn test_comment_like(id: &str, user_id: &str, comment_id: &str) -> like::Model {
    like::Model {
        id: id.to_string(),
        user_id: user_id.to_string(),
        video_id: None,
        comment_id: Some(comment_id.to_string()),
        tweet_id: None,
        created_at: Utc::now().into(),
    }
}
