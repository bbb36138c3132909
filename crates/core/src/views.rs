//! Aggregated read views.
//!
//! Each view is composed from models the repositories already fetched, so
//! the composition is a pure function and tested without a database.

#![allow(missing_docs)]

use std::collections::HashMap;

use sea_orm::prelude::DateTimeWithTimeZone;
use serde::Serialize;
use vidhub_db::entities::{comment, like, playlist, playlist_video, tweet, user, video};
use vidhub_db::repositories::LikeKind;

/// Default page size for list endpoints.
pub const DEFAULT_PAGE_SIZE: u64 = 10;

/// Largest accepted page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Public identity of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub full_name: String,
    pub username: String,
}

impl From<&user::Model> for UserSummary {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            full_name: user.full_name.clone(),
            username: user.username.clone(),
        }
    }
}

/// A user's own account, without credentials.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub cover_image_url: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

impl From<&user::Model> for AccountView {
    fn from(user: &user::Model) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            avatar_url: user.avatar_url.clone(),
            cover_image_url: user.cover_image_url.clone(),
            created_at: user.created_at,
        }
    }
}

/// Serialized video row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: String,
    pub owner_id: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub duration: f64,
    pub views: i64,
    pub is_published: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl From<&video::Model> for VideoView {
    fn from(v: &video::Model) -> Self {
        Self {
            id: v.id.clone(),
            owner_id: v.user_id.clone(),
            title: v.title.clone(),
            description: v.description.clone(),
            video_url: v.video_url.clone(),
            thumbnail_url: v.thumbnail_url.clone(),
            duration: v.duration,
            views: v.views,
            is_published: v.is_published,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

/// Serialized comment row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    pub id: String,
    pub video_id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl From<&comment::Model> for CommentRow {
    fn from(c: &comment::Model) -> Self {
        Self {
            id: c.id.clone(),
            video_id: c.video_id.clone(),
            owner_id: c.user_id.clone(),
            content: c.content.clone(),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Serialized tweet row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetRow {
    pub id: String,
    pub owner_id: String,
    pub content: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

impl From<&tweet::Model> for TweetRow {
    fn from(t: &tweet::Model) -> Self {
        Self {
            id: t.id.clone(),
            owner_id: t.user_id.clone(),
            content: t.content.clone(),
            created_at: t.created_at,
            updated_at: t.updated_at,
        }
    }
}

/// Any row together with its owner's public identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WithOwner<T> {
    #[serde(flatten)]
    pub item: T,
    pub owner: Option<UserSummary>,
}

/// A single video as shown on its watch page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDetails {
    #[serde(flatten)]
    pub video: VideoView,
    pub owner: Option<UserSummary>,
    pub number_of_likes: u64,
    pub number_of_comments: u64,
}

/// A video in a listing, with the users who liked it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoListItem {
    #[serde(flatten)]
    pub video: VideoView,
    pub owner: Option<UserSummary>,
    pub likes: Vec<UserSummary>,
}

/// A comment with its owner and likers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(flatten)]
    pub comment: CommentRow,
    pub owner: Option<UserSummary>,
    pub likes: Vec<UserSummary>,
    pub number_of_likes: u64,
}

/// A tweet with its owner and likers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TweetView {
    #[serde(flatten)]
    pub tweet: TweetRow,
    pub owner: Option<UserSummary>,
    pub number_of_likes: u64,
    pub liked_by: Vec<UserSummary>,
}

/// A playlist with its videos in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistView {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
    pub total_videos: usize,
    pub videos: Vec<VideoView>,
}

/// Channel statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_video_views: i64,
    pub total_subscribers: u64,
    pub total_videos: u64,
    pub total_video_likes: u64,
}

/// Requested page, clamped to sane bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// Clamp page to at least 1 and limit to `1..=MAX_PAGE_SIZE`.
    ///
    /// Page is also capped so the offset stays within a Postgres `bigint`.
    #[must_use]
    pub fn new(page: Option<u64>, limit: Option<u64>) -> Self {
        let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let max_page = i64::MAX.unsigned_abs() / limit;
        Self {
            page: page.unwrap_or(1).clamp(1, max_page),
            limit,
        }
    }

    /// Rows to skip.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub docs: Vec<T>,
    pub total_docs: u64,
    pub limit: u64,
    pub page: u64,
    pub total_pages: u64,
    pub has_prev_page: bool,
    pub has_next_page: bool,
}

impl<T> Paginated<T> {
    /// Wrap a page of docs.
    #[must_use]
    pub fn new(docs: Vec<T>, total_docs: u64, request: PageRequest) -> Self {
        let total_pages = total_docs.div_ceil(request.limit.max(1));
        Self {
            docs,
            total_docs,
            limit: request.limit,
            page: request.page,
            total_pages,
            has_prev_page: request.page > 1,
            has_next_page: request.page < total_pages,
        }
    }
}

/// Index users by id as public summaries.
#[must_use]
pub fn user_index(users: &[user::Model]) -> HashMap<String, UserSummary> {
    users
        .iter()
        .map(|u| (u.id.clone(), UserSummary::from(u)))
        .collect()
}

/// Group likers by the target they liked, preserving like order.
fn likers_by_target(
    likes: &[like::Model],
    kind: LikeKind,
    users: &HashMap<String, UserSummary>,
) -> HashMap<String, Vec<UserSummary>> {
    let mut grouped: HashMap<String, Vec<UserSummary>> = HashMap::new();
    for like in likes {
        if let (Some(target), Some(user)) = (kind.target_of(like), users.get(&like.user_id)) {
            grouped
                .entry(target.to_string())
                .or_default()
                .push(user.clone());
        }
    }
    grouped
}

/// Compose the watch-page view of a video.
#[must_use]
pub fn video_details(
    video: &video::Model,
    owner: Option<&user::Model>,
    number_of_likes: u64,
    number_of_comments: u64,
) -> VideoDetails {
    VideoDetails {
        video: VideoView::from(video),
        owner: owner.map(UserSummary::from),
        number_of_likes,
        number_of_comments,
    }
}

/// Compose listing items, keeping the order of `videos`.
#[must_use]
pub fn video_list(
    videos: &[video::Model],
    likes: &[like::Model],
    users: &HashMap<String, UserSummary>,
) -> Vec<VideoListItem> {
    let mut likers = likers_by_target(likes, LikeKind::Video, users);
    videos
        .iter()
        .map(|v| VideoListItem {
            video: VideoView::from(v),
            owner: users.get(&v.user_id).cloned(),
            likes: likers.remove(&v.id).unwrap_or_default(),
        })
        .collect()
}

/// Compose comment views, keeping the order of `comments`.
#[must_use]
pub fn comment_views(
    comments: &[comment::Model],
    likes: &[like::Model],
    users: &HashMap<String, UserSummary>,
) -> Vec<CommentView> {
    let mut likers = likers_by_target(likes, LikeKind::Comment, users);
    comments
        .iter()
        .map(|c| {
            let likes = likers.remove(&c.id).unwrap_or_default();
            CommentView {
                comment: CommentRow::from(c),
                owner: users.get(&c.user_id).cloned(),
                number_of_likes: likes.len() as u64,
                likes,
            }
        })
        .collect()
}

/// Compose tweet views, keeping the order of `tweets`.
#[must_use]
pub fn tweet_views(
    tweets: &[tweet::Model],
    likes: &[like::Model],
    users: &HashMap<String, UserSummary>,
) -> Vec<TweetView> {
    let mut likers = likers_by_target(likes, LikeKind::Tweet, users);
    tweets
        .iter()
        .map(|t| {
            let liked_by = likers.remove(&t.id).unwrap_or_default();
            TweetView {
                tweet: TweetRow::from(t),
                owner: users.get(&t.user_id).cloned(),
                number_of_likes: liked_by.len() as u64,
                liked_by,
            }
        })
        .collect()
}

/// Compose playlists with their videos. Entries whose video is gone are skipped.
#[must_use]
pub fn playlist_views(
    playlists: &[playlist::Model],
    entries: &[playlist_video::Model],
    videos: &[video::Model],
) -> Vec<PlaylistView> {
    let videos: HashMap<&str, &video::Model> = videos.iter().map(|v| (v.id.as_str(), v)).collect();

    playlists
        .iter()
        .map(|p| {
            let items: Vec<VideoView> = entries
                .iter()
                .filter(|e| e.playlist_id == p.id)
                .filter_map(|e| videos.get(e.video_id.as_str()))
                .map(|v| VideoView::from(*v))
                .collect();

            PlaylistView {
                id: p.id.clone(),
                owner_id: p.user_id.clone(),
                name: p.name.clone(),
                description: p.description.clone(),
                created_at: p.created_at,
                updated_at: p.updated_at,
                total_videos: items.len(),
                videos: items,
            }
        })
        .collect()
}

/// Attach owners to rows, following the order of `ids`.
///
/// `ids` decides order and membership; rows missing from `rows` are skipped.
pub fn ordered_with_owner<M, T>(
    ids: &[String],
    rows: &[M],
    id_of: impl Fn(&M) -> &str,
    owner_of: impl Fn(&M) -> &str,
    users: &HashMap<String, UserSummary>,
) -> Vec<WithOwner<T>>
where
    T: for<'a> From<&'a M>,
{
    let by_id: HashMap<&str, &M> = rows.iter().map(|r| (id_of(r), r)).collect();
    ids.iter()
        .filter_map(|id| by_id.get(id.as_str()))
        .map(|row| WithOwner {
            item: T::from(row),
            owner: users.get(owner_of(row)).cloned(),
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::{
        test_comment, test_comment_like, test_like, test_playlist, test_tweet, test_user,
        test_video,
    };
    use chrono::Utc;

    #[test]
    fn test_page_request_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 1 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, 100);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn test_page_request_offset_fits_bigint() {
        let huge = PageRequest::new(Some(u64::MAX), Some(100));
        assert!(huge.offset() <= i64::MAX.unsigned_abs());
        assert!(huge.page > 1);

        let single = PageRequest::new(Some(u64::MAX), Some(1));
        assert!(i64::try_from(single.offset()).is_ok());
    }

    #[test]
    fn test_paginated_flags() {
        let page: Paginated<u8> = Paginated::new(vec![1, 2], 25, PageRequest::new(Some(2), Some(10)));
        assert_eq!(page.total_pages, 3);
        assert!(page.has_prev_page);
        assert!(page.has_next_page);

        let empty: Paginated<u8> = Paginated::new(vec![], 0, PageRequest::default());
        assert_eq!(empty.total_pages, 0);
        assert!(!empty.has_prev_page);
        assert!(!empty.has_next_page);
    }

    #[test]
    fn test_paginated_json_shape() {
        let page: Paginated<u8> = Paginated::new(vec![7], 1, PageRequest::default());
        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["totalDocs"], 1);
        assert_eq!(json["hasNextPage"], false);
        assert_eq!(json["docs"][0], 7);
    }

    #[test]
    fn test_video_list_groups_likers() {
        let users = user_index(&[test_user("u1", "alice"), test_user("u2", "bob")]);
        let videos = [test_video("v1", "u1"), test_video("v2", "u2")];
        let likes = [
            test_like("l1", "u2", Some("v1"), None),
            test_like("l2", "u1", Some("v1"), None),
            // liker no longer present
            test_like("l3", "gone", Some("v2"), None),
        ];

        let items = video_list(&videos, &likes, &users);

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].video.id, "v1");
        assert_eq!(items[0].owner.as_ref().unwrap().username, "alice");
        let likers: Vec<_> = items[0].likes.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(likers, ["bob", "alice"]);
        assert!(items[1].likes.is_empty());
    }

    #[test]
    fn test_video_details_json() {
        let owner = test_user("u1", "alice");
        let details = video_details(&test_video("v1", "u1"), Some(&owner), 4, 2);
        let json = serde_json::to_value(&details).unwrap();

        assert_eq!(json["id"], "v1");
        assert_eq!(json["numberOfLikes"], 4);
        assert_eq!(json["numberOfComments"], 2);
        assert_eq!(json["owner"]["fullName"], "alice full");
        assert!(json.get("passwordHash").is_none());
    }

    #[test]
    fn test_comment_views_count_likes() {
        let users = user_index(&[test_user("u1", "alice"), test_user("u2", "bob")]);
        let comments = [test_comment("c1", "v1", "u1"), test_comment("c2", "v1", "u2")];
        let likes = [
            test_comment_like("l1", "u2", "c1"),
            test_comment_like("l2", "u1", "c1"),
        ];

        let views = comment_views(&comments, &likes, &users);

        assert_eq!(views[0].number_of_likes, 2);
        assert_eq!(views[1].number_of_likes, 0);
        assert_eq!(views[1].owner.as_ref().unwrap().id, "u2");
    }

    #[test]
    fn test_tweet_views_ignore_other_kinds() {
        let users = user_index(&[test_user("u1", "alice")]);
        let tweets = [test_tweet("t1", "u1")];
        let likes = [
            test_like("l1", "u1", None, Some("t1")),
            test_like("l2", "u1", Some("t1"), None),
        ];

        let views = tweet_views(&tweets, &likes, &users);

        assert_eq!(views[0].number_of_likes, 1);
        assert_eq!(views[0].liked_by[0].username, "alice");
    }

    #[test]
    fn test_playlist_views_keep_entry_order() {
        let playlists = [test_playlist("p1", "u1"), test_playlist("p2", "u1")];
        let entry = |id: &str, p: &str, v: &str| playlist_video::Model {
            id: id.to_string(),
            playlist_id: p.to_string(),
            video_id: v.to_string(),
            created_at: Utc::now().into(),
        };
        let entries = [entry("e1", "p1", "v2"), entry("e2", "p1", "v1"), entry("e3", "p2", "gone")];
        let videos = [test_video("v1", "u1"), test_video("v2", "u2")];

        let views = playlist_views(&playlists, &entries, &videos);

        let ids: Vec<_> = views[0].videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["v2", "v1"]);
        assert_eq!(views[0].total_videos, 2);
        assert_eq!(views[1].total_videos, 0);
    }

    #[test]
    fn test_ordered_with_owner_follows_ids() {
        let users = user_index(&[test_user("u1", "alice")]);
        let videos = [test_video("v1", "u1"), test_video("v2", "u1")];
        let ids = ["v2".to_string(), "missing".to_string(), "v1".to_string()];

        let rows: Vec<WithOwner<VideoView>> =
            ordered_with_owner(&ids, &videos, |v| v.id.as_str(), |v| v.user_id.as_str(), &users);

        let order: Vec<_> = rows.iter().map(|r| r.item.id.as_str()).collect();
        assert_eq!(order, ["v2", "v1"]);
        assert_eq!(rows[0].owner.as_ref().unwrap().username, "alice");
    }
}
