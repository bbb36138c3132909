//! Ownership checks for mutating operations.

use vidhub_common::{AppError, AppResult};
use vidhub_db::entities::{comment, playlist, tweet, video};

/// An entity with exactly one owning user.
pub trait Owned {
    /// Entity name used in error messages, capitalized.
    const KIND: &'static str;

    /// Id of the owning user.
    fn owner_id(&self) -> &str;
}

impl Owned for video::Model {
    const KIND: &'static str = "Video";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for comment::Model {
    const KIND: &'static str = "Comment";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for tweet::Model {
    const KIND: &'static str = "Tweet";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

impl Owned for playlist::Model {
    const KIND: &'static str = "Playlist";

    fn owner_id(&self) -> &str {
        &self.user_id
    }
}

/// Return the entity if `actor` owns it.
///
/// A missing entity is `NotFound`; someone else's entity is `Forbidden`.
pub fn ensure_owner<T: Owned>(entity: Option<T>, actor: &str) -> AppResult<T> {
    let entity = entity.ok_or_else(|| AppError::NotFound(format!("{} not found", T::KIND)))?;

    if entity.owner_id() != actor {
        return Err(AppError::Forbidden(format!(
            "You are not the owner of this {}",
            T::KIND.to_lowercase()
        )));
    }

    Ok(entity)
}
