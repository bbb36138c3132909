//! User service.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use sea_orm::Set;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;
use vidhub_common::{AppError, AppResult, IdGenerator};
use vidhub_db::{
    entities::user,
    repositories::{UserRepository, VideoRepository, WatchHistoryRepository},
};

use crate::views::{self, AccountView, VideoView, WithOwner};

/// Input for registering a new account.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    #[validate(length(max = 128))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 3, max = 64))]
    pub username: String,

    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

/// Input for logging in with either username or email.
#[derive(Debug, Deserialize)]
pub struct LoginInput {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: String,
}

/// A user together with the bearer token for later requests.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user: AccountView,
    pub token: String,
}

/// User service for business logic.
#[derive(Clone)]
pub struct UserService {
    user_repo: UserRepository,
    video_repo: VideoRepository,
    history_repo: WatchHistoryRepository,
    id_gen: IdGenerator,
}

impl UserService {
    /// Create a new user service.
    #[must_use]
    pub const fn new(
        user_repo: UserRepository,
        video_repo: VideoRepository,
        history_repo: WatchHistoryRepository,
    ) -> Self {
        Self {
            user_repo,
            video_repo,
            history_repo,
            id_gen: IdGenerator::new(),
        }
    }

    /// Register a new account.
    pub async fn register(&self, input: RegisterInput) -> AppResult<AuthSession> {
        if [&input.full_name, &input.email, &input.username, &input.password]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AppError::BadRequest("All fields are required".to_string()));
        }
        input.validate()?;

        let username = input.username.trim().to_lowercase();
        let email = input.email.trim().to_lowercase();

        if self.user_repo.find_by_username(&username).await?.is_some()
            || self.user_repo.find_by_email(&email).await?.is_some()
        {
            return Err(AppError::Conflict(
                "User with email or username already exists".to_string(),
            ));
        }

        let password_hash = hash_password(&input.password)?;
        let token = self.id_gen.generate_token();

        let model = user::ActiveModel {
            id: Set(self.id_gen.generate()),
            username: Set(username),
            email: Set(email),
            full_name: Set(input.full_name.trim().to_string()),
            avatar_url: Set(None),
            cover_image_url: Set(None),
            password_hash: Set(password_hash),
            token: Set(Some(token.clone())),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };

        let user = self.user_repo.create(model).await?;
        info!(user_id = %user.id, username = %user.username, "Registered user");

        Ok(AuthSession {
            user: AccountView::from(&user),
            token,
        })
    }

    /// Log in with username or email and password.
    pub async fn login(&self, input: LoginInput) -> AppResult<AuthSession> {
        let login = input
            .username
            .as_deref()
            .or(input.email.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| AppError::BadRequest("Username or email is required".to_string()))?;

        let user = self
            .user_repo
            .find_by_login(login)
            .await?
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(&input.password, &user.password_hash)? {
            return Err(AppError::Unauthorized);
        }

        let token = match &user.token {
            Some(token) => token.clone(),
            None => self.regenerate_token(&user.id).await?,
        };

        Ok(AuthSession {
            user: AccountView::from(&user),
            token,
        })
    }

    /// Authenticate a user by token.
    pub async fn authenticate_by_token(&self, token: &str) -> AppResult<user::Model> {
        self.user_repo
            .find_by_token(token)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    /// Regenerate a user's token, invalidating the old one.
    pub async fn regenerate_token(&self, user_id: &str) -> AppResult<String> {
        let user = self.user_repo.get_by_id(user_id).await?;
        let new_token = self.id_gen.generate_token();

        let mut active: user::ActiveModel = user.into();
        active.token = Set(Some(new_token.clone()));
        active.updated_at = Set(Some(Utc::now().into()));

        self.user_repo.update(active).await?;

        Ok(new_token)
    }

    /// Get a user by ID.
    pub async fn get(&self, user_id: &str) -> AppResult<user::Model> {
        self.user_repo.get_by_id(user_id).await
    }

    /// Videos the user watched, most recent first.
    pub async fn watch_history(&self, user_id: &str) -> AppResult<Vec<WithOwner<VideoView>>> {
        let entries = self.history_repo.find_by_user(user_id).await?;
        let ids: Vec<String> = entries.into_iter().map(|e| e.video_id).collect();

        let videos: Vec<_> = self
            .video_repo
            .find_by_ids(&ids)
            .await?
            .into_iter()
            .filter(|v| v.is_published || v.user_id == user_id)
            .collect();

        let owner_ids: Vec<String> = videos.iter().map(|v| v.user_id.clone()).collect();
        let owners = views::user_index(&self.user_repo.find_by_ids(&owner_ids).await?);

        Ok(views::ordered_with_owner(
            &ids,
            &videos,
            |v| v.id.as_str(),
            |v| v.user_id.as_str(),
            &owners,
        ))
    }
}

/// Hash a password using Argon2.
fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AppError::Unexpected(format!("Failed to hash password: {e}")))
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|e| AppError::Unexpected(format!("Invalid hash: {e}")))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
