use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub mod postgres;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures at the storage seam. `NotFound` is the only kind handlers are
/// allowed to treat as routine; everything else is a backend fault that gets
/// logged and then degrades per the coarse view-handler policy.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,
    #[error("storage backend unavailable")]
    Unavailable(#[source] BoxError),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Unavailable(Box::new(other)),
        }
    }
}

/// A user row as stored. `password_hash` never leaves this layer except into
/// the credential verifier.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: String,
    pub created_at_utc: DateTime<Utc>,
}

/// A post joined with its author's public fields, ready for rendering or
/// JSON serialization.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PostRecord {
    pub post_id: Uuid,
    pub author_id: Uuid,
    pub author_username: String,
    pub author_avatar_url: String,
    pub title: String,
    pub body: String,
    pub created_at_utc: DateTime<Utc>,
}

/// The public fields shown in follower/following lists.
#[derive(Debug, Clone)]
pub struct ProfileCard {
    pub username: String,
    pub avatar_url: String,
}

pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_url: String,
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, StoreError>;

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError>;

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError>;
}

#[async_trait]
pub trait PostStore: Send + Sync {
    /// Posts authored by the given user, newest first.
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostRecord>, StoreError>;

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64, StoreError>;

    /// Posts by everyone the given user follows, newest first.
    async fn feed_for(&self, user_id: Uuid) -> Result<Vec<PostRecord>, StoreError>;
}

#[async_trait]
pub trait FollowStore: Send + Sync {
    async fn is_following(&self, follower_id: Uuid, followed_id: Uuid)
        -> Result<bool, StoreError>;

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, StoreError>;

    async fn count_following(&self, user_id: Uuid) -> Result<i64, StoreError>;

    async fn followers_of(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, StoreError>;

    async fn following_of(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, StoreError>;

    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), StoreError>;

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), StoreError>;
}
