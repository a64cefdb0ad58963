use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgPool;
use tracing::info;
use uuid::Uuid;

use super::{
    FollowStore, NewUser, PostRecord, PostStore, ProfileCard, StoreError, UserRecord, UserStore,
};

/// Postgres-backed implementation of the three store traits, sharing one
/// connection pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    avatar_url: String,
    created_at_utc: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            user_id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            avatar_url: row.avatar_url,
            created_at_utc: row.created_at_utc,
        }
    }
}

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    author_id: Uuid,
    author_username: String,
    author_avatar_url: String,
    title: String,
    body: String,
    created_at_utc: DateTime<Utc>,
}

impl From<PostRow> for PostRecord {
    fn from(row: PostRow) -> Self {
        PostRecord {
            post_id: row.id,
            author_id: row.author_id,
            author_username: row.author_username,
            author_avatar_url: row.author_avatar_url,
            title: row.title,
            body: row.body,
            created_at_utc: row.created_at_utc,
        }
    }
}

#[derive(sqlx::FromRow)]
struct CardRow {
    username: String,
    avatar_url: String,
}

impl From<CardRow> for ProfileCard {
    fn from(row: CardRow) -> Self {
        ProfileCard {
            username: row.username,
            avatar_url: row.avatar_url,
        }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_username(&self, username: &str) -> Result<UserRecord, StoreError> {
        let row: Option<UserRow> = sqlx::query_as(
            r#"
            SELECT id, username, email, password_hash, avatar_url, created_at_utc
            FROM users WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        row.map(UserRecord::from).ok_or(StoreError::NotFound)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    async fn create(&self, new_user: NewUser) -> Result<UserRecord, StoreError> {
        let row: UserRow = sqlx::query_as(
            r#"
            INSERT INTO users (username, email, password_hash, avatar_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, password_hash, avatar_url, created_at_utc
            "#,
        )
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(&new_user.avatar_url)
        .fetch_one(&self.pool)
        .await?;

        info!("Created new user with ID: {}", row.id);

        Ok(row.into())
    }
}

#[async_trait]
impl PostStore for PgStore {
    async fn posts_by_author(&self, author_id: Uuid) -> Result<Vec<PostRecord>, StoreError> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.author_id, u.username AS author_username,
                   u.avatar_url AS author_avatar_url, p.title, p.body, p.created_at_utc
            FROM posts p
            JOIN users u ON u.id = p.author_id
            WHERE p.author_id = $1
            ORDER BY p.created_at_utc DESC
            "#,
        )
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }

    async fn count_by_author(&self, author_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE author_id = $1")
            .bind(author_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn feed_for(&self, user_id: Uuid) -> Result<Vec<PostRecord>, StoreError> {
        let rows: Vec<PostRow> = sqlx::query_as(
            r#"
            SELECT p.id, p.author_id, u.username AS author_username,
                   u.avatar_url AS author_avatar_url, p.title, p.body, p.created_at_utc
            FROM follows f
            JOIN posts p ON p.author_id = f.followed_id
            JOIN users u ON u.id = p.author_id
            WHERE f.follower_id = $1
            ORDER BY p.created_at_utc DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostRecord::from).collect())
    }
}

#[async_trait]
impl FollowStore for PgStore {
    async fn is_following(
        &self,
        follower_id: Uuid,
        followed_id: Uuid,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM follows WHERE follower_id = $1 AND followed_id = $2)",
        )
        .bind(follower_id)
        .bind(followed_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    async fn count_followers(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE followed_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn count_following(&self, user_id: Uuid) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
            .bind(user_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    async fn followers_of(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, StoreError> {
        let rows: Vec<CardRow> = sqlx::query_as(
            r#"
            SELECT u.username, u.avatar_url
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.followed_id = $1
            ORDER BY f.created_at_utc DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProfileCard::from).collect())
    }

    async fn following_of(&self, user_id: Uuid) -> Result<Vec<ProfileCard>, StoreError> {
        let rows: Vec<CardRow> = sqlx::query_as(
            r#"
            SELECT u.username, u.avatar_url
            FROM follows f
            JOIN users u ON u.id = f.followed_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at_utc DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProfileCard::from).collect())
    }

    async fn follow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, followed_id)
            VALUES ($1, $2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(follower_id)
        .bind(followed_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn unfollow(&self, follower_id: Uuid, followed_id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND followed_id = $2")
            .bind(follower_id)
            .bind(followed_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
