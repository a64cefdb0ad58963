use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::mail::Mailer;
use crate::store::postgres::PgStore;
use crate::store::{FollowStore, PostStore, UserStore};
use crate::token::JwtConfig;

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    pub posts: Arc<dyn PostStore>,
    pub follows: Arc<dyn FollowStore>,
    pub jwt: JwtConfig,
    pub mailer: Mailer,
}

impl AppState {
    pub async fn from_env() -> color_eyre::Result<Self> {
        let pool = setup_db_pool().await?;
        let store = Arc::new(PgStore::new(pool));

        Ok(Self {
            users: store.clone(),
            posts: store.clone(),
            follows: store,
            jwt: JwtConfig::from_env()?,
            mailer: Mailer::from_env(),
        })
    }
}

#[tracing::instrument(err)]
pub async fn setup_db_pool() -> color_eyre::Result<PgPool> {
    const MIGRATION_LOCK_ID: i64 = 0x51_D1_55_0C_1A_1A_DB;

    let database_url = std::env::var("DATABASE_URL")?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    sqlx::query("SELECT pg_advisory_lock($1)")
        .bind(MIGRATION_LOCK_ID)
        .execute(&pool)
        .await?;

    sqlx::migrate!("../migrations").run(&pool).await?;

    let unlocked: bool = sqlx::query_scalar("SELECT pg_advisory_unlock($1)")
        .bind(MIGRATION_LOCK_ID)
        .fetch_one(&pool)
        .await?;

    if unlocked {
        tracing::info!("Migration lock unlocked");
    } else {
        tracing::warn!("Failed to unlock migration lock");
    }

    Ok(pool)
}
