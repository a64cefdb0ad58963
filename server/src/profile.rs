use axum::{
    async_trait,
    extract::{FromRequestParts, Path},
    http::request::Parts,
    response::Response,
};
use tracing::error;

use crate::auth::SessionUser;
use crate::components::pages;
use crate::state::AppState;
use crate::store::{StoreError, UserRecord};

/// The user record a route's `:username` segment resolves to. Extraction is a
/// terminal branch: a miss renders the generic not-found page and nothing
/// further in the chain runs.
pub struct ProfileOwner(pub UserRecord);

#[async_trait]
impl FromRequestParts<AppState> for ProfileOwner {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(username) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| pages::not_found())?;

        match state.users.find_by_username(&username).await {
            Ok(owner) => Ok(ProfileOwner(owner)),
            Err(StoreError::NotFound) => Err(pages::not_found()),
            Err(err) => {
                // A backend fault degrades to the same page as a miss, but is
                // logged so it can be told apart operationally.
                error!("Profile lookup for {} failed: {:?}", username, err);
                Err(pages::not_found())
            }
        }
    }
}

/// Per-request relationship flags and aggregate counts for a resolved
/// profile owner. Never persisted, always computed fresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProfileContext {
    pub is_visitors_profile: bool,
    pub is_following: bool,
    pub post_count: i64,
    pub follower_count: i64,
    pub following_count: i64,
}

/// Compute the relationship flags and the three aggregate counts for a
/// profile screen.
///
/// Flags are only meaningful with a session; without one both stay `false`.
/// The three counts describe the owner, never the visitor, and are fetched
/// concurrently; if any of them fails the whole aggregation fails.
pub async fn shared_profile_data(
    state: &AppState,
    owner: &UserRecord,
    visitor: Option<&SessionUser>,
) -> Result<ProfileContext, StoreError> {
    let mut is_visitors_profile = false;
    let mut is_following = false;

    if let Some(visitor) = visitor {
        is_visitors_profile = visitor.user_id == owner.user_id;
        is_following = state
            .follows
            .is_following(visitor.user_id, owner.user_id)
            .await?;
    }

    let (post_count, follower_count, following_count) = tokio::try_join!(
        state.posts.count_by_author(owner.user_id),
        state.follows.count_followers(owner.user_id),
        state.follows.count_following(owner.user_id),
    )?;

    Ok(ProfileContext {
        is_visitors_profile,
        is_following,
        post_count,
        follower_count,
        following_count,
    })
}
