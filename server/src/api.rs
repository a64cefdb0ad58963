use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use crate::credentials::{self, LoginForm};
use crate::state::AppState;
use crate::token::ApiUser;

/// Fixed API error strings. The client never sees the underlying detail.
pub const API_LOGIN_REJECTION: &str = "Sorry, your values are not correct.";
pub const API_USER_REJECTION: &str = "Sorry, invalid user requested.";

/// Verify credentials and answer with a signed 20-minute token as a JSON
/// string; any failure collapses to the fixed error string.
pub async fn api_login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Response {
    match credentials::login(&state, &form).await {
        Ok(user) => match state.jwt.sign(user.user_id) {
            Ok(token) => Json(token).into_response(),
            Err(err) => {
                error!("Failed to sign API token: {:?}", err);
                Json(API_LOGIN_REJECTION).into_response()
            }
        },
        Err(err) => {
            info!("Rejected API login for {}: {}", form.username, err);
            Json(API_LOGIN_REJECTION).into_response()
        }
    }
}

/// Resolve a username and answer with the author's posts as a JSON array.
/// User-not-found and store faults collapse to the same fixed error string.
pub async fn api_posts_by_username(
    State(state): State<AppState>,
    Path(username): Path<String>,
    _caller: ApiUser,
) -> Response {
    let author = match state.users.find_by_username(&username).await {
        Ok(author) => author,
        Err(err) => {
            info!("API posts lookup for {} failed: {}", username, err);
            return Json(API_USER_REJECTION).into_response();
        }
    };

    match state.posts.posts_by_author(author.user_id).await {
        Ok(posts) => Json(posts).into_response(),
        Err(err) => {
            error!("Failed to load posts for {}: {:?}", username, err);
            Json(API_USER_REJECTION).into_response()
        }
    }
}
