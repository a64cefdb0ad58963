use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::error;
use uuid::Uuid;

use crate::state::AppState;

/// Session key for the authenticated user's public fields.
pub const SESSION_USER_KEY: &str = "quill.user";

/// Flash key for one-shot error banners (failed logins, gate rejections).
pub const FLASH_ERRORS_KEY: &str = "quill.flash.errors";

/// Flash key for registration validation messages.
pub const REG_ERRORS_KEY: &str = "quill.flash.reg_errors";

/// The minimal public fields kept in the session for an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionUser {
    pub user_id: Uuid,
    pub username: String,
    pub avatar_url: String,
}

impl From<&crate::store::UserRecord> for SessionUser {
    fn from(record: &crate::store::UserRecord) -> Self {
        Self {
            user_id: record.user_id,
            username: record.username.clone(),
            avatar_url: record.avatar_url.clone(),
        }
    }
}

/// Extract the current user from the request, rejecting if not authenticated.
///
/// On rejection the gate flashes a message for the next rendered page and
/// only then redirects to the site root, so the flash write is never lost.
pub struct AuthUser {
    pub user: SessionUser,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = extract_session(parts, state).await?;

        match session.get::<SessionUser>(SESSION_USER_KEY).await {
            Ok(Some(user)) => Ok(AuthUser { user, session }),
            Ok(None) => {
                if let Err(err) = push_flash(
                    &session,
                    FLASH_ERRORS_KEY,
                    "You must be logged in to perform that action.",
                )
                .await
                {
                    error!("Failed to flash login-required message: {:?}", err);
                }
                Err(Redirect::to("/").into_response())
            }
            Err(err) => {
                error!("Failed to read session user: {:?}", err);
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

/// Extract the current user if authenticated, without rejecting otherwise.
pub struct OptionalUser {
    pub user: Option<SessionUser>,
    pub session: Session,
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let session = extract_session(parts, state).await?;

        match session.get::<SessionUser>(SESSION_USER_KEY).await {
            Ok(user) => Ok(OptionalUser { user, session }),
            Err(err) => {
                error!("Failed to read session user: {:?}", err);
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

async fn extract_session(parts: &mut Parts, state: &AppState) -> Result<Session, Response> {
    Session::from_request_parts(parts, state).await.map_err(|_| {
        error!("Failed to extract session from request");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// Append a one-shot message under the given flash key. The write is awaited
/// so a following redirect cannot outrun it.
pub async fn push_flash(
    session: &Session,
    key: &str,
    message: impl Into<String>,
) -> Result<(), tower_sessions::session::Error> {
    let mut messages: Vec<String> = session.get(key).await?.unwrap_or_default();
    messages.push(message.into());
    session.insert(key, messages).await
}

/// Drain all messages under the given flash key.
pub async fn take_flash(
    session: &Session,
    key: &str,
) -> Result<Vec<String>, tower_sessions::session::Error> {
    Ok(session.remove::<Vec<String>>(key).await?.unwrap_or_default())
}
