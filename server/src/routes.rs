use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
    Json,
};
use color_eyre::eyre::WrapErr as _;
use serde::Deserialize;
use time::Duration;
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, Session, SessionManagerLayer};
use tracing::{error, info};

use crate::auth::{self, AuthUser, OptionalUser, SESSION_USER_KEY};
use crate::components::pages;
use crate::components::profile::ProfileTab;
use crate::credentials::{self, CredentialError, LoginForm, RegisterForm};
use crate::errors::ServerResult;
use crate::profile::{shared_profile_data, ProfileOwner};
use crate::state::AppState;

/// Build the application router with all routes.
pub fn routes(app_state: AppState) -> axum::Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::days(30)));

    axum::Router::new()
        // Browser surface
        .route("/", get(home))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/register", post(register))
        .route("/doesUsernameExist", post(does_username_exist))
        .route("/doesEmailExist", post(does_email_exist))
        // Profile screens
        .route("/profile/:username", get(profile_posts))
        .route("/profile/:username/followers", get(profile_followers))
        .route("/profile/:username/following", get(profile_following))
        .route("/follow/:username", post(follow))
        .route("/unfollow/:username", post(unfollow))
        // API surface
        .route("/api/login", post(crate::api::api_login))
        .route(
            "/api/postsByUsername/:username",
            get(crate::api::api_posts_by_username),
        )
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(session_layer)
        .with_state(app_state)
}

/// Home page: the personalized feed for a signed-in visitor, otherwise the
/// guest page carrying any pending flash messages.
async fn home(
    State(state): State<AppState>,
    OptionalUser { user, session }: OptionalUser,
) -> ServerResult<Response, StatusCode> {
    match user {
        Some(user) => {
            let posts = state
                .posts
                .feed_for(user.user_id)
                .await
                .wrap_err("Failed to load home feed")?;

            Ok(pages::dashboard(&user, &posts).into_response())
        }
        None => {
            let errors = auth::take_flash(&session, auth::FLASH_ERRORS_KEY)
                .await
                .wrap_err("Failed to drain flash messages")?;
            let reg_errors = auth::take_flash(&session, auth::REG_ERRORS_KEY)
                .await
                .wrap_err("Failed to drain registration flashes")?;

            Ok(pages::guest_home(errors, reg_errors).into_response())
        }
    }
}

async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> ServerResult<Redirect, StatusCode> {
    match credentials::login(&state, &form).await {
        Ok(user) => {
            session
                .insert(SESSION_USER_KEY, &user)
                .await
                .wrap_err("Failed to write session user")?;

            info!("User {} logged in", user.username);
            Ok(Redirect::to("/"))
        }
        Err(CredentialError::InvalidCredentials) => {
            auth::push_flash(
                &session,
                auth::FLASH_ERRORS_KEY,
                credentials::INVALID_CREDENTIALS_MESSAGE,
            )
            .await
            .wrap_err("Failed to flash login error")?;

            Ok(Redirect::to("/"))
        }
        Err(err) => Err(color_eyre::Report::from(err)
            .wrap_err("Login failed against the store")
            .into()),
    }
}

async fn logout(AuthUser { session, user }: AuthUser) -> ServerResult<Redirect, StatusCode> {
    session.flush().await.wrap_err("Failed to destroy session")?;

    info!("User {} logged out", user.username);
    Ok(Redirect::to("/"))
}

async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> ServerResult<Redirect, StatusCode> {
    match credentials::register(&state, &form).await {
        Ok(user) => {
            session
                .insert(SESSION_USER_KEY, &user)
                .await
                .wrap_err("Failed to write session user")?;

            info!("New user {} registered", user.username);
            Ok(Redirect::to("/"))
        }
        Err(CredentialError::Validation(messages)) => {
            for message in messages {
                auth::push_flash(&session, auth::REG_ERRORS_KEY, message)
                    .await
                    .wrap_err("Failed to flash registration error")?;
            }

            Ok(Redirect::to("/"))
        }
        Err(err) => Err(color_eyre::Report::from(err)
            .wrap_err("Registration failed against the store")
            .into()),
    }
}

#[derive(Deserialize)]
struct UsernameProbe {
    username: String,
}

#[derive(Deserialize)]
struct EmailProbe {
    email: String,
}

/// Live-validation probe. A store failure reads as "does not exist".
async fn does_username_exist(
    State(state): State<AppState>,
    Json(probe): Json<UsernameProbe>,
) -> Json<bool> {
    Json(state.users.find_by_username(&probe.username).await.is_ok())
}

async fn does_email_exist(
    State(state): State<AppState>,
    Json(probe): Json<EmailProbe>,
) -> Json<bool> {
    Json(
        state
            .users
            .email_exists(&probe.email)
            .await
            .unwrap_or(false),
    )
}

async fn profile_posts(
    State(state): State<AppState>,
    OptionalUser { user, .. }: OptionalUser,
    ProfileOwner(owner): ProfileOwner,
) -> Response {
    let ctx = match shared_profile_data(&state, &owner, user.as_ref()).await {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("Profile aggregation for {} failed: {:?}", owner.username, err);
            return pages::not_found();
        }
    };

    match state.posts.posts_by_author(owner.user_id).await {
        Ok(posts) => {
            pages::profile_screen(&owner, &ctx, user.as_ref(), ProfileTab::Posts(&posts))
                .into_response()
        }
        Err(err) => {
            error!("Failed to load posts for {}: {:?}", owner.username, err);
            pages::not_found()
        }
    }
}

async fn profile_followers(
    State(state): State<AppState>,
    OptionalUser { user, .. }: OptionalUser,
    ProfileOwner(owner): ProfileOwner,
) -> Response {
    let ctx = match shared_profile_data(&state, &owner, user.as_ref()).await {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("Profile aggregation for {} failed: {:?}", owner.username, err);
            return pages::not_found();
        }
    };

    match state.follows.followers_of(owner.user_id).await {
        Ok(followers) => {
            pages::profile_screen(&owner, &ctx, user.as_ref(), ProfileTab::Followers(&followers))
                .into_response()
        }
        Err(err) => {
            error!("Failed to load followers for {}: {:?}", owner.username, err);
            pages::not_found()
        }
    }
}

async fn profile_following(
    State(state): State<AppState>,
    OptionalUser { user, .. }: OptionalUser,
    ProfileOwner(owner): ProfileOwner,
) -> Response {
    let ctx = match shared_profile_data(&state, &owner, user.as_ref()).await {
        Ok(ctx) => ctx,
        Err(err) => {
            error!("Profile aggregation for {} failed: {:?}", owner.username, err);
            return pages::not_found();
        }
    };

    match state.follows.following_of(owner.user_id).await {
        Ok(following) => {
            pages::profile_screen(&owner, &ctx, user.as_ref(), ProfileTab::Following(&following))
                .into_response()
        }
        Err(err) => {
            error!("Failed to load following for {}: {:?}", owner.username, err);
            pages::not_found()
        }
    }
}

async fn follow(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    ProfileOwner(owner): ProfileOwner,
) -> ServerResult<Redirect, StatusCode> {
    if user.user_id != owner.user_id {
        state
            .follows
            .follow(user.user_id, owner.user_id)
            .await
            .wrap_err("Failed to create follow")?;

        info!("{} now follows {}", user.username, owner.username);
    }

    Ok(Redirect::to(&format!("/profile/{}", owner.username)))
}

async fn unfollow(
    State(state): State<AppState>,
    AuthUser { user, .. }: AuthUser,
    ProfileOwner(owner): ProfileOwner,
) -> ServerResult<Redirect, StatusCode> {
    state
        .follows
        .unfollow(user.user_id, owner.user_id)
        .await
        .wrap_err("Failed to remove follow")?;

    info!("{} unfollowed {}", user.username, owner.username);
    Ok(Redirect::to(&format!("/profile/{}", owner.username)))
}
