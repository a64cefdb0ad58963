use axum::{
    async_trait,
    extract::{FromRequest, Request},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::state::AppState;

/// Fixed lifetime of API tokens.
pub const TOKEN_TTL_MINUTES: i64 = 20;

/// The fixed response for any token verification failure. Detail is never
/// leaked to the client.
pub const TOKEN_REJECTION: &str = "Sorry, you must provide a valid token.";

/// Signing configuration for the stateless API tokens.
#[derive(Clone)]
pub struct JwtConfig {
    secret: String,
}

/// Claims carried by an API token. Verified by signature and expiry only;
/// there is no server-side record.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiClaims {
    pub user_id: Uuid,
    pub exp: i64,
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn from_env() -> color_eyre::Result<Self> {
        Ok(Self::new(std::env::var("JWT_SECRET")?))
    }

    /// Sign a token asserting the given user id, expiring in
    /// [`TOKEN_TTL_MINUTES`].
    pub fn sign(&self, user_id: Uuid) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = ApiClaims {
            user_id,
            exp: (Utc::now() + chrono::Duration::minutes(TOKEN_TTL_MINUTES)).timestamp(),
        };

        jsonwebtoken::encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
    }

    pub fn verify(&self, token: &str) -> Result<ApiClaims, jsonwebtoken::errors::Error> {
        let data = jsonwebtoken::decode::<ApiClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )?;

        Ok(data.claims)
    }
}

#[derive(Deserialize)]
struct TokenPayload {
    token: String,
}

/// Extract the verified API caller from the `token` field of the JSON body.
/// Any failure short-circuits with the fixed JSON error string.
pub struct ApiUser {
    pub user_id: Uuid,
}

#[async_trait]
impl FromRequest<AppState> for ApiUser {
    type Rejection = Response;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let Json(payload) = Json::<TokenPayload>::from_request(req, state)
            .await
            .map_err(|_| Json(TOKEN_REJECTION).into_response())?;

        match state.jwt.verify(&payload.token) {
            Ok(claims) => Ok(ApiUser {
                user_id: claims.user_id,
            }),
            Err(err) => {
                info!("Rejected API token: {}", err);
                Err(Json(TOKEN_REJECTION).into_response())
            }
        }
    }
}
