// src/auth.rs
use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const TOKEN_COOKIE: &str = "scoutling_token";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // User ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthConfig {
    issuer: String,
    token_ttl: Duration,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl AuthConfig {
    pub fn new(secret: &str, issuer: impl Into<String>, token_ttl_hours: i64) -> Self {
        Self {
            issuer: issuer.into(),
            token_ttl: Duration::hours(token_ttl_hours),
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Sign an HS256 token for `user_id`
    pub fn issue_token(&self, user_id: &str, email: Option<&str>) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.map(str::to_string),
            iss: self.issuer.clone(),
            iat: now.timestamp() as usize,
            exp: (now + self.token_ttl).timestamp() as usize,
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?)
    }

    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        if token_data.claims.sub.trim().is_empty() {
            anyhow::bail!("Token has an empty subject");
        }
        Ok(token_data.claims)
    }
}

/// User identity taken from a verified bearer token or the session cookie
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    NotConfigured,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::NotConfigured => "Authentication is not configured",
        }
    }
}

fn extract_token<'r>(req: &'r Request<'_>) -> Result<String, AuthError> {
    match req.headers().get_one("Authorization") {
        Some(header) => header
            .strip_prefix("Bearer ")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidToken),
        None => req
            .cookies()
            .get(TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .ok_or(AuthError::MissingToken),
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => return Outcome::Error((status, AuthError::NotConfigured)),
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let token = match extract_token(req) {
            Ok(token) => token,
            Err(e) => {
                warn!("{}", e.message());
                return Outcome::Error((Status::Unauthorized, e));
            }
        };

        match auth_config.verify(&token) {
            Ok(claims) => {
                info!("User {} authenticated", claims.sub);
                Outcome::Success(AuthenticatedUser {
                    user_id: claims.sub,
                    email: claims.email,
                })
            }
            Err(e) => {
                warn!("Token verification failed: {}", e);
                Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed))
            }
        }
    }
}

// Optional auth guard that doesn't fail if no auth is provided
pub struct OptionalAuth {
    pub user: Option<AuthenticatedUser>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for OptionalAuth {
    type Error = ();

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        match AuthenticatedUser::from_request(req).await {
            Outcome::Success(auth) => Outcome::Success(OptionalAuth { user: Some(auth) }),
            _ => Outcome::Success(OptionalAuth { user: None }),
        }
    }
}
