// src/auth.rs
use crate::database::{DatabaseConfig, User, UserService};
use anyhow::Result;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use rocket::http::Status;
use rocket::request::{FromRequest, Outcome};
use rocket::{Request, State};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Claims carried by the bearer token. Token issuance belongs to the
/// identity provider; this service only decodes and passes the identity
/// through.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub name: Option<String>,
    pub exp: usize,
    pub iat: usize,
}

pub struct AuthConfig {
    pub jwt_secret: String,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = std::env::var("TALENTHUB_JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("TALENTHUB_JWT_SECRET environment variable not set"))?;
        Ok(Self { jwt_secret })
    }
}

/// Display name for a first-time user: the token's name claim when present,
/// otherwise the local part of the email.
fn derive_display_name(claims: &Claims) -> String {
    match claims.name.as_deref().map(str::trim) {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => claims
            .email
            .split('@')
            .next()
            .unwrap_or(&claims.email)
            .to_string(),
    }
}

fn decode_token(token: &str, config: &AuthConfig) -> Result<Claims> {
    let validation = Validation::new(Algorithm::HS256);
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )?;
    Ok(token_data.claims)
}

/// Authenticated user resolved from the bearer token. The user row is
/// created on first sight with the candidate role.
pub struct AuthenticatedUser {
    pub claims: Claims,
    pub user: User,
}

impl AuthenticatedUser {
    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn email(&self) -> &str {
        &self.user.email
    }

    pub fn display_name(&self) -> &str {
        &self.user.display_name
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedUser {
    type Error = AuthError;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let auth_config = match req.guard::<&State<AuthConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        let db_config = match req.guard::<&State<DatabaseConfig>>().await {
            Outcome::Success(config) => config,
            Outcome::Error((status, _)) => {
                return Outcome::Error((status, AuthError::DatabaseError))
            }
            Outcome::Forward(f) => return Outcome::Forward(f),
        };

        // Extract Authorization header
        let token = match req.headers().get_one("Authorization") {
            Some(header) if header.starts_with("Bearer ") => &header[7..],
            Some(_) => {
                warn!("Invalid Authorization header format");
                return Outcome::Error((Status::Unauthorized, AuthError::InvalidToken));
            }
            None => {
                warn!("Missing Authorization header");
                return Outcome::Error((Status::Unauthorized, AuthError::MissingToken));
            }
        };

        let claims = match decode_token(token, auth_config) {
            Ok(claims) => claims,
            Err(e) => {
                warn!("Token verification failed: {}", e);
                return Outcome::Error((Status::Unauthorized, AuthError::TokenVerificationFailed));
            }
        };

        let pool = match db_config.pool() {
            Ok(pool) => pool,
            Err(e) => {
                error!("Database connection failed: {}", e);
                return Outcome::Error((Status::InternalServerError, AuthError::DatabaseError));
            }
        };

        let user_service = UserService::new(pool);
        let display_name = derive_display_name(&claims);

        let user = match user_service.get_or_create(&claims.email, &display_name).await {
            Ok(user) => user,
            Err(e) => {
                error!("Failed to get or create user {}: {}", claims.email, e);
                return Outcome::Error((Status::InternalServerError, AuthError::DatabaseError));
            }
        };

        Outcome::Success(AuthenticatedUser { claims, user })
    }
}

#[derive(Debug)]
pub enum AuthError {
    MissingToken,
    InvalidToken,
    TokenVerificationFailed,
    NotAuthorized,
    DatabaseError,
}

impl AuthError {
    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "Authorization token required",
            AuthError::InvalidToken => "Invalid authorization token format",
            AuthError::TokenVerificationFailed => "Token verification failed",
            AuthError::NotAuthorized => "User not authorized for this operation",
            AuthError::DatabaseError => "Database error occurred",
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

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(email: &str, name: Option<&str>) -> Claims {
        Claims {
            sub: "user-1".to_string(),
            email: email.to_string(),
            name: name.map(str::to_string),
            exp: 2_000_000_000,
            iat: 1_700_000_000,
        }
    }

    #[test]
    fn display_name_prefers_name_claim() {
        let claims = claims("jane.doe@example.com", Some("Jane Doe"));
        assert_eq!(derive_display_name(&claims), "Jane Doe");
    }

    #[test]
    fn display_name_falls_back_to_email_local_part() {
        assert_eq!(
            derive_display_name(&claims("jane.doe@example.com", None)),
            "jane.doe"
        );
        assert_eq!(
            derive_display_name(&claims("jane.doe@example.com", Some("   "))),
            "jane.doe"
        );
    }
}
