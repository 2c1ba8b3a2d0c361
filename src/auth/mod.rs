/*!
 * # Authentication and Authorization
 *
 * Users register and log in with a username and password, receive an HS256
 * JWT, and present it as a bearer token. Role checks run as router layers
 * ahead of the handlers:
 *
 * - `with_auth` requires any valid token
 * - `with_role("admin")` additionally requires the role
 *
 * Passwords are stored as argon2id PHC strings.
 */

use crate::{entities::user, errors::ServiceError};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{Duration as ChronoDuration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use metrics::counter;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    Set,
};
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::Arc, time::Duration};
use strum::{AsRefStr, Display, EnumString};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Roles known to the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, AsRefStr, Serialize, Deserialize, ToSchema)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

/// Claim structure for JWT tokens
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,        // User id
    pub username: String,
    pub roles: Vec<String>,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub nbf: i64,
    pub iss: String,
    pub aud: String,
}

/// Authenticated caller, inserted into request extensions by [`auth_middleware`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub user_id: String,
    pub username: String,
    pub roles: Vec<String>,
    pub token_id: String,
}

impl AuthUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(Role::Admin.as_ref())
    }
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.username,
            roles: claims.roles,
            token_id: claims.jti,
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_audience: String,
    pub jwt_issuer: String,
    pub access_token_expiration: Duration,
}

impl AuthConfig {
    pub fn new(
        jwt_secret: String,
        jwt_audience: String,
        jwt_issuer: String,
        access_token_expiration: Duration,
    ) -> Self {
        Self {
            jwt_secret,
            jwt_audience,
            jwt_issuer,
            access_token_expiration,
        }
    }
}

impl From<&crate::config::AppConfig> for AuthConfig {
    fn from(cfg: &crate::config::AppConfig) -> Self {
        Self::new(
            cfg.jwt_secret.clone(),
            cfg.auth_audience.clone(),
            cfg.auth_issuer.clone(),
            Duration::from_secs(cfg.jwt_expiration as u64),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, max = 64, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 8, max = 128, message = "Password must be at least 8 characters"))]
    pub password: String,
    /// Ignored for the very first account, which always becomes admin.
    /// `admin` otherwise requires an admin bearer token on the request.
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Issued credentials.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthPayload {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: Role,
    pub username: String,
}

/// Issues and validates tokens and owns the user table.
#[derive(Debug, Clone)]
pub struct AuthService {
    pub config: AuthConfig,
    pub db: Arc<DatabaseConnection>,
}

fn hash_password(password: &str) -> Result<String, ServiceError> {
    let salt = SaltString::encode_b64(Uuid::new_v4().as_bytes())
        .map_err(|e| ServiceError::HashError(e.to_string()))?;
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::HashError(e.to_string()))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, ServiceError> {
    let parsed = PasswordHash::new(stored).map_err(|e| ServiceError::HashError(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

impl AuthService {
    pub fn new(config: AuthConfig, db: Arc<DatabaseConnection>) -> Self {
        Self { config, db }
    }

    /// Generate a JWT for a user
    pub fn generate_token(&self, user: &user::Model) -> Result<String, AuthError> {
        let now = Utc::now();
        let exp = now
            + ChronoDuration::from_std(self.config.access_token_expiration)
                .map_err(|_| AuthError::InternalError("Invalid token duration".to_string()))?;

        let claims = Claims {
            sub: user.id.to_string(),
            username: user.username.clone(),
            roles: vec![user.role.clone()],
            jti: Uuid::new_v4().to_string(),
            iat: now.timestamp(),
            exp: exp.timestamp(),
            nbf: now.timestamp(),
            iss: self.config.jwt_issuer.clone(),
            aud: self.config.jwt_audience.clone(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Validate a JWT and extract the claims
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[self.config.jwt_audience.as_str()]);
        validation.set_issuer(&[self.config.jwt_issuer.as_str()]);

        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &validation,
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            _ => AuthError::InvalidToken,
        })
    }

    fn payload(&self, user: &user::Model) -> Result<AuthPayload, ServiceError> {
        let token = self
            .generate_token(user)
            .map_err(|e| ServiceError::InternalError(e.to_string()))?;
        let role = Role::from_str(&user.role)
            .map_err(|_| ServiceError::InternalError(format!("unknown role {}", user.role)))?;
        Ok(AuthPayload {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs() as i64,
            role,
            username: user.username.clone(),
        })
    }

    /// Creates an account. The first account becomes admin whatever role it
    /// asks for; after that only an admin caller may hand out the admin role.
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(
        &self,
        request: RegisterRequest,
        caller_is_admin: bool,
    ) -> Result<AuthPayload, ServiceError> {
        request.validate()?;
        let db = &*self.db;
        let username = request.username.trim().to_string();

        let taken = user::Entity::find()
            .filter(user::Column::Username.eq(username.as_str()))
            .count(db)
            .await?;
        if taken > 0 {
            return Err(ServiceError::Conflict("Username already exists".to_string()));
        }

        let admins = user::Entity::find()
            .filter(user::Column::Role.eq(Role::Admin.as_ref()))
            .count(db)
            .await?;
        let role = match request.role.unwrap_or(Role::User) {
            _ if admins == 0 => Role::Admin,
            Role::Admin if !caller_is_admin => {
                return Err(ServiceError::Forbidden(
                    "Only an admin can create admin accounts".to_string(),
                ));
            }
            requested => requested,
        };

        let created = user::ActiveModel {
            username: Set(username),
            password_hash: Set(hash_password(&request.password)?),
            role: Set(role.to_string()),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;

        counter!("plastics.auth.registrations", 1);
        info!(user_id = created.id, %role, "Registered user");
        self.payload(&created)
    }

    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn login(&self, request: LoginRequest) -> Result<AuthPayload, ServiceError> {
        let invalid = || ServiceError::Unauthorized("Invalid username or password".to_string());

        let found = user::Entity::find()
            .filter(user::Column::Username.eq(request.username.trim()))
            .one(&*self.db)
            .await?;
        let Some(found) = found else {
            counter!("plastics.auth.login_failures", 1);
            return Err(invalid());
        };
        if !verify_password(&request.password, &found.password_hash)? {
            counter!("plastics.auth.login_failures", 1);
            warn!("Rejected login with wrong password");
            return Err(invalid());
        }

        info!(user_id = found.id, "User logged in");
        self.payload(&found)
    }
}

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token creation failed: {0}")]
    TokenCreation(String),
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, error_code, error_message): (StatusCode, &str, String) = match &self {
            Self::MissingAuth => (
                StatusCode::UNAUTHORIZED,
                "AUTH_MISSING",
                "Authentication required".to_string(),
            ),
            Self::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "AUTH_INVALID_TOKEN",
                "Invalid authentication token".to_string(),
            ),
            Self::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                "AUTH_TOKEN_EXPIRED",
                "Token has expired".to_string(),
            ),
            Self::TokenCreation(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_TOKEN_CREATION_FAILED",
                "Token creation failed".to_string(),
            ),
            Self::InsufficientPermissions => (
                StatusCode::FORBIDDEN,
                "AUTH_INSUFFICIENT_PERMISSIONS",
                "Insufficient permissions".to_string(),
            ),
            Self::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AUTH_INTERNAL_ERROR",
                "Internal server error".to_string(),
            ),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": error_code,
                "message": error_message,
            }
        }));

        (status, body).into_response()
    }
}

/// Role middleware to check if a user has the required role
pub async fn role_middleware(
    State(required_role): State<String>,
    request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AuthError::MissingAuth)?;

    if !user.has_role(&required_role) {
        debug!(user_id = %user.user_id, %required_role, "role check failed");
        return Err(AuthError::InsufficientPermissions);
    }

    Ok(next.run(request).await)
}

/// Authentication middleware that extracts and validates bearer tokens
pub async fn auth_middleware(mut request: Request, next: Next) -> Response {
    let auth_service = match request.extensions().get::<Arc<AuthService>>() {
        Some(service) => service.clone(),
        None => {
            return AuthError::InternalError("Authentication service not available".to_string())
                .into_response();
        }
    };

    match extract_auth_from_headers(request.headers(), &auth_service) {
        Ok(user) => {
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}

/// Resolves the caller from an optional bearer token. A missing or invalid
/// token yields `None` instead of an error.
pub fn optional_auth_user(headers: &HeaderMap, auth_service: &AuthService) -> Option<AuthUser> {
    extract_auth_from_headers(headers, auth_service).ok()
}

fn extract_auth_from_headers(
    headers: &HeaderMap,
    auth_service: &AuthService,
) -> Result<AuthUser, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(AuthError::MissingAuth)?;
    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingAuth)?;

    auth_service.validate_token(token).map(AuthUser::from)
}

/// Router extension for applying the auth layers.
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_role(self, role: Role) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    // Layers wrap outside-in, so auth runs before the role check.
    fn with_role(self, role: Role) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            role.to_string(),
            role_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn service() -> AuthService {
        AuthService::new(
            AuthConfig::new(
                "k".repeat(64),
                "plastics-quote-clients".into(),
                "plastics-quote-api".into(),
                Duration::from_secs(3600),
            ),
            Arc::new(DatabaseConnection::Disconnected),
        )
    }

    fn account(role: Role) -> user::Model {
        user::Model {
            id: 7,
            username: "buyer".into(),
            password_hash: String::new(),
            role: role.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn token_round_trips_claims() {
        let auth = service();
        let token = auth.generate_token(&account(Role::Admin)).unwrap();
        let user = AuthUser::from(auth.validate_token(&token).unwrap());
        assert_eq!(user.user_id, "7");
        assert_eq!(user.username, "buyer");
        assert!(user.is_admin());
    }

    #[test]
    fn token_from_other_issuer_is_rejected() {
        let auth = service();
        let mut other = service();
        other.config.jwt_issuer = "someone-else".into();
        let token = other.generate_token(&account(Role::User)).unwrap();
        assert_matches!(auth.validate_token(&token), Err(AuthError::InvalidToken));
    }

    #[test]
    fn bearer_header_is_required() {
        let auth = service();
        let mut headers = HeaderMap::new();
        assert_matches!(
            extract_auth_from_headers(&headers, &auth),
            Err(AuthError::MissingAuth)
        );
        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_matches!(
            extract_auth_from_headers(&headers, &auth),
            Err(AuthError::MissingAuth)
        );
        headers.insert(header::AUTHORIZATION, "Bearer not-a-jwt".parse().unwrap());
        assert_matches!(
            extract_auth_from_headers(&headers, &auth),
            Err(AuthError::InvalidToken)
        );
    }

    #[test]
    fn passwords_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("correct horse", &hash).unwrap());
        assert!(!verify_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn roles_use_lowercase_names() {
        assert_eq!(Role::Admin.to_string(), "admin");
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
    }
}
