//! Authentication service - registration, login and bearer tokens.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Actor, NewUser, Password, User, UserResponse, UserRole};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: UserRole,
    pub iat: i64,
    pub exp: i64,
}

/// Registration input, already shape-validated by the handler.
#[derive(Debug, Clone)]
pub struct Registration {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Option<String>,
}

/// Response body for register and login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthSession {
    #[schema(example = "Login successful")]
    pub message: String,
    pub user: UserResponse,
    /// Bearer token, valid for seven days
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create an account and sign it in.
    async fn register(&self, registration: Registration) -> AppResult<AuthSession>;

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession>;

    /// Check signature and expiry of a bearer token.
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Verify a token and reload its user, so role changes and deletions
    /// apply to tokens issued before them.
    async fn authenticate(&self, token: &str) -> AppResult<User>;

    async fn profile(&self, actor: &Actor) -> AppResult<User>;
}

/// Issue a signed HS256 token for `user`.
pub fn issue_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user.id,
        role: user.role,
        iat: now.timestamp(),
        exp: (now + Duration::hours(config.jwt_expiration_hours)).timestamp(),
    };

    Ok(encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )?)
}

pub fn verify_token(token: &str, config: &Config) -> AppResult<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret_bytes()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn session(&self, user: User, message: &str) -> AppResult<AuthSession> {
        let token = issue_token(&user, &self.config)?;
        Ok(AuthSession {
            message: message.to_string(),
            user: user.into(),
            token,
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(&self, registration: Registration) -> AppResult<AuthSession> {
        let role = match registration.role.as_deref() {
            None => UserRole::default(),
            Some(raw) => raw.parse::<UserRole>()?,
        };

        let email = registration.email.trim().to_lowercase();
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("User already exists"));
        }

        let password_hash = Password::new(&registration.password)?.into_string();
        let user = self
            .uow
            .users()
            .create(NewUser {
                email,
                password_hash,
                name: registration.name.trim().to_string(),
                role,
            })
            .await?;

        tracing::info!(user_id = %user.id, role = %user.role, "User registered");
        self.session(user, "User created successfully")
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthSession> {
        let email = email.trim().to_lowercase();
        let user = match self.uow.users().find_by_email(&email).await? {
            Some(user) => user,
            None => {
                // Same Argon2 cost as a real mismatch, so unknown emails are not
                // distinguishable by timing.
                Password::verify_dummy(&password);
                return Err(AppError::InvalidCredentials);
            }
        };

        if !Password::from_hash(user.password_hash.clone()).verify(&password) {
            tracing::debug!(user_id = %user.id, "Rejected login with wrong password");
            return Err(AppError::InvalidCredentials);
        }

        self.session(user, "Login successful")
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        verify_token(token, &self.config)
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.verify_token(token)?;
        self.uow
            .users()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AppError::Unauthorized)
    }

    async fn profile(&self, actor: &Actor) -> AppResult<User> {
        let id = actor.require_id()?;
        self.uow
            .users()
            .find_by_id(id)
            .await?
            .ok_or(AppError::Unauthorized)
    }
}
