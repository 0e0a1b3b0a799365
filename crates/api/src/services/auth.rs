//! Authentication service for customer registration and login.

use chrono::NaiveDate;
use sqlx::PgPool;
use thiserror::Error;

use domain::models::{ActorContext, CustomerAccount, Role};
use domain::services::audit_events;
use persistence::repositories::{
    AuditLogRepository, CustomerRepository, NewCustomerAccount, ProfileRepository,
};
use shared::jwt::{JwtConfig, JwtError};
use shared::password::{hash_password, verify_password, PasswordError};

use crate::config::JwtAuthConfig;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Email already registered")]
    EmailAlreadyExists,

    #[error("Profile name already taken")]
    NameAlreadyExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token error: {0}")]
    TokenError(#[from] JwtError),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

/// Input for self-service customer registration.
#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub contact: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub token: String,
    pub expires_in: i64,
    pub profile_id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub customer_id: Option<i64>,
}

/// Authentication service.
pub struct AuthService {
    pool: PgPool,
    jwt: JwtConfig,
}

impl AuthService {
    /// Creates a new AuthService with the given database pool and JWT configuration.
    pub fn new(pool: PgPool, jwt_config: &JwtAuthConfig) -> Self {
        let jwt = JwtConfig::with_leeway(
            &jwt_config.secret,
            jwt_config.token_expiry_secs,
            jwt_config.leeway_secs,
        );
        Self { pool, jwt }
    }

    /// Register a new customer account.
    ///
    /// Creates the profile row and the customer row in one transaction. No
    /// token is issued; the caller logs in separately.
    pub async fn register(&self, input: RegisterInput) -> Result<CustomerAccount, AuthError> {
        let profiles = ProfileRepository::new(self.pool.clone());

        // Pre-check for a friendly error; the unique index still backstops races
        if profiles.email_taken(&input.email, None).await? {
            return Err(AuthError::EmailAlreadyExists);
        }

        let password_hash = hash_password(&input.password)?;

        let customers = CustomerRepository::new(self.pool.clone());
        let result = customers
            .create_with_profile(
                &ActorContext::registration(),
                &NewCustomerAccount {
                    name: input.name,
                    email: input.email,
                    password_hash,
                    contact: input.contact,
                    address: input.address,
                    status: None,
                    date_of_birth: input.date_of_birth,
                },
                None,
            )
            .await;

        // Email and profile name are both unique; a concurrent registration
        // losing the race lands here instead of in the pre-check
        if let Err(sqlx::Error::Database(db_err)) = &result {
            if db_err.code().as_deref() == Some("23505") {
                return Err(if db_err.constraint() == Some("profiles_name_key") {
                    AuthError::NameAlreadyExists
                } else {
                    AuthError::EmailAlreadyExists
                });
            }
        }
        let account = result?;

        AuditLogRepository::new(self.pool.clone()).insert_async(audit_events::customer_created(
            account.customer_id,
            account.profile_id,
            &account.email,
            None,
        ));

        Ok(account)
    }

    /// Login with email or profile name.
    pub async fn login(&self, identifier: &str, password: &str) -> Result<LoginResult, AuthError> {
        let profiles = ProfileRepository::new(self.pool.clone());

        let auth = profiles
            .find_for_login(identifier)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &auth.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        let role = auth.role();
        let (token, jti) = self
            .jwt
            .generate_token(auth.profile_id, role.as_str(), auth.customer_id)?;

        tracing::info!(
            profile_id = auth.profile_id,
            role = %role,
            jti = %jti,
            "Login succeeded"
        );

        Ok(LoginResult {
            token,
            expires_in: self.jwt.token_expiry_secs,
            profile_id: auth.profile_id,
            name: auth.name,
            email: auth.email,
            role,
            customer_id: auth.customer_id,
        })
    }
}
