//! Authentication service.
//!
//! Password registration and login. Passwords are hashed with Argon2id and
//! stored as PHC strings.

mod error;

pub use error::AuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;

use bookshop_core::{Email, Username};

use crate::db::RepositoryError;
use crate::db::users::UserRepository;
use crate::models::User;

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user.
    ///
    /// Inputs are already validated by the registration form.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::DuplicateRegistration` if the username or email is taken.
    /// Returns `AuthError::PasswordHash` if hashing fails.
    pub async fn register(
        &self,
        username: &Username,
        email: &Email,
        password: &str,
    ) -> Result<User, AuthError> {
        self.ensure_available(username, email).await?;

        let password_hash = hash_password(password)?;

        match self.users.create(username, email, &password_hash).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "User registered");
                Ok(user)
            }
            // Lost a race with a concurrent registration.
            Err(RepositoryError::Conflict(_)) => {
                self.ensure_available(username, email).await?;
                Err(AuthError::DuplicateRegistration {
                    username_taken: true,
                    email_taken: true,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is wrong.
    pub async fn login(&self, email: &Email, password: &str) -> Result<User, AuthError> {
        let (user, password_hash) = self
            .users
            .get_password_hash(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        Ok(user)
    }

    async fn ensure_available(&self, username: &Username, email: &Email) -> Result<(), AuthError> {
        let username_taken = self.users.username_exists(username).await?;
        let email_taken = self.users.email_exists(email).await?;

        if username_taken || email_taken {
            return Err(AuthError::DuplicateRegistration {
                username_taken,
                email_taken,
            });
        }
        Ok(())
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
///
/// A stored value that is not a PHC string (the anonymous account) never matches.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}
