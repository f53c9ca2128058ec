//! Authentication error types.

use thiserror::Error;

use crate::db::RepositoryError;

/// Errors that can occur during authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid credentials (wrong password or user not found).
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Username or email already belongs to an account.
    #[error(
        "duplicate registration (username taken: {username_taken}, email taken: {email_taken})"
    )]
    DuplicateRegistration {
        /// The username is in use.
        username_taken: bool,
        /// The email address is in use.
        email_taken: bool,
    },

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}
