//! Error types for session operations.

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;

/// Message shown for any failure without a more specific explanation.
pub const GENERIC_AUTH_MESSAGE: &str = "An unknown error occurred!";

/// Failures of the session collaborators (storage, configuration).
///
/// Identity failures have their own type, [`IdentityError`], because they
/// are converted into user-facing messages rather than propagated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// Reading or writing the persisted session failed.
    #[error("Session storage failed: {0}")]
    Storage(String),

    /// A required configuration value is missing.
    #[error("Missing configuration: {var} is not set")]
    MissingConfig {
        /// Environment variable that was expected.
        var: &'static str,
    },

    /// A configuration value is present but unusable.
    #[error("Invalid configuration for {var}: {reason}")]
    InvalidConfig {
        /// Environment variable at fault.
        var: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Error codes reported by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityErrorCode {
    /// Sign-up with an address that already has an account.
    EmailExists,

    /// Login with an address that has no account.
    EmailNotFound,

    /// Login with the wrong password.
    InvalidPassword,

    /// Any other code, kept verbatim.
    Other(String),
}

impl IdentityErrorCode {
    /// Parse the `message` field of an identity error body.
    ///
    /// The service sometimes appends detail as `CODE : detail`; only the
    /// code is significant.
    #[must_use]
    pub fn parse(message: &str) -> Self {
        let code = message
            .split_once(" : ")
            .map_or(message, |(code, _)| code)
            .trim();

        match code {
            "EMAIL_EXISTS" => Self::EmailExists,
            "EMAIL_NOT_FOUND" => Self::EmailNotFound,
            "INVALID_PASSWORD" => Self::InvalidPassword,
            other => Self::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for IdentityErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmailExists => f.write_str("EMAIL_EXISTS"),
            Self::EmailNotFound => f.write_str("EMAIL_NOT_FOUND"),
            Self::InvalidPassword => f.write_str("INVALID_PASSWORD"),
            Self::Other(code) => f.write_str(code),
        }
    }
}

/// Failure of a login or sign-up call.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// The identity service answered with an error body.
    #[error("Identity service rejected the request: {0}")]
    Rejected(IdentityErrorCode),

    /// The request never produced a usable answer.
    #[error("Identity request failed: {0}")]
    Transport(String),

    /// The service answered 2xx with a body we could not read.
    #[error("Malformed identity response: {0}")]
    MalformedResponse(String),
}

impl IdentityError {
    /// Message suitable for showing to the user.
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::Rejected(IdentityErrorCode::EmailExists) => "This email exists already",
            Self::Rejected(IdentityErrorCode::EmailNotFound) => "This email does not exist",
            Self::Rejected(IdentityErrorCode::InvalidPassword) => "This password is not correct",
            Self::Rejected(IdentityErrorCode::Other(_))
            | Self::Transport(_)
            | Self::MalformedResponse(_) => GENERIC_AUTH_MESSAGE,
        }
    }
}
