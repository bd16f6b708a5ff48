//! Session configuration.
//!
//! Values come from the application (usually the environment), never from
//! constants baked into the reducer.

use crate::error::{Result, SessionError};
use std::path::PathBuf;

/// Identity Toolkit REST base URL.
pub const DEFAULT_IDENTITY_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Where the persisted session lives unless configured otherwise.
pub const DEFAULT_SESSION_FILE: &str = ".mise/session.json";

/// Environment variable holding the identity API key (required).
pub const API_KEY_VAR: &str = "MISE_API_KEY";

/// Environment variable overriding [`DEFAULT_IDENTITY_URL`].
pub const IDENTITY_URL_VAR: &str = "MISE_IDENTITY_URL";

/// Environment variable overriding [`DEFAULT_SESSION_FILE`].
pub const SESSION_FILE_VAR: &str = "MISE_SESSION_FILE";

/// Identity service configuration.
#[derive(Clone)]
pub struct IdentityConfig {
    /// Base URL; operation paths are appended to it.
    ///
    /// Requests go to `{base_url}/{operation}?key={api_key}`.
    pub base_url: String,

    /// API key sent as the `key` query parameter.
    pub api_key: String,
}

impl IdentityConfig {
    /// Create configuration for the public identity endpoint.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_IDENTITY_URL.to_string(),
            api_key: api_key.into(),
        }
    }

    /// Point at a different base URL (emulator, test server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

impl std::fmt::Debug for IdentityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Everything the session feature needs from its host.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Identity service settings.
    pub identity: IdentityConfig,

    /// File the signed-in user is persisted to.
    pub session_file: PathBuf,
}

impl SessionConfig {
    /// Create configuration with the default session file.
    #[must_use]
    pub fn new(identity: IdentityConfig) -> Self {
        Self {
            identity,
            session_file: PathBuf::from(DEFAULT_SESSION_FILE),
        }
    }

    /// Persist the session somewhere else.
    #[must_use]
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = path.into();
        self
    }

    /// Read configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::MissingConfig`] if `MISE_API_KEY` is unset
    /// and [`SessionError::InvalidConfig`] if a value is empty.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// See [`SessionConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |var: &'static str| -> Result<Option<String>> {
            match lookup(var) {
                Some(value) if value.trim().is_empty() => Err(SessionError::InvalidConfig {
                    var,
                    reason: "value is empty".to_string(),
                }),
                value => Ok(value),
            }
        };

        let api_key =
            non_empty(API_KEY_VAR)?.ok_or(SessionError::MissingConfig { var: API_KEY_VAR })?;
        let mut identity = IdentityConfig::new(api_key);
        if let Some(base_url) = non_empty(IDENTITY_URL_VAR)? {
            identity = identity.with_base_url(base_url);
        }

        let mut config = Self::new(identity);
        if let Some(path) = non_empty(SESSION_FILE_VAR)? {
            config = config.with_session_file(path);
        }
        Ok(config)
    }
}
