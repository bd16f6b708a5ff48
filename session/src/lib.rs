//! # Mise Session
//!
//! The session state machine: login, sign-up, auto-login, logout and the
//! logout timer, expressed as a reducer plus the effects it returns.
//!
//! ## Architecture
//!
//! ```text
//! LoginStart ──► Reducer ──► identity call (cancellable, one per mode)
//!                  ▲                 │
//!                  │      AttemptSettled{attempt}
//!                  │                 ▼
//!                  └──── AuthenticateSuccess / AuthenticateFail
//! ```
//!
//! A new attempt aborts the previous in-flight call of the same mode, and
//! the attempt counter in [`SessionState`] drops any result that raced past
//! the abort. Only the newest attempt can ever sign a user in.
//!
//! ## Example
//!
//! ```rust,ignore
//! use mise_session::*;
//! use mise_runtime::Store;
//!
//! let env = SessionEnvironment::new(
//!     FirebaseIdentityClient::new(config.identity.clone()),
//!     FileSessionRepository::new(&config.session_file),
//!     RouteChannel::default(),
//!     Arc::new(SystemClock),
//! );
//! let store = Store::new(SessionState::default(), SessionReducer::new(), env);
//!
//! store.send(SessionAction::AutoLogin).await?;
//! ```

pub mod actions;
pub mod config;
pub mod effects;
pub mod environment;
pub mod error;
pub mod providers;
pub mod reducer;
pub mod state;
pub mod user;

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks;

pub use actions::SessionAction;
pub use config::{IdentityConfig, SessionConfig};
pub use environment::SessionEnvironment;
pub use error::{IdentityError, IdentityErrorCode, Result, SessionError};
pub use providers::{
    AuthGrant, FileSessionRepository, FirebaseIdentityClient, IdentityProvider, Navigator, Route,
    RouteChannel, SessionRepository,
};
pub use reducer::SessionReducer;
pub use state::SessionState;
pub use user::{AuthMode, Credentials, User};
