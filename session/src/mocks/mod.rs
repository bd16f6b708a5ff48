//! Mock provider implementations for testing.
//!
//! This module provides simple, in-memory implementations of all provider traits
//! for use in unit and integration tests.

pub mod identity;
pub mod navigation;
pub mod repository;

pub use identity::MockIdentityProvider;
pub use navigation::RecordingNavigator;
pub use repository::InMemorySessionRepository;
