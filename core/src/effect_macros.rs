//! Declarative macros for ergonomic effect construction
//!
//! These macros reduce boilerplate when creating `Effect` variants inside
//! reducers.

/// Create an `Effect::Future` from an async block
///
/// # Example
///
/// ```rust,ignore
/// use mise_core::async_effect;
///
/// async_effect! {
///     repository.clear().await.ok();
///     None
/// }
/// ```
#[macro_export]
macro_rules! async_effect {
    ($($body:tt)*) => {
        $crate::effect::Effect::Future(
            ::std::boxed::Box::pin(async move { $($body)* })
        )
    };
}

/// Create an `Effect::Delay` for scheduling delayed actions
///
/// # Example
///
/// ```rust,ignore
/// use mise_core::delay;
/// use std::time::Duration;
///
/// delay! {
///     duration: Duration::from_secs(3600),
///     action: SessionAction::Logout
/// }
/// ```
#[macro_export]
macro_rules! delay {
    (
        duration: $duration:expr,
        action: $action:expr
    ) => {
        $crate::effect::Effect::Delay {
            duration: $duration,
            action: ::std::boxed::Box::new($action),
        }
    };
}

/// Create an `Effect::Future` that immediately yields an action
///
/// Used when a reducer wants a follow-up action to travel through the
/// runtime (and its action broadcast) instead of recursing into itself.
///
/// # Example
///
/// ```rust,ignore
/// use mise_core::emit;
///
/// emit!(SessionAction::AuthenticateFail { message })
/// ```
#[macro_export]
macro_rules! emit {
    ($action:expr) => {{
        let action = $action;
        $crate::effect::Effect::Future(::std::boxed::Box::pin(async move { Some(action) }))
    }};
}
