//! Navigation between the top-level routes.

use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Top-level routes the session flow moves between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Recipe book.
    Home,

    /// Login / sign-up form.
    Auth,
}

impl Route {
    /// URL path of the route.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Auth => "/auth",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Navigation service.
pub trait Navigator: Send + Sync {
    /// Show `route`.
    fn navigate(&self, route: Route);
}

/// Navigator that publishes the current route on a watch channel.
///
/// A UI shell subscribes and renders whatever route is current.
#[derive(Debug, Clone)]
pub struct RouteChannel {
    sender: Arc<watch::Sender<Route>>,
}

impl RouteChannel {
    /// Start at `initial`.
    #[must_use]
    pub fn new(initial: Route) -> Self {
        let (sender, _) = watch::channel(initial);
        Self {
            sender: Arc::new(sender),
        }
    }

    /// Route currently shown.
    #[must_use]
    pub fn current(&self) -> Route {
        *self.sender.borrow()
    }

    /// Observe route changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.sender.subscribe()
    }
}

impl Default for RouteChannel {
    fn default() -> Self {
        Self::new(Route::Auth)
    }
}

impl Navigator for RouteChannel {
    fn navigate(&self, route: Route) {
        let previous = self.sender.send_replace(route);
        tracing::debug!(from = %previous, to = %route, "Navigated");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscribers_see_navigation() {
        let routes = RouteChannel::default();
        let mut rx = routes.subscribe();

        routes.navigate(Route::Home);

        assert!(rx.changed().await.is_ok());
        assert_eq!(*rx.borrow(), Route::Home);
        assert_eq!(routes.current(), Route::Home);
    }

    #[test]
    fn test_navigate_without_subscribers() {
        let routes = RouteChannel::new(Route::Home);
        routes.navigate(Route::Auth);
        assert_eq!(routes.current(), Route::Auth);
    }
}
