//! Routes, the session guard and the session itself.

use crate::error::StorageError;
use crate::storage::TokenStore;
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `from` is the protected path the user was turned away from, if any.
    Login { from: Option<String> },
    Register,
    Dashboard,
    Conversation(String),
    NotFound,
}

impl Route {
    pub fn login() -> Self {
        Route::Login { from: None }
    }

    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim();
        let trimmed = trimmed.split(['?', '#']).next().unwrap_or_default();
        let trimmed = trimmed.trim_end_matches('/');
        match trimmed {
            "" | "/login" => Route::login(),
            "/register" => Route::Register,
            "/dashboard" => Route::Dashboard,
            other => match other.strip_prefix("/conversations/") {
                Some(id) if !id.is_empty() && !id.contains('/') => Route::Conversation(id.to_string()),
                _ => Route::NotFound,
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Login { .. } => "/login".into(),
            Route::Register => "/register".into(),
            Route::Dashboard => "/dashboard".into(),
            Route::Conversation(id) => format!("/conversations/{id}"),
            Route::NotFound => "/404".into(),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Dashboard | Route::Conversation(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Something that can move the application to another view.
///
/// Called from background tasks as well, so implementations must only queue
/// the request, never touch widgets.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Navigator backed by an unbounded channel; the shell drains the receiver.
#[derive(Debug, Clone)]
pub struct ChannelNavigator {
    tx: UnboundedSender<Route>,
}

impl ChannelNavigator {
    pub fn channel() -> (Self, UnboundedReceiver<Route>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        log::debug!("navigate -> {route}");
        if self.tx.send(route).is_err() {
            log::warn!("navigation dropped: shell is gone");
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Granted(Route),
    Redirect(Route),
}

impl Access {
    /// The route that should actually be shown.
    pub fn into_route(self) -> Route {
        match self {
            Access::Granted(route) | Access::Redirect(route) => route,
        }
    }
}

/// Presence check on the stored credential. Validity is the backend's call.
#[derive(Clone)]
pub struct SessionGuard {
    store: Arc<dyn TokenStore>,
}

impl SessionGuard {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.load().is_some()
    }

    pub fn check(&self, requested: Route) -> Access {
        if !requested.is_protected() || self.is_authenticated() {
            return Access::Granted(requested);
        }
        log::info!("no stored credential, redirecting {requested} to login");
        Access::Redirect(Route::Login { from: Some(requested.path()) })
    }
}

/// Token lifecycle plus the navigator the rest of the client reports to.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(store: Arc<dyn TokenStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn guard(&self) -> SessionGuard {
        SessionGuard::new(self.store.clone())
    }

    pub fn token(&self) -> Option<String> {
        self.store.load()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    pub fn navigate(&self, route: Route) {
        self.navigator.navigate(route);
    }

    pub fn login(&self, token: &str) -> Result<(), StorageError> {
        self.store.store(token)
    }

    pub fn logout(&self, redirect_to_login: bool) {
        if let Err(e) = self.store.clear() {
            log::warn!("could not remove stored credentials: {e}");
        }
        if redirect_to_login {
            self.navigator.navigate(Route::login());
        }
    }

    /// The backend rejected the credential.
    pub fn expire(&self) {
        log::info!("credential rejected by backend, forcing re-login");
        self.logout(true);
    }
}

/// Where to go once a login succeeds: back to the protected path the guard
/// turned away from, otherwise the dashboard.
pub fn post_login_route(from: Option<&str>) -> Route {
    match from.map(Route::parse) {
        Some(route) if route.is_protected() => route,
        _ => Route::Dashboard,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryTokenStore;

    fn session(token: Option<&str>) -> (Session, UnboundedReceiver<Route>) {
        let store: Arc<dyn TokenStore> = match token {
            Some(t) => Arc::new(MemoryTokenStore::with_token(t)),
            None => Arc::new(MemoryTokenStore::default()),
        };
        let (nav, rx) = ChannelNavigator::channel();
        (Session::new(store, Arc::new(nav)), rx)
    }

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::login());
        assert_eq!(Route::parse("/login"), Route::login());
        assert_eq!(Route::parse("/dashboard/"), Route::Dashboard);
        assert_eq!(Route::parse("/register?x=1"), Route::Register);
        assert_eq!(Route::parse("/conversations/42"), Route::Conversation("42".into()));
        assert_eq!(Route::parse("/conversations/"), Route::NotFound);
        assert_eq!(Route::parse("/nope"), Route::NotFound);
    }

    #[test]
    fn guard_redirects_protected_routes_without_token() {
        let (session, _rx) = session(None);
        let guard = session.guard();
        assert_eq!(
            guard.check(Route::Dashboard),
            Access::Redirect(Route::Login { from: Some("/dashboard".into()) })
        );
        assert_eq!(
            guard.check(Route::Conversation("9".into())),
            Access::Redirect(Route::Login { from: Some("/conversations/9".into()) })
        );
    }

    #[test]
    fn guard_lets_public_routes_through() {
        let (session, _rx) = session(None);
        let guard = session.guard();
        assert_eq!(guard.check(Route::Register), Access::Granted(Route::Register));
        assert_eq!(guard.check(Route::NotFound), Access::Granted(Route::NotFound));
    }

    #[test]
    fn guard_grants_with_token() {
        let (session, _rx) = session(Some("abc"));
        assert_eq!(session.guard().check(Route::Dashboard), Access::Granted(Route::Dashboard));
    }

    #[test]
    fn logout_clears_token_and_redirects() {
        let (session, mut rx) = session(Some("abc"));
        session.logout(true);
        assert!(!session.is_authenticated());
        assert_eq!(rx.try_recv().ok(), Some(Route::login()));
    }

    #[test]
    fn logout_without_redirect_stays_put() {
        let (session, mut rx) = session(Some("abc"));
        session.logout(false);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn post_login_returns_to_protected_origin() {
        assert_eq!(post_login_route(None), Route::Dashboard);
        assert_eq!(post_login_route(Some("/conversations/3")), Route::Conversation("3".into()));
        assert_eq!(post_login_route(Some("/register")), Route::Dashboard);
    }
}
