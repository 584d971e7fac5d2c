//! Session state shared by every request made through an [`APIClient`].
//!
//! The session is an explicit object handed to the client rather than
//! ambient storage. Logging in moves it to [`AuthState::LoggedIn`]; an
//! explicit logout or any 401 response moves it back to
//! [`AuthState::LoggedOut`] and asks the [`Navigator`] for the login route.
//!
//! [`APIClient`]: crate::APIClient

use secrecy::{ExposeSecret, SecretString};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use crate::responses::UserInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
        }
    }
}

/// Performs navigation for the hosting application.
pub trait Navigator: Send + Sync {
    fn push(&self, route: &Route);
}

/// A navigator that only records where it was sent. Useful for headless
/// hosts and tests.
#[derive(Debug, Default)]
pub struct NavigationHistory {
    entries: Mutex<Vec<Route>>,
}

impl NavigationHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Route> {
        match self.entries.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn count(&self, route: Route) -> usize {
        self.entries().iter().filter(|r| **r == route).count()
    }
}

impl Navigator for NavigationHistory {
    fn push(&self, route: &Route) {
        tracing::info!(path = route.path(), "navigating");
        match self.entries.lock() {
            Ok(mut entries) => entries.push(*route),
            Err(poisoned) => poisoned.into_inner().push(*route),
        }
    }
}

#[derive(Debug, Default)]
pub enum AuthState {
    #[default]
    LoggedOut,
    LoggedIn {
        token: SecretString,
        user: Option<UserInfo>,
    },
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, AuthState::LoggedIn { .. })
    }

    pub fn user(&self) -> Option<&UserInfo> {
        match self {
            AuthState::LoggedIn { user, .. } => user.as_ref(),
            AuthState::LoggedOut => None,
        }
    }
}

/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct Session {
    state: Arc<watch::Sender<AuthState>>,
    navigator: Arc<dyn Navigator>,
}

impl Session {
    pub fn new(navigator: Arc<dyn Navigator>) -> Self {
        Self {
            state: Arc::new(watch::Sender::new(AuthState::LoggedOut)),
            navigator,
        }
    }

    /// A session that already holds a token, e.g. one restored by the host.
    pub fn with_token(
        navigator: Arc<dyn Navigator>,
        token: impl Into<String>,
    ) -> Self {
        let session = Self::new(navigator);
        session.login(token);
        session
    }

    pub fn login(&self, token: impl Into<String>) {
        let token = SecretString::from(token.into());
        self.state.send_replace(AuthState::LoggedIn { token, user: None });
        tracing::debug!("session established");
    }

    /// Attach the profile of the logged in user. Ignored when logged out.
    pub fn set_user(&self, profile: UserInfo) {
        self.state.send_modify(|state| {
            if let AuthState::LoggedIn { user, .. } = state {
                *user = Some(profile);
            }
        });
    }

    /// User-initiated logout: drop the credential and go to the login page.
    pub fn logout(&self) {
        self.state.send_replace(AuthState::LoggedOut);
        self.navigator.push(&Route::Login);
    }

    /// The backend rejected our credential. Every occurrence clears the
    /// credential and navigates to the login page once.
    pub fn expire(&self) {
        let previous = self.state.send_replace(AuthState::LoggedOut);
        tracing::warn!(
            was_authenticated = previous.is_authenticated(),
            "session expired"
        );
        self.navigator.push(&Route::Login);
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().is_authenticated()
    }

    pub fn user(&self) -> Option<UserInfo> {
        self.state.borrow().user().cloned()
    }

    /// The raw bearer token, only for building the `Authorization` header.
    pub(crate) fn bearer_token(&self) -> Option<String> {
        match &*self.state.borrow() {
            AuthState::LoggedIn { token, .. } => {
                Some(token.expose_secret().to_string())
            }
            AuthState::LoggedOut => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}
