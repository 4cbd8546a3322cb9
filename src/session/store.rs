use crate::model::{Role, UserId};
use crate::session::storage::{
    SessionStorage, StorageError, ROLE_KEY, TOKEN_KEY, USERNAME_KEY, USER_ID_KEY,
};
use crate::session::Route;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// An authenticated identity. Immutable once published.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    /// Bearer credential for API calls.
    pub token: String,
    pub username: String,
    pub role: Role,
    pub user_id: UserId,
}

impl Session {
    pub fn new(
        token: impl Into<String>,
        username: impl Into<String>,
        role: Role,
        user_id: UserId,
    ) -> Self {
        Self {
            token: token.into(),
            username: username.into(),
            role,
            user_id,
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("token", &"***")
            .field("username", &self.username)
            .field("role", &self.role)
            .field("user_id", &self.user_id)
            .finish()
    }
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// The user signed out.
    Logout,
    /// The backend rejected the token (HTTP 401).
    Unauthorized,
}

impl TeardownReason {
    pub fn route(&self) -> Route {
        match self {
            TeardownReason::Logout => Route::Home,
            TeardownReason::Unauthorized => Route::Login,
        }
    }
}

struct Inner {
    storage: Arc<dyn SessionStorage>,
    session: watch::Sender<Option<Arc<Session>>>,
    route: watch::Sender<Route>,
}

/// Owner of the current session and route.
///
/// Cheap to clone; all clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<Inner>,
}

impl SessionStore {
    /// Builds a store, restoring a previous session from `storage`.
    ///
    /// The session is restored only when all four keys are present and parse;
    /// anything less starts signed out.
    pub fn restore(storage: Arc<dyn SessionStorage>) -> Self {
        let restored = match load(storage.as_ref()) {
            Ok(Some(session)) => {
                info!(username = %session.username, role = %session.role, "Session restored");
                Some(Arc::new(session))
            }
            Ok(None) => {
                debug!("No stored session");
                None
            }
            Err(e) => {
                warn!(error = %e, "Could not read stored session");
                None
            }
        };

        let (session, _) = watch::channel(restored);
        let (route, _) = watch::channel(Route::Home);
        Self {
            inner: Arc::new(Inner {
                storage,
                session,
                route,
            }),
        }
    }

    /// Persists and publishes `session`, then navigates to the role's landing page.
    pub fn login(&self, session: Session) -> Result<Route, StorageError> {
        let storage = &self.inner.storage;
        let user_id = session.user_id.to_string();
        let persisted = storage.set_all(&[
            (TOKEN_KEY, session.token.as_str()),
            (ROLE_KEY, session.role.as_str()),
            (USERNAME_KEY, session.username.as_str()),
            (USER_ID_KEY, user_id.as_str()),
        ]);

        if let Err(e) = persisted {
            warn!(error = %e, "Could not persist session");
            // Never leave half a session behind
            if let Err(e) = storage.clear() {
                warn!(error = %e, "Could not clear session storage");
            }
            return Err(e);
        }

        let landing = Route::landing(session.role);
        info!(username = %session.username, role = %session.role, %landing, "Signed in");
        self.inner.session.send_replace(Some(Arc::new(session)));
        self.inner.route.send_replace(landing);
        Ok(landing)
    }

    /// Explicit sign-out.
    pub fn logout(&self) {
        self.teardown(TeardownReason::Logout);
    }

    /// The backend rejected the bearer token.
    pub fn invalidate(&self) {
        self.teardown(TeardownReason::Unauthorized);
    }

    /// The single exit path of a session: storage cleared, `None` published,
    /// route moved to the reason's target.
    pub fn teardown(&self, reason: TeardownReason) {
        if let Err(e) = self.inner.storage.clear() {
            warn!(error = %e, "Could not clear session storage");
        }
        let previous = self.inner.session.send_replace(None);
        match previous {
            Some(session) => info!(username = %session.username, ?reason, "Session ended"),
            None => debug!(?reason, "Teardown without a session"),
        }
        self.inner.route.send_replace(reason.route());
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.inner.session.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.inner.session.borrow().as_ref().map(|s| s.token.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<Session>>> {
        self.inner.session.subscribe()
    }

    pub fn route(&self) -> Route {
        *self.inner.route.borrow()
    }

    pub fn subscribe_route(&self) -> watch::Receiver<Route> {
        self.inner.route.subscribe()
    }

    /// Attempts to move to `target`; the role guard may redirect to Login.
    pub fn navigate(&self, target: Route) -> Route {
        let resolved = target.guard(self.current().as_deref());
        if resolved != target {
            debug!(%target, %resolved, "Navigation redirected");
        }
        self.inner.route.send_replace(resolved);
        resolved
    }
}

fn load(storage: &dyn SessionStorage) -> Result<Option<Session>, StorageError> {
    let (Some(token), Some(role), Some(username), Some(user_id)) = (
        storage.get(TOKEN_KEY)?,
        storage.get(ROLE_KEY)?,
        storage.get(USERNAME_KEY)?,
        storage.get(USER_ID_KEY)?,
    ) else {
        return Ok(None);
    };

    let (Ok(role), Ok(user_id)) = (role.parse::<Role>(), user_id.parse::<u64>()) else {
        warn!("Stored session is malformed, starting signed out");
        return Ok(None);
    };
    if token.is_empty() {
        return Ok(None);
    }

    Ok(Some(Session::new(token, username, role, UserId(user_id))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryStorage;

    fn seeded(entries: &[(&str, &str)]) -> Arc<MemoryStorage> {
        let storage = Arc::new(MemoryStorage::new());
        for (key, value) in entries {
            storage.set(key, value).unwrap();
        }
        storage
    }

    #[test]
    fn test_restore_requires_every_key() {
        let full = [
            (TOKEN_KEY, "jwt"),
            (ROLE_KEY, "student"),
            (USERNAME_KEY, "ali"),
            (USER_ID_KEY, "2"),
        ];
        let store = SessionStore::restore(seeded(&full));
        let session = store.current().unwrap();
        assert_eq!(session.username, "ali");
        assert_eq!(session.user_id, UserId(2));

        for missing in 0..full.len() {
            let partial: Vec<_> = full
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != missing)
                .map(|(_, kv)| *kv)
                .collect();
            assert!(SessionStore::restore(seeded(&partial)).current().is_none());
        }
    }

    #[test]
    fn test_restore_rejects_malformed_values() {
        let bad_role = seeded(&[
            (TOKEN_KEY, "jwt"),
            (ROLE_KEY, "admin"),
            (USERNAME_KEY, "ali"),
            (USER_ID_KEY, "2"),
        ]);
        assert!(SessionStore::restore(bad_role).current().is_none());

        let bad_id = seeded(&[
            (TOKEN_KEY, "jwt"),
            (ROLE_KEY, "vendor"),
            (USERNAME_KEY, "huda"),
            (USER_ID_KEY, "one"),
        ]);
        assert!(SessionStore::restore(bad_id).current().is_none());
    }

    #[test]
    fn test_login_persists_all_keys() {
        let storage = Arc::new(MemoryStorage::new());
        let store = SessionStore::restore(storage.clone());

        let route = store
            .login(Session::new("jwt", "ali", Role::Student, UserId(2)))
            .unwrap();
        assert_eq!(route, Route::Menu);
        assert_eq!(store.route(), Route::Menu);
        assert_eq!(storage.len(), 4);
        assert_eq!(storage.get(ROLE_KEY).unwrap().as_deref(), Some("student"));

        // A fresh store over the same storage sees the session
        let again = SessionStore::restore(storage);
        assert_eq!(again.token().as_deref(), Some("jwt"));
    }

    #[test]
    fn test_invalidate_clears_everything_and_routes_to_login() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set("unrelated", "value").unwrap();
        let store = SessionStore::restore(storage.clone());
        store
            .login(Session::new("jwt", "huda", Role::Vendor, UserId(1)))
            .unwrap();

        store.invalidate();
        assert!(store.current().is_none());
        assert_eq!(store.route(), Route::Login);
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn test_subscribers_observe_teardown() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
        store
            .login(Session::new("jwt", "ali", Role::Student, UserId(2)))
            .unwrap();
        let mut rx = store.subscribe();
        assert!(rx.borrow_and_update().is_some());

        store.logout();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
        assert_eq!(store.route(), Route::Home);
    }

    #[test]
    fn test_navigate_applies_guard() {
        let store = SessionStore::restore(Arc::new(MemoryStorage::new()));
        assert_eq!(store.navigate(Route::Orders), Route::Login);
        assert_eq!(store.navigate(Route::Register), Route::Register);

        store
            .login(Session::new("jwt", "ali", Role::Student, UserId(2)))
            .unwrap();
        assert_eq!(store.navigate(Route::Vendor), Route::Login);
        assert_eq!(store.navigate(Route::Orders), Route::Orders);
    }

    #[test]
    fn test_debug_hides_token() {
        let session = Session::new("secret-jwt", "ali", Role::Student, UserId(2));
        assert!(!format!("{session:?}").contains("secret-jwt"));
    }
}
