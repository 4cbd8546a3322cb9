//! Navigation targets and the role guard.

use crate::model::Role;
use crate::session::Session;
use std::fmt::Display;

/// Entry points of the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Login,
    Register,
    Menu,
    /// Student order tracking.
    Orders,
    /// Vendor dashboard.
    Vendor,
}

impl Route {
    /// Where a freshly signed-in user lands.
    pub fn landing(role: Role) -> Self {
        match role {
            Role::Vendor => Route::Vendor,
            Role::Student => Route::Menu,
        }
    }

    /// Resolves a navigation attempt against the current session.
    ///
    /// Orders needs any session, Vendor needs a vendor session; everything else is
    /// public. Denied attempts are redirected to Login.
    pub fn guard(self, session: Option<&Session>) -> Route {
        match (self, session) {
            (Route::Orders, Some(_)) => Route::Orders,
            (Route::Vendor, Some(s)) if s.role == Role::Vendor => Route::Vendor,
            (Route::Orders | Route::Vendor, _) => Route::Login,
            (public, _) => public,
        }
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let path = match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Menu => "/menu",
            Route::Orders => "/orders",
            Route::Vendor => "/vendor",
        };
        f.write_str(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserId;

    #[test]
    fn test_guard_by_role() {
        let student = Session::new("t", "ali", Role::Student, UserId(2));
        let vendor = Session::new("t", "huda", Role::Vendor, UserId(1));

        assert_eq!(Route::Orders.guard(None), Route::Login);
        assert_eq!(Route::Orders.guard(Some(&student)), Route::Orders);
        assert_eq!(Route::Vendor.guard(Some(&student)), Route::Login);
        assert_eq!(Route::Vendor.guard(Some(&vendor)), Route::Vendor);
        assert_eq!(Route::Menu.guard(None), Route::Menu);
    }

    #[test]
    fn test_landing_pages() {
        assert_eq!(Route::landing(Role::Vendor), Route::Vendor);
        assert_eq!(Route::landing(Role::Student), Route::Menu);
    }
}
