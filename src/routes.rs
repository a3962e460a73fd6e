//! Path to view mapping, gated by the session's role.

use crate::models::Role;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    Register,
    Properties,
    PropertyDetail(String),
    NewProperty,
    Dashboard,
    Admin,
    NotFound(String),
}

/// Outcome of the role gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allowed,
    LoginRequired,
    Denied,
}

impl Route {
    /// Query strings and trailing slashes are ignored
    pub fn parse(path: &str) -> Route {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["properties"] => Route::Properties,
            ["properties", "new"] => Route::NewProperty,
            ["properties", id] => Route::PropertyDetail((*id).to_string()),
            ["dashboard"] => Route::Dashboard,
            ["admin"] => Route::Admin,
            _ => Route::NotFound(path.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::Properties => "/properties".to_string(),
            Route::PropertyDetail(id) => format!("/properties/{id}"),
            Route::NewProperty => "/properties/new".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Admin => "/admin".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    /// Gate for a visitor with `role` (`None` when signed out)
    pub fn access(&self, role: Option<Role>) -> Access {
        match self {
            Route::Home
            | Route::Login
            | Route::Register
            | Route::Properties
            | Route::PropertyDetail(_)
            | Route::NotFound(_) => Access::Allowed,
            Route::Dashboard => match role {
                Some(Role::Tenant | Role::Owner | Role::Admin) => Access::Allowed,
                None => Access::LoginRequired,
            },
            Route::NewProperty => match role {
                Some(Role::Owner) => Access::Allowed,
                Some(Role::Tenant | Role::Admin) => Access::Denied,
                None => Access::LoginRequired,
            },
            Route::Admin => match role {
                Some(Role::Admin) => Access::Allowed,
                Some(Role::Tenant | Role::Owner) => Access::Denied,
                None => Access::LoginRequired,
            },
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/properties/"), Route::Properties);
        assert_eq!(Route::parse("/properties/new"), Route::NewProperty);
        assert_eq!(Route::parse("/properties/p1?tab=photos"), Route::PropertyDetail("p1".into()));
        assert_eq!(Route::parse("/dashboard"), Route::Dashboard);
        assert_eq!(Route::parse("/nope/x"), Route::NotFound("/nope/x".into()));
    }

    #[test]
    fn dashboard_needs_sign_in() {
        assert_eq!(Route::Dashboard.access(None), Access::LoginRequired);
        assert_eq!(Route::Dashboard.access(Some(Role::Tenant)), Access::Allowed);
    }

    #[test]
    fn owner_and_admin_pages_are_role_gated() {
        assert_eq!(Route::NewProperty.access(Some(Role::Tenant)), Access::Denied);
        assert_eq!(Route::NewProperty.access(Some(Role::Owner)), Access::Allowed);
        assert_eq!(Route::Admin.access(Some(Role::Owner)), Access::Denied);
        assert_eq!(Route::Admin.access(Some(Role::Admin)), Access::Allowed);
        assert_eq!(Route::Admin.access(None), Access::LoginRequired);
    }

    #[test]
    fn public_pages_are_open() {
        assert_eq!(Route::parse("/properties/p9").access(None), Access::Allowed);
    }
}
