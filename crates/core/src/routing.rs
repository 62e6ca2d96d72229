//! Route-protection policy.
//!
//! A pure classification of UI pathnames plus the decision table that maps
//! a classification and the externally supplied authentication state to a
//! navigation outcome. No I/O, no session knowledge; the caller supplies
//! everything.

use crate::types::UserId;

// ---------------------------------------------------------------------------
// Prefix sets
// ---------------------------------------------------------------------------

/// Pathname prefixes that require an authenticated user.
pub const PROTECTED_PREFIXES: &[&str] = &[
    "/dashboard",
    "/editor",
    "/images",
    "/templates",
    "/designs",
    "/profile",
];

/// Pathname prefixes reserved for unauthenticated flows.
pub const PUBLIC_PREFIXES: &[&str] = &["/auth", "/login", "/signup"];

/// Where an unauthenticated user is sent from a protected route.
pub const SIGN_IN_ROUTE: &str = "/auth/login";

/// Where an authenticated user is sent from a public route.
pub const HOME_ROUTE: &str = "/dashboard";

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Protection class of a pathname.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Protected,
    Public,
    Neutral,
}

/// Classify a pathname by prefix. Pure and total.
pub fn classify(pathname: &str) -> RouteClass {
    if PROTECTED_PREFIXES.iter().any(|p| pathname.starts_with(p)) {
        RouteClass::Protected
    } else if PUBLIC_PREFIXES.iter().any(|p| pathname.starts_with(p)) {
        RouteClass::Public
    } else {
        RouteClass::Neutral
    }
}

// ---------------------------------------------------------------------------
// Decision table
// ---------------------------------------------------------------------------

/// Authentication state as supplied by the external auth provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthState {
    pub user: Option<UserId>,
    /// True while the provider has not yet resolved the current user.
    pub loading: bool,
}

/// Outcome of a navigation decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    RedirectTo(&'static str),
}

/// Decide what to do with a navigation given its class and auth state.
///
/// While auth state is still loading, every navigation is allowed; the
/// caller re-evaluates once loading settles. Otherwise: a protected route
/// without a user redirects to sign-in, a public route with a user
/// redirects home, and everything else is allowed.
pub fn decide(class: RouteClass, auth: &AuthState) -> RouteDecision {
    if auth.loading {
        return RouteDecision::Allow;
    }
    match (class, auth.user) {
        (RouteClass::Protected, None) => RouteDecision::RedirectTo(SIGN_IN_ROUTE),
        (RouteClass::Public, Some(_)) => RouteDecision::RedirectTo(HOME_ROUTE),
        _ => RouteDecision::Allow,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
