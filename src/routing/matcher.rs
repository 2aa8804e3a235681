//! Route matching logic.
//!
//! # Design Decisions
//! - Path matching is case-sensitive and operates on the raw path
//! - No regex; exact and prefix comparisons only

use crate::http::Request;

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches(&self, req: &Request) -> bool;
}

/// Matches one path exactly.
#[derive(Debug, Clone)]
pub struct ExactPathMatcher {
    path: String,
}

impl ExactPathMatcher {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Matcher for ExactPathMatcher {
    fn matches(&self, req: &Request) -> bool {
        req.path() == self.path
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, req: &Request) -> bool {
        req.routes_to(&self.prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Method;

    #[test]
    fn test_exact_matcher() {
        let matcher = ExactPathMatcher::new("/user-agent");
        assert!(matcher.matches(&Request::new(Method::Get, "/user-agent")));
        assert!(!matcher.matches(&Request::new(Method::Get, "/user-agent/")));
        assert!(!matcher.matches(&Request::new(Method::Get, "/USER-AGENT")));
    }

    #[test]
    fn test_path_matcher() {
        let matcher = PathPrefixMatcher::new("/echo/");
        assert!(matcher.matches(&Request::new(Method::Get, "/echo/abc")));
        assert!(matcher.matches(&Request::new(Method::Get, "/echo/")));
        assert!(!matcher.matches(&Request::new(Method::Get, "/echo")));
        assert!(!matcher.matches(&Request::new(Method::Get, "/files/echo/")));
    }
}
