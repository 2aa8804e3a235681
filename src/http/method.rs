//! Request methods understood by the server.

use std::fmt;
use std::str::FromStr;

/// HTTP method of an incoming request.
///
/// Only the four methods the routes care about are representable. Anything
/// else on the wire is rejected by the parser rather than mapped to a default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

/// Returned when a wire token names no known method.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid method: {0}")]
pub struct InvalidMethod(pub String);

impl Method {
    /// Canonical upper-case wire token.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl FromStr for Method {
    type Err = InvalidMethod;

    /// Case-insensitive lookup of a wire token.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.eq_ignore_ascii_case("get") {
            Ok(Method::Get)
        } else if token.eq_ignore_ascii_case("post") {
            Ok(Method::Post)
        } else if token.eq_ignore_ascii_case("put") {
            Ok(Method::Put)
        } else if token.eq_ignore_ascii_case("delete") {
            Ok(Method::Delete)
        } else {
            Err(InvalidMethod(token.to_string()))
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
