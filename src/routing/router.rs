//! Route lookup and dispatch.
//!
//! # Responsibilities
//! - Store the ordered route table
//! - Look up the matching route for a request
//! - Dispatch to the handler and return its response
//!
//! # Design Decisions
//! - Immutable after construction (shared across connections without locks)
//! - O(n) scan over a handful of routes
//! - Explicit `Route::NotFound` rather than a silent default

use crate::http::{Request, Response};
use crate::routing::handlers::{self, ECHO_PREFIX, FILES_PREFIX};
use crate::routing::matcher::{ExactPathMatcher, Matcher, PathPrefixMatcher};
use crate::storage::FileStore;

/// The routes the server knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Root,
    Echo,
    UserAgent,
    Files,
    NotFound,
}

impl Route {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Root => "root",
            Route::Echo => "echo",
            Route::UserAgent => "user-agent",
            Route::Files => "files",
            Route::NotFound => "not-found",
        }
    }
}

/// Ordered route table plus the storage the files route needs.
#[derive(Debug)]
pub struct Router {
    routes: Vec<(Box<dyn Matcher>, Route)>,
    store: FileStore,
}

impl Router {
    /// Build the standard route table serving files from `store`.
    pub fn new(store: FileStore) -> Self {
        let routes: Vec<(Box<dyn Matcher>, Route)> = vec![
            (Box::new(ExactPathMatcher::new("/")), Route::Root),
            (Box::new(PathPrefixMatcher::new(ECHO_PREFIX)), Route::Echo),
            (Box::new(ExactPathMatcher::new("/user-agent")), Route::UserAgent),
            (Box::new(PathPrefixMatcher::new(FILES_PREFIX)), Route::Files),
        ];
        Self { routes, store }
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }

    /// First route whose matcher accepts the request.
    pub fn match_request(&self, req: &Request) -> Route {
        self.routes
            .iter()
            .find(|(matcher, _)| matcher.matches(req))
            .map(|(_, route)| *route)
            .unwrap_or(Route::NotFound)
    }

    /// Route the request and run its handler.
    pub async fn dispatch(&self, req: &Request) -> Response {
        let route = self.match_request(req);
        tracing::debug!(
            method = %req.method(),
            path = %req.path(),
            route = route.name(),
            "Dispatching request"
        );

        match route {
            Route::Root => handlers::root(),
            Route::Echo => handlers::echo(req),
            Route::UserAgent => handlers::user_agent(req),
            Route::Files => handlers::files(req, &self.store).await,
            Route::NotFound => handlers::not_found(),
        }
    }
}
