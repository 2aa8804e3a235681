//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Parsed Request (method, path, headers)
//!     → router.rs (ordered route table lookup)
//!     → matcher.rs (evaluate path conditions)
//!     → Route (Root | Echo | UserAgent | Files | NotFound)
//!     → handlers.rs (build the Response)
//! ```
//!
//! # Design Decisions
//! - Route table built once, immutable at runtime
//! - First match wins, in table order
//! - Explicit NotFound rather than an implicit fallthrough
//! - Handlers never fail: every error becomes a status code

pub mod handlers;
pub mod matcher;
pub mod router;

pub use router::{Route, Router};
