//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, one task per connection)
//!     → request.rs (parse request line, headers, body)
//!     → [routing layer picks a handler]
//!     → response.rs (build, gzip if requested, serialize)
//!     → write to client, close connection
//! ```

pub mod method;
pub mod request;
pub mod response;
pub mod server;
pub mod status;

pub use method::Method;
pub use request::{parse_request, ParseError, Request};
pub use response::{Response, ResponseBuilder};
pub use server::HttpServer;
