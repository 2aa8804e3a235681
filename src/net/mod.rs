//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept)
//!     → connection.rs (connection id, active count)
//!     → Hand off to HTTP layer (one task per connection)
//!
//! Connection States:
//!     Accepted → Reading request → Writing response → Closed
//! ```
//!
//! # Design Decisions
//! - Accepting never waits on a connection task
//! - Each connection tracked so shutdown can wait for in-flight work
//! - No keep-alive: a connection carries exactly one request

pub mod connection;
pub mod listener;
