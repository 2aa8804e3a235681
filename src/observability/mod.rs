//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events with structured fields
//!     → connection spans (connection_id, peer_addr)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//! ```

pub mod logging;
