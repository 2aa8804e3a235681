//! File storage subsystem.
//!
//! # Data Flow
//! ```text
//! /files/{name} request
//!     → file_store.rs (resolve name against the serve directory)
//!     → tokio::fs (stat / open / read / write)
//!     → bytes or StorageError
//!     → files handler maps errors to 404 / 500
//! ```
//!
//! # Design Decisions
//! - Names are joined to the directory by plain concatenation; no traversal
//!   checks are made
//! - Writes open without truncation, so a shorter write leaves the old tail
//! - Concurrent writers to one file are not serialized (last writer wins)

pub mod file_store;

pub use file_store::{FileStore, StorageError};
