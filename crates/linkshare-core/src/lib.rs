//! # linkshare-core
//!
//! Core crate for LinkShare. Contains the transport trait, configuration
//! schemas, share identifiers and permission types, capability snapshots,
//! observer events, and the unified error system.
//!
//! This crate has **no** internal dependencies on other LinkShare crates.

pub mod config;
pub mod error;
pub mod events;
pub mod result;
pub mod traits;
pub mod types;

pub use error::{AppError, ErrorKind};
pub use result::AppResult;
