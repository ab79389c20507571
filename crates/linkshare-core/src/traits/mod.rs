//! Core traits defined in `linkshare-core` and implemented by other crates.

pub mod transport;

pub use transport::ShareTransport;
