//! Share service implementations.

pub mod memory;

pub use memory::{MemoryTransport, ServerState, generate_token};
