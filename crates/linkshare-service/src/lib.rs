//! # linkshare-service
//!
//! Service layer for LinkShare. The [`LinkShareController`] coordinates the
//! link shares of one shared path against a [`ShareTransport`]; the
//! [`ShareManager`] is its only door to that transport.
//!
//! Dependencies are provided at construction time via `Arc` references.
//!
//! [`ShareTransport`]: linkshare_core::traits::ShareTransport

pub mod controller;
pub mod manager;
pub mod transport;

pub use controller::{ControllerPhase, ErrorNotice, LinkShareController, PanelView};
pub use manager::ShareManager;
pub use transport::{MemoryTransport, ServerState};
