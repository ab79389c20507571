//! Core type definitions used across the LinkShare workspace.

pub mod capabilities;
pub mod id;
pub mod operation;
pub mod permissions;
pub mod snapshot;
pub mod view;

pub use capabilities::ShareCapabilities;
pub use id::ShareId;
pub use operation::{OperationKind, OperationOutcome, PendingOperation};
pub use permissions::{LinkPolicy, SharePermissions};
pub use snapshot::{OtherShareType, RemoteShare, ShareSnapshot};
pub use view::ShareView;
