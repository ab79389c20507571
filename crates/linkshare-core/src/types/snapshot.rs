//! Share records as returned by the remote share service.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::ShareId;
use super::permissions::SharePermissions;

/// Kind of a share that is not a public link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OtherShareType {
    /// Shared with a single user.
    User,
    /// Shared with a group.
    Group,
    /// Shared with a user on another server.
    Remote,
}

/// The attributes of one public link share.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareSnapshot {
    /// Server-assigned identifier.
    pub id: ShareId,
    /// Server-assigned token embedded in the link URL.
    pub token: String,
    /// User-given name.
    #[serde(default)]
    pub name: Option<String>,
    /// Whether a password protects the link. The password itself is never
    /// returned.
    #[serde(default)]
    pub password_is_set: bool,
    /// Date after which the link stops working.
    #[serde(default)]
    pub expire_date: Option<NaiveDate>,
    /// Permission bits granted to recipients.
    pub permissions: SharePermissions,
    /// Whether recipients may browse the shared folder.
    #[serde(default = "default_true")]
    pub show_file_listing: bool,
    /// Public URL of the link.
    #[serde(default)]
    pub url: Option<String>,
}

/// A share of any kind, as listed for a path.
///
/// Only [`RemoteShare::Link`] entries reach the link-share controller;
/// everything else is dropped at the share manager boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "share_type", rename_all = "snake_case")]
pub enum RemoteShare {
    /// A public link share.
    Link(ShareSnapshot),
    /// Any other share kind.
    Other {
        /// Server-assigned identifier.
        id: ShareId,
        /// The concrete share kind.
        kind: OtherShareType,
        /// Who the item is shared with.
        #[serde(default)]
        share_with: Option<String>,
    },
}

impl RemoteShare {
    /// Identifier regardless of share kind.
    pub fn id(&self) -> &ShareId {
        match self {
            Self::Link(snapshot) => &snapshot.id,
            Self::Other { id, .. } => id,
        }
    }

    /// The link snapshot, if this is a link share.
    pub fn into_link(self) -> Option<ShareSnapshot> {
        match self {
            Self::Link(snapshot) => Some(snapshot),
            Self::Other { .. } => None,
        }
    }
}

fn default_true() -> bool {
    true
}
