//! Presentation view of a single link share.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::id::ShareId;
use super::operation::PendingOperation;
use super::permissions::LinkPolicy;

/// Everything a presentation layer needs to render one link share.
///
/// Built by the controller from its authoritative share list; observers
/// never hold references into controller state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareView {
    /// Server-assigned identifier.
    pub id: ShareId,
    /// Name to show, resolved with the display-name rule.
    pub display_name: String,
    /// Whether the name may be edited in place.
    pub name_editable: bool,
    /// Server-assigned token.
    pub token: String,
    /// Whether a password protects the link.
    pub password_is_set: bool,
    /// Expiry date, if any.
    pub expire_date: Option<NaiveDate>,
    /// Recipient policy. `None` for files, which have no upload choice.
    pub policy: Option<LinkPolicy>,
    /// Whether recipients may browse the shared folder.
    pub show_file_listing: bool,
    /// Operation currently in flight for this share.
    pub pending: PendingOperation,
    /// Public URL of the link.
    pub url: Option<String>,
    /// Direct download URL, offered only when file listing is shown.
    pub direct_download_url: Option<String>,
}
