//! Link-share observer events.

use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;
use crate::types::{OperationKind, OperationOutcome, ShareCapabilities, ShareId, ShareView};

/// Every user-visible state change of a link-share controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShareEvent {
    /// Sharing is possible; these are the constraints in force.
    CapabilitiesResolved {
        /// The server capabilities.
        capabilities: ShareCapabilities,
    },
    /// The share list was replaced by a fresh fetch.
    SharesRefreshed {
        /// Link shares in server order.
        shares: Vec<ShareView>,
        /// Selection after reselection.
        selected: Option<ShareId>,
    },
    /// The selected share changed, or its attributes did.
    SelectionChanged {
        /// The selected share, or `None` when nothing is selected.
        share: Option<ShareView>,
    },
    /// An operation was accepted and handed to the transport.
    OperationStarted {
        /// Target share; `None` for creation.
        share_id: Option<ShareId>,
        /// What is being done.
        kind: OperationKind,
    },
    /// An accepted operation reached its terminal outcome.
    OperationCompleted {
        /// Target share; for creation, the new share on success.
        share_id: Option<ShareId>,
        /// What was done.
        kind: OperationKind,
        /// How it ended.
        outcome: OperationOutcome,
    },
    /// Link creation needs a password before it can be retried.
    AwaitingPasswordForCreate {
        /// The server's message, verbatim.
        message: String,
    },
    /// An error the user should see. Replaces any previous error.
    ErrorOccurred {
        /// Category of the error.
        kind: ErrorKind,
        /// Status code from the service, if any.
        code: Option<i32>,
        /// Message, verbatim.
        message: String,
    },
    /// The previously shown error no longer applies.
    ErrorCleared,
}
