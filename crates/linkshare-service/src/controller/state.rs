//! Controller lifecycle states.

use serde::{Deserialize, Serialize};

use linkshare_core::error::{AppError, ErrorKind};

/// Lifecycle of a controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ControllerState {
    /// `initialize` has not been called.
    Uninitialized,
    /// Sharing is impossible for this path. Terminal until re-initialized.
    SharingDisabled {
        /// Why sharing is impossible.
        reason: String,
    },
    /// The first fetch is in flight.
    Loading,
    /// At least one fetch has completed.
    Ready,
}

/// Progress of link creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CreateFlow {
    /// No creation in progress.
    Idle,
    /// A create call is in flight.
    InFlight {
        /// Name sent with the request.
        name: Option<String>,
        /// Whether this is a retry with a password after a refusal.
        with_password: bool,
    },
    /// The server refused a passwordless create; the next password entered
    /// retries the create.
    AwaitingPassword {
        /// Name to retry with.
        name: Option<String>,
        /// The server's message.
        message: String,
    },
}

/// Externally observable phase of a controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerPhase {
    /// `initialize` has not been called.
    Uninitialized,
    /// Sharing is impossible for this path.
    SharingDisabled,
    /// The first fetch is in flight.
    Loading,
    /// Ready, nothing selected.
    NoSelection,
    /// Ready, a share is selected.
    SelectionActive,
    /// Ready, link creation waits for a password.
    AwaitingPasswordForCreate,
}

/// The error currently shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorNotice {
    /// Category of the error.
    pub kind: ErrorKind,
    /// Status code from the service, if any.
    pub code: Option<i32>,
    /// Message, verbatim.
    pub message: String,
}

impl From<&AppError> for ErrorNotice {
    fn from(err: &AppError) -> Self {
        Self {
            kind: err.kind,
            code: err.code,
            message: err.message.clone(),
        }
    }
}
