//! Operation kinds, per-share pending state, and terminal outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, ErrorKind};

/// An asynchronous operation the controller can run against the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Create a new link share.
    Create,
    /// Rename a share.
    SetName,
    /// Set or clear a share password.
    SetPassword,
    /// Set or clear a share expiry date.
    SetExpireDate,
    /// Change a share's permissions.
    SetPermissions,
    /// Delete a share.
    Delete,
}

impl OperationKind {
    /// Return the kind as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::SetName => "set_name",
            Self::SetPassword => "set_password",
            Self::SetExpireDate => "set_expire_date",
            Self::SetPermissions => "set_permissions",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The single in-flight mutation a share may own at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingOperation {
    /// Nothing in flight.
    #[default]
    None,
    /// A rename is in flight.
    SettingName,
    /// A password change is in flight.
    SettingPassword,
    /// An expiry change is in flight.
    SettingExpiry,
    /// A permission change is in flight.
    SettingPermissions,
    /// A delete is in flight.
    Deleting,
}

impl PendingOperation {
    /// Whether an operation is in flight.
    pub fn is_pending(&self) -> bool {
        !matches!(self, Self::None)
    }

    /// The operation kind in flight, if any.
    pub fn kind(&self) -> Option<OperationKind> {
        match self {
            Self::None => None,
            Self::SettingName => Some(OperationKind::SetName),
            Self::SettingPassword => Some(OperationKind::SetPassword),
            Self::SettingExpiry => Some(OperationKind::SetExpireDate),
            Self::SettingPermissions => Some(OperationKind::SetPermissions),
            Self::Deleting => Some(OperationKind::Delete),
        }
    }
}

impl From<OperationKind> for PendingOperation {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::SetName => Self::SettingName,
            OperationKind::SetPassword => Self::SettingPassword,
            OperationKind::SetExpireDate => Self::SettingExpiry,
            OperationKind::SetPermissions => Self::SettingPermissions,
            OperationKind::Delete => Self::Deleting,
            // Creation is tracked by the controller, not by a share.
            OperationKind::Create => Self::None,
        }
    }
}

/// Terminal outcome of an accepted operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OperationOutcome {
    /// The service accepted the operation.
    Succeeded,
    /// The operation failed; the attribute kept its previous value.
    Failed {
        /// Category of the failure.
        kind: ErrorKind,
        /// Status code from the service, if any.
        code: Option<i32>,
        /// Message from the service, verbatim.
        message: String,
    },
}

impl OperationOutcome {
    /// Whether the operation succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }
}

impl From<&AppError> for OperationOutcome {
    fn from(err: &AppError) -> Self {
        Self::Failed {
            kind: err.kind,
            code: err.code,
            message: err.message.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_round_trips_kind() {
        for kind in [
            OperationKind::SetName,
            OperationKind::SetPassword,
            OperationKind::SetExpireDate,
            OperationKind::SetPermissions,
            OperationKind::Delete,
        ] {
            assert_eq!(PendingOperation::from(kind).kind(), Some(kind));
        }
        assert!(!PendingOperation::from(OperationKind::Create).is_pending());
    }

    #[test]
    fn test_outcome_from_error() {
        let err = AppError::server(403, "Forbidden");
        let outcome = OperationOutcome::from(&err);
        assert_eq!(
            outcome,
            OperationOutcome::Failed {
                kind: ErrorKind::Server,
                code: Some(403),
                message: "Forbidden".to_string(),
            }
        );
        assert!(!outcome.is_success());
    }
}
