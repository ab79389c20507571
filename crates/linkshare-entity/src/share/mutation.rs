//! Mutations a link share can be asked to undergo, and the rules that
//! admit them.

use std::fmt;

use chrono::NaiveDate;

use linkshare_core::types::{LinkPolicy, OperationKind, ShareCapabilities};

/// One accepted mutation, carrying the value to send to the service.
#[derive(Clone, PartialEq, Eq)]
pub enum ShareMutation {
    /// Rename the share.
    SetName(String),
    /// Set (non-empty) or clear (empty) the password.
    SetPassword(String),
    /// Set or clear the expiry date.
    SetExpireDate(Option<NaiveDate>),
    /// Switch the recipient policy.
    SetPermissions(LinkPolicy),
    /// Delete the share.
    Delete,
}

impl ShareMutation {
    /// The operation kind this mutation performs.
    pub fn kind(&self) -> OperationKind {
        match self {
            Self::SetName(_) => OperationKind::SetName,
            Self::SetPassword(_) => OperationKind::SetPassword,
            Self::SetExpireDate(_) => OperationKind::SetExpireDate,
            Self::SetPermissions(_) => OperationKind::SetPermissions,
            Self::Delete => OperationKind::Delete,
        }
    }
}

// Passwords must never reach the logs.
impl fmt::Debug for ShareMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SetName(name) => f.debug_tuple("SetName").field(name).finish(),
            Self::SetPassword(password) if password.is_empty() => {
                f.write_str("SetPassword(<cleared>)")
            }
            Self::SetPassword(_) => f.write_str("SetPassword(<redacted>)"),
            Self::SetExpireDate(date) => f.debug_tuple("SetExpireDate").field(date).finish(),
            Self::SetPermissions(policy) => f.debug_tuple("SetPermissions").field(policy).finish(),
            Self::Delete => f.write_str("Delete"),
        }
    }
}

/// Context a mutation request is validated against.
#[derive(Debug, Clone, Copy)]
pub struct MutationRules<'a> {
    /// Server capabilities for the session.
    pub capabilities: &'a ShareCapabilities,
    /// Whether the shared item is a file.
    pub is_file: bool,
    /// Maximum share name length in characters.
    pub max_name_length: usize,
    /// The current date.
    pub today: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", ShareMutation::SetPassword("hunter2".to_string()));
        assert!(!rendered.contains("hunter2"));
        assert_eq!(
            format!("{:?}", ShareMutation::SetPassword(String::new())),
            "SetPassword(<cleared>)"
        );
    }
}
