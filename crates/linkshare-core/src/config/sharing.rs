//! Link-share controller policy configuration.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Upper bound the remote service accepts for a share name.
pub const SERVER_MAX_NAME_LENGTH: usize = 64;

/// Tunables for the link-share controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SharingConfig {
    /// Name given to new links when the caller supplies none, and the
    /// generic label shown for unnamed links on single-link servers.
    #[serde(default = "default_link_name")]
    pub default_link_name: String,
    /// Maximum length of a share name in characters.
    #[serde(default = "default_max_name_length")]
    pub max_name_length: usize,
    /// Refetch the share list after every successful password change.
    ///
    /// Older servers replace the share (new id) when its password is set
    /// or cleared. Disable only for servers known to keep ids stable; a
    /// replacement id reported by the transport always triggers a refetch.
    #[serde(default = "super::default_true")]
    pub refetch_after_password_change: bool,
    /// Capacity of the observer event channel.
    #[serde(default = "default_event_buffer")]
    pub event_buffer: usize,
}

impl SharingConfig {
    /// Reject values the controller cannot honour.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.default_link_name.trim().is_empty() {
            return Err(AppError::configuration(
                "sharing.default_link_name must not be empty",
            ));
        }
        if self.max_name_length == 0 || self.max_name_length > SERVER_MAX_NAME_LENGTH {
            return Err(AppError::configuration(format!(
                "sharing.max_name_length must be between 1 and {SERVER_MAX_NAME_LENGTH}"
            )));
        }
        if self.default_link_name.chars().count() > self.max_name_length {
            return Err(AppError::configuration(
                "sharing.default_link_name exceeds sharing.max_name_length",
            ));
        }
        if self.event_buffer == 0 {
            return Err(AppError::configuration(
                "sharing.event_buffer must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for SharingConfig {
    fn default() -> Self {
        Self {
            default_link_name: default_link_name(),
            max_name_length: default_max_name_length(),
            refetch_after_password_change: true,
            event_buffer: default_event_buffer(),
        }
    }
}

fn default_link_name() -> String {
    "Public link".to_string()
}

fn default_max_name_length() -> usize {
    SERVER_MAX_NAME_LENGTH
}

fn default_event_buffer() -> usize {
    64
}
