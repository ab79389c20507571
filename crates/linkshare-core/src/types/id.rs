//! Server-assigned share identifier.
//!
//! The remote service owns share identity; the client never invents ids, it
//! only carries them around. Wrapping the raw string keeps ids from being
//! confused with tokens, names or paths, all of which are strings too.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Opaque identifier of a share on the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareId(String);

impl ShareId {
    /// Wrap a server-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the raw identifier.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ShareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ShareId {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Share id must not be empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl From<&str> for ShareId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ShareId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ShareId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
