//! Share permission bits and the collapsed link policy.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

bitflags! {
    /// Permission bits as reported by the remote share service.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct SharePermissions: u32 {
        /// Recipients may read and list.
        const READ = 1;
        /// Recipients may modify existing content.
        const UPDATE = 2;
        /// Recipients may upload new content.
        const CREATE = 4;
        /// Recipients may delete content.
        const DELETE = 8;
        /// The holder may re-share the item.
        const SHARE = 16;
    }
}

impl SharePermissions {
    /// Whether the holder of these permissions may create new shares.
    pub fn can_reshare(&self) -> bool {
        self.contains(Self::SHARE)
    }

    /// Whether these permissions allow public uploads.
    pub fn allows_upload(&self) -> bool {
        self.contains(Self::CREATE)
    }
}

/// What a link recipient may do, as offered to the user.
///
/// Folders support all three policies; files are always read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkPolicy {
    /// Download and browse only.
    ReadOnly,
    /// Browse, upload, edit and delete.
    ReadWrite,
    /// Upload into a drop box without seeing existing content.
    UploadOnly,
}

impl LinkPolicy {
    /// Permission bits sent to the server for this policy.
    pub fn permissions(&self) -> SharePermissions {
        match self {
            Self::ReadOnly => SharePermissions::READ,
            Self::ReadWrite => {
                SharePermissions::READ
                    | SharePermissions::CREATE
                    | SharePermissions::UPDATE
                    | SharePermissions::DELETE
            }
            Self::UploadOnly => SharePermissions::CREATE,
        }
    }

    /// Collapse server permission bits into a policy.
    ///
    /// Uploads without file listing mean a drop box; uploads with listing
    /// mean read-write; anything without uploads is read-only.
    pub fn from_permissions(permissions: SharePermissions, show_file_listing: bool) -> Self {
        if !permissions.allows_upload() {
            Self::ReadOnly
        } else if show_file_listing {
            Self::ReadWrite
        } else {
            Self::UploadOnly
        }
    }

    /// Whether recipients can browse existing content under this policy.
    pub fn shows_file_listing(&self) -> bool {
        !matches!(self, Self::UploadOnly)
    }

    /// Return the policy as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read_only",
            Self::ReadWrite => "read_write",
            Self::UploadOnly => "upload_only",
        }
    }
}

impl fmt::Display for LinkPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinkPolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "read_only" | "readonly" | "ro" => Ok(Self::ReadOnly),
            "read_write" | "readwrite" | "rw" => Ok(Self::ReadWrite),
            "upload_only" | "uploadonly" | "dropbox" => Ok(Self::UploadOnly),
            _ => Err(AppError::validation(format!("Invalid link policy: '{s}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_collapse() {
        let rw = LinkPolicy::ReadWrite.permissions();
        assert_eq!(LinkPolicy::from_permissions(rw, true), LinkPolicy::ReadWrite);
        assert_eq!(
            LinkPolicy::from_permissions(SharePermissions::CREATE, false),
            LinkPolicy::UploadOnly
        );
        assert_eq!(
            LinkPolicy::from_permissions(SharePermissions::READ, true),
            LinkPolicy::ReadOnly
        );
    }

    #[test]
    fn test_read_without_create_is_read_only_even_when_hidden() {
        let perms = SharePermissions::READ | SharePermissions::UPDATE;
        assert_eq!(
            LinkPolicy::from_permissions(perms, false),
            LinkPolicy::ReadOnly
        );
    }

    #[test]
    fn test_reshare_bit() {
        let perms = SharePermissions::READ | SharePermissions::SHARE;
        assert!(perms.can_reshare());
        assert!(!SharePermissions::READ.can_reshare());
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!(
            "upload-only".parse::<LinkPolicy>().expect("parse"),
            LinkPolicy::UploadOnly
        );
        assert!("owner".parse::<LinkPolicy>().is_err());
    }
}
