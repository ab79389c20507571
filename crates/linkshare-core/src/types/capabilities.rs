//! Server-declared link-sharing capabilities.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Immutable snapshot of what the server allows for public links.
///
/// Loaded once per session; the controller consults it before every
/// mutation and never changes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareCapabilities {
    /// Public link sharing is enabled at all.
    #[serde(default = "default_true")]
    pub link_sharing_enabled: bool,
    /// More than one (named) link per item is supported.
    #[serde(default = "default_true")]
    pub multiple_links_supported: bool,
    /// Every link must carry a password.
    #[serde(default)]
    pub enforce_password: bool,
    /// Every link must carry an expiry date.
    #[serde(default)]
    pub enforce_expire_date: bool,
    /// Maximum days from today an enforced expiry date may lie.
    #[serde(default)]
    pub max_expire_days: Option<u32>,
    /// Links may grant upload rights.
    #[serde(default = "default_true")]
    pub upload_allowed: bool,
    /// Upload-only (drop box) links are supported.
    #[serde(default = "default_true")]
    pub upload_only_supported: bool,
}

impl ShareCapabilities {
    /// Earliest expiry date a user may pick: tomorrow.
    pub fn min_expire_date(&self, today: NaiveDate) -> NaiveDate {
        today.checked_add_days(Days::new(1)).unwrap_or(today)
    }

    /// Latest expiry date a user may pick, if the server bounds it.
    pub fn max_expire_date(&self, today: NaiveDate) -> Option<NaiveDate> {
        if !self.enforce_expire_date {
            return None;
        }
        self.max_expire_days
            .and_then(|days| today.checked_add_days(Days::new(u64::from(days))))
    }

    /// Whether upload policies can be offered for the given item kind.
    pub fn upload_editable(&self, is_file: bool) -> bool {
        !is_file && self.upload_allowed
    }
}

impl Default for ShareCapabilities {
    fn default() -> Self {
        Self {
            link_sharing_enabled: true,
            multiple_links_supported: true,
            enforce_password: false,
            enforce_expire_date: false,
            max_expire_days: None,
            upload_allowed: true,
            upload_only_supported: true,
        }
    }
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn test_expire_bounds_unenforced() {
        let caps = ShareCapabilities {
            max_expire_days: Some(7),
            ..ShareCapabilities::default()
        };
        let today = day(2026, 3, 31);
        assert_eq!(caps.min_expire_date(today), day(2026, 4, 1));
        assert_eq!(caps.max_expire_date(today), None);
    }

    #[test]
    fn test_expire_bounds_enforced() {
        let caps = ShareCapabilities {
            enforce_expire_date: true,
            max_expire_days: Some(7),
            ..ShareCapabilities::default()
        };
        assert_eq!(caps.max_expire_date(day(2026, 1, 1)), Some(day(2026, 1, 8)));
    }

    #[test]
    fn test_upload_not_editable_for_files() {
        let caps = ShareCapabilities::default();
        assert!(caps.upload_editable(false));
        assert!(!caps.upload_editable(true));
    }
}
