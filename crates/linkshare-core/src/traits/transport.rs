//! Transport trait for talking to the remote share service.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::result::AppResult;
use crate::types::{RemoteShare, ShareId, SharePermissions, ShareSnapshot};

/// Network access to the remote share service.
///
/// Implementations report refusals as [`crate::AppError`]: a passwordless
/// create on a password-enforcing server is
/// [`crate::ErrorKind::PasswordRequired`] with the server's message, every
/// other service failure is [`crate::ErrorKind::Server`] with the status
/// code in `code`.
#[async_trait]
pub trait ShareTransport: Send + Sync + std::fmt::Debug + 'static {
    /// List every share (of any kind) on `path`, in server order.
    async fn fetch_shares(&self, path: &str) -> AppResult<Vec<RemoteShare>>;

    /// Create a public link share on `path`.
    async fn create_link_share(
        &self,
        path: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<ShareSnapshot>;

    /// Rename a share.
    async fn set_name(&self, id: &ShareId, name: &str) -> AppResult<()>;

    /// Set (non-empty) or clear (empty) a share password.
    ///
    /// Returns the id of the replacement share when the server re-created
    /// the share under a new id, if it reports one.
    async fn set_password(&self, id: &ShareId, password: &str) -> AppResult<Option<ShareId>>;

    /// Set or clear a share expiry date.
    async fn set_expire_date(&self, id: &ShareId, date: Option<NaiveDate>) -> AppResult<()>;

    /// Replace a share's permission bits.
    async fn set_permissions(&self, id: &ShareId, permissions: SharePermissions) -> AppResult<()>;

    /// Delete a share.
    async fn delete_share(&self, id: &ShareId) -> AppResult<()>;
}
