//! Share manager: the controller's only door to the transport.

use std::sync::Arc;

use tracing::{debug, info};

use linkshare_core::result::AppResult;
use linkshare_core::traits::ShareTransport;
use linkshare_core::types::{RemoteShare, ShareId, ShareSnapshot};
use linkshare_entity::ShareMutation;

/// Fetches and creates link shares for a path, and forwards per-share
/// mutations.
///
/// Shares of other kinds (user, group, remote) are dropped here, so the
/// controller only ever sees link shares.
#[derive(Debug, Clone)]
pub struct ShareManager {
    /// Transport to the remote share service.
    transport: Arc<dyn ShareTransport>,
}

impl ShareManager {
    /// Creates a new share manager.
    pub fn new(transport: Arc<dyn ShareTransport>) -> Self {
        Self { transport }
    }

    /// Lists the link shares on `path` in server order.
    pub async fn fetch_link_shares(&self, path: &str) -> AppResult<Vec<ShareSnapshot>> {
        let all = self.transport.fetch_shares(path).await?;
        let total = all.len();
        let links: Vec<ShareSnapshot> = all.into_iter().filter_map(RemoteShare::into_link).collect();

        debug!(
            path = %path,
            total,
            links = links.len(),
            "Fetched shares"
        );

        Ok(links)
    }

    /// Creates a link share on `path`.
    pub async fn create_link_share(
        &self,
        path: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<ShareSnapshot> {
        let share = self
            .transport
            .create_link_share(path, name, password)
            .await?;

        info!(
            path = %path,
            share_id = %share.id,
            password = password.is_some(),
            "Link share created"
        );

        Ok(share)
    }

    /// Sends an admitted mutation to the service.
    ///
    /// Returns the replacement share id when a password change made the
    /// server re-create the share and it said so.
    pub async fn apply(&self, id: &ShareId, mutation: &ShareMutation) -> AppResult<Option<ShareId>> {
        match mutation {
            ShareMutation::SetName(name) => self.transport.set_name(id, name).await.map(|()| None),
            ShareMutation::SetPassword(password) => self.transport.set_password(id, password).await,
            ShareMutation::SetExpireDate(date) => self
                .transport
                .set_expire_date(id, *date)
                .await
                .map(|()| None),
            ShareMutation::SetPermissions(policy) => self
                .transport
                .set_permissions(id, policy.permissions())
                .await
                .map(|()| None),
            ShareMutation::Delete => self.transport.delete_share(id).await.map(|()| None),
        }
    }
}
