//! The controlled path and its authoritative share list.

use std::collections::HashMap;

use linkshare_core::types::{ShareId, ShareSnapshot};
use linkshare_entity::LinkShare;

/// Everything the controller knows about one shared path.
#[derive(Debug, Clone)]
pub struct SharedPathContext {
    /// Path of the shared item on the remote service.
    path: String,
    /// Whether the shared item is a file.
    is_file: bool,
    /// Link shares in server fetch order.
    shares: Vec<LinkShare>,
    /// Selected share, always a member of `shares`.
    selected: Option<ShareId>,
    /// Share to select after the next fetch (set by a create).
    override_selection: Option<ShareId>,
    /// First fetch sequence number issued after the override was set.
    override_from_fetch: u64,
}

impl SharedPathContext {
    /// Create an empty context for `path`.
    pub fn new(path: impl Into<String>, is_file: bool) -> Self {
        Self {
            path: path.into(),
            is_file,
            shares: Vec::new(),
            selected: None,
            override_selection: None,
            override_from_fetch: 0,
        }
    }

    /// Path of the shared item.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the shared item is a file.
    pub fn is_file(&self) -> bool {
        self.is_file
    }

    /// Link shares in server order.
    pub fn shares(&self) -> &[LinkShare] {
        &self.shares
    }

    /// Look up a share by id.
    pub fn find(&self, id: &ShareId) -> Option<&LinkShare> {
        self.shares.iter().find(|share| share.id() == id)
    }

    /// Look up a share by id for mutation.
    pub fn find_mut(&mut self, id: &ShareId) -> Option<&mut LinkShare> {
        self.shares.iter_mut().find(|share| share.id() == id)
    }

    /// Whether `id` is in the share list.
    pub fn contains(&self, id: &ShareId) -> bool {
        self.find(id).is_some()
    }

    /// Selected share id.
    pub fn selected(&self) -> Option<&ShareId> {
        self.selected.as_ref()
    }

    /// The selected share.
    pub fn selected_share(&self) -> Option<&LinkShare> {
        self.selected.as_ref().and_then(|id| self.find(id))
    }

    /// Whether `id` is the selected share.
    pub fn is_selected(&self, id: &ShareId) -> bool {
        self.selected.as_ref() == Some(id)
    }

    /// Select a share. Callers guarantee membership.
    pub(crate) fn select(&mut self, id: Option<ShareId>) {
        self.selected = id;
    }

    /// Pending post-create selection.
    pub fn override_selection(&self) -> Option<&ShareId> {
        self.override_selection.as_ref()
    }

    /// Select `id` after the first fetch numbered `from_fetch` or later.
    pub(crate) fn set_override_selection(&mut self, id: ShareId, from_fetch: u64) {
        self.override_selection = Some(id);
        self.override_from_fetch = from_fetch;
    }

    /// The override for the result of fetch `fetch`.
    ///
    /// Fetches issued before the override was set may predate the share,
    /// so they leave the override in place for the fetch that follows.
    pub(crate) fn take_override_selection(&mut self, fetch: u64) -> Option<ShareId> {
        if fetch >= self.override_from_fetch {
            self.override_selection.take()
        } else {
            self.override_selection.clone()
        }
    }

    /// Replace the share list with a fresh fetch.
    ///
    /// Shares that persist by id keep their in-flight operation so the busy
    /// guard survives a refetch; shares no longer listed are dropped.
    pub(crate) fn replace_shares(&mut self, snapshots: Vec<ShareSnapshot>) {
        let mut previous: HashMap<ShareId, LinkShare> = self
            .shares
            .drain(..)
            .map(|share| (share.id().clone(), share))
            .collect();

        self.shares = snapshots
            .into_iter()
            .map(|snapshot| match previous.remove(&snapshot.id) {
                Some(mut existing) => {
                    existing.refresh_from(snapshot);
                    existing
                }
                None => LinkShare::from_snapshot(snapshot),
            })
            .collect();
    }
}
