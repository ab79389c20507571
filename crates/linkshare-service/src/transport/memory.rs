//! In-memory share service, optionally persisted to a JSON state file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{Days, Local, NaiveDate};
use rand::Rng;
use rand::distr::Alphanumeric;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::{debug, info};

use linkshare_core::error::{AppError, ErrorKind};
use linkshare_core::result::AppResult;
use linkshare_core::traits::ShareTransport;
use linkshare_core::types::{
    RemoteShare, ShareCapabilities, ShareId, SharePermissions, ShareSnapshot,
};

const TOKEN_LENGTH: usize = 15;
const DEFAULT_EXPIRE_DAYS: u32 = 7;

/// Everything the in-memory service stores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerState {
    /// Capabilities the service enforces.
    #[serde(default)]
    pub capabilities: ShareCapabilities,
    /// Re-create a share under a new id when its password changes.
    #[serde(default)]
    pub rotate_id_on_password_change: bool,
    /// Report the replacement id after a rotation.
    #[serde(default)]
    pub report_replacement_id: bool,
    /// Base of public link URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Next share id to hand out.
    #[serde(default = "default_next_id")]
    pub next_id: u64,
    /// Shares per path, in creation order.
    #[serde(default)]
    pub shares: BTreeMap<String, Vec<RemoteShare>>,
}

impl Default for ServerState {
    fn default() -> Self {
        Self {
            capabilities: ShareCapabilities::default(),
            rotate_id_on_password_change: false,
            report_replacement_id: false,
            base_url: default_base_url(),
            next_id: default_next_id(),
            shares: BTreeMap::new(),
        }
    }
}

fn default_base_url() -> String {
    "https://cloud.example.com".to_string()
}

fn default_next_id() -> u64 {
    1
}

impl ServerState {
    fn allocate_id(&mut self) -> ShareId {
        let id = ShareId::new(self.next_id.to_string());
        self.next_id += 1;
        id
    }

    fn link_mut(&mut self, id: &ShareId) -> AppResult<&mut ShareSnapshot> {
        self.shares
            .values_mut()
            .flatten()
            .find_map(|share| match share {
                RemoteShare::Link(snapshot) if &snapshot.id == id => Some(snapshot),
                _ => None,
            })
            .ok_or_else(|| AppError::server(404, "Wrong share ID, share doesn't exist"))
    }
}

/// Generates a random public link token.
pub fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// A share service that keeps its shares in memory and enforces its own
/// capabilities the way a real server would.
#[derive(Debug)]
pub struct MemoryTransport {
    /// Service state.
    state: RwLock<ServerState>,
    /// State file, if persisted.
    path: Option<PathBuf>,
}

impl MemoryTransport {
    /// Create a service with the given state.
    pub fn new(state: ServerState) -> Self {
        Self {
            state: RwLock::new(state),
            path: None,
        }
    }

    /// Load the service state from a JSON file. A missing file yields an
    /// empty service.
    pub async fn from_file(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        let state = match fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "State file missing, starting empty");
                ServerState::default()
            }
            Err(e) => {
                return Err(AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to read state file: {}", path.display()),
                    e,
                ));
            }
        };
        Ok(Self {
            state: RwLock::new(state),
            path: Some(path),
        })
    }

    /// Write the service state back to its file. A no-op for unpersisted
    /// services.
    pub async fn save(&self) -> AppResult<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        let raw = serde_json::to_string_pretty(&*self.state.read().await)?;
        fs::write(path, raw).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write state file: {}", path.display()),
                e,
            )
        })?;
        debug!(path = %path.display(), "Saved share state");
        Ok(())
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ServerState {
        self.state.read().await.clone()
    }

    /// Capabilities the service enforces.
    pub async fn capabilities(&self) -> ShareCapabilities {
        self.state.read().await.capabilities.clone()
    }
}

#[async_trait]
impl ShareTransport for MemoryTransport {
    async fn fetch_shares(&self, path: &str) -> AppResult<Vec<RemoteShare>> {
        let state = self.state.read().await;
        Ok(state.shares.get(path).cloned().unwrap_or_default())
    }

    async fn create_link_share(
        &self,
        path: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<ShareSnapshot> {
        let mut state = self.state.write().await;
        let caps = state.capabilities.clone();

        if !caps.link_sharing_enabled {
            return Err(AppError::server(
                403,
                "Public link sharing is disabled by the administrator",
            ));
        }
        let has_link = state
            .shares
            .get(path)
            .is_some_and(|shares| shares.iter().any(|s| matches!(s, RemoteShare::Link(_))));
        if !caps.multiple_links_supported && has_link {
            return Err(AppError::server(403, "Only one public link per item is allowed"));
        }
        let password = password.filter(|p| !p.is_empty());
        if caps.enforce_password && password.is_none() {
            return Err(AppError::password_required(
                "Please specify a password for your public link",
            ));
        }

        let expire_date = if caps.enforce_expire_date {
            let days = caps.max_expire_days.unwrap_or(DEFAULT_EXPIRE_DAYS);
            today().checked_add_days(Days::new(u64::from(days)))
        } else {
            None
        };

        let id = state.allocate_id();
        let token = generate_token();
        let snapshot = ShareSnapshot {
            id,
            url: Some(format!("{}/s/{token}", state.base_url)),
            token,
            name: name
                .filter(|_| caps.multiple_links_supported)
                .map(str::to_string),
            password_is_set: password.is_some(),
            expire_date,
            permissions: SharePermissions::READ,
            show_file_listing: true,
        };

        state
            .shares
            .entry(path.to_string())
            .or_default()
            .push(RemoteShare::Link(snapshot.clone()));

        info!(path, share_id = %snapshot.id, "Created link share");
        Ok(snapshot)
    }

    async fn set_name(&self, id: &ShareId, name: &str) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.capabilities.multiple_links_supported {
            return Err(AppError::server(400, "Link shares can not be named"));
        }
        state.link_mut(id)?.name = Some(name.to_string());
        Ok(())
    }

    async fn set_password(&self, id: &ShareId, password: &str) -> AppResult<Option<ShareId>> {
        let mut state = self.state.write().await;
        if password.is_empty() && state.capabilities.enforce_password {
            return Err(AppError::server(403, "Public sharing requires a password"));
        }
        let rotate = state.rotate_id_on_password_change;
        let report = state.report_replacement_id;
        let new_id = rotate.then(|| state.allocate_id());

        let share = state.link_mut(id)?;
        share.password_is_set = !password.is_empty();
        match new_id {
            Some(new_id) => {
                share.id = new_id.clone();
                debug!(old_id = %id, new_id = %new_id, "Share re-created with new id");
                Ok(report.then_some(new_id))
            }
            None => Ok(None),
        }
    }

    async fn set_expire_date(&self, id: &ShareId, date: Option<NaiveDate>) -> AppResult<()> {
        let mut state = self.state.write().await;
        let caps = state.capabilities.clone();
        let today = today();
        match date {
            None if caps.enforce_expire_date => {
                return Err(AppError::server(400, "Expiration date is enforced"));
            }
            Some(date) if date <= today => {
                return Err(AppError::server(400, "Expiration date is in the past"));
            }
            Some(date) if caps.max_expire_date(today).is_some_and(|max| date > max) => {
                return Err(AppError::server(
                    400,
                    format!(
                        "Cannot set expiration date more than {} days in the future",
                        caps.max_expire_days.unwrap_or_default()
                    ),
                ));
            }
            _ => {}
        }
        state.link_mut(id)?.expire_date = date;
        Ok(())
    }

    async fn set_permissions(&self, id: &ShareId, permissions: SharePermissions) -> AppResult<()> {
        let mut state = self.state.write().await;
        if permissions.allows_upload() && !state.capabilities.upload_allowed {
            return Err(AppError::server(
                403,
                "Public upload disabled by the administrator",
            ));
        }
        let share = state.link_mut(id)?;
        share.permissions = permissions;
        share.show_file_listing = permissions.contains(SharePermissions::READ);
        Ok(())
    }

    async fn delete_share(&self, id: &ShareId) -> AppResult<()> {
        let mut state = self.state.write().await;
        for shares in state.shares.values_mut() {
            if let Some(pos) = shares.iter().position(|share| share.id() == id) {
                shares.remove(pos);
                info!(share_id = %id, "Deleted share");
                return Ok(());
            }
        }
        Err(AppError::server(404, "Wrong share ID, share doesn't exist"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transport(capabilities: ShareCapabilities) -> MemoryTransport {
        MemoryTransport::new(ServerState {
            capabilities,
            ..ServerState::default()
        })
    }

    #[test]
    fn test_generate_token() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LENGTH);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[tokio::test]
    async fn test_create_requires_password_when_enforced() {
        let service = transport(ShareCapabilities {
            enforce_password: true,
            ..ShareCapabilities::default()
        });
        let err = service
            .create_link_share("/Docs", Some("link"), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::PasswordRequired);

        let share = service
            .create_link_share("/Docs", Some("link"), Some("secret"))
            .await
            .unwrap();
        assert!(share.password_is_set);
        assert_eq!(share.url, Some(format!("https://cloud.example.com/s/{}", share.token)));
    }

    #[tokio::test]
    async fn test_single_link_server_drops_name() {
        let service = transport(ShareCapabilities {
            multiple_links_supported: false,
            ..ShareCapabilities::default()
        });
        let share = service
            .create_link_share("/Docs", Some("ignored"), None)
            .await
            .unwrap();
        assert_eq!(share.name, None);

        let err = service
            .create_link_share("/Docs", None, None)
            .await
            .unwrap_err();
        assert_eq!(err.code, Some(403));
    }

    #[tokio::test]
    async fn test_password_change_rotates_id() {
        let service = MemoryTransport::new(ServerState {
            rotate_id_on_password_change: true,
            report_replacement_id: true,
            ..ServerState::default()
        });
        let share = service.create_link_share("/Docs", None, None).await.unwrap();
        let new_id = service.set_password(&share.id, "pw").await.unwrap();
        let new_id = new_id.expect("replacement id reported");
        assert_ne!(new_id, share.id);

        let listed = service.fetch_shares("/Docs").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id(), &new_id);
    }

    #[tokio::test]
    async fn test_unknown_share_is_404() {
        let service = transport(ShareCapabilities::default());
        let err = service.delete_share(&ShareId::new("99")).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Server);
        assert_eq!(err.code, Some(404));
    }

    #[tokio::test]
    async fn test_state_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("shares.json");

        let service = MemoryTransport::from_file(&path).await.unwrap();
        service.create_link_share("/Docs", Some("a"), None).await.unwrap();
        service.save().await.unwrap();

        let reloaded = MemoryTransport::from_file(&path).await.unwrap();
        assert_eq!(reloaded.snapshot().await, service.snapshot().await);
    }
}
