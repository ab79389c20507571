//! Link share entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use linkshare_core::error::AppError;
use linkshare_core::result::AppResult;
use linkshare_core::types::{
    LinkPolicy, OperationOutcome, PendingOperation, ShareId, SharePermissions, ShareSnapshot,
};

use super::mutation::{MutationRules, ShareMutation};

/// One public link share and its in-flight mutation.
///
/// The entity admits mutation requests (validation plus the busy guard) and
/// applies their terminal outcome. It never talks to the service and never
/// touches list membership; the controller does both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkShare {
    /// Server-assigned identifier.
    id: ShareId,
    /// Server-assigned token.
    token: String,
    /// User-given name.
    name: Option<String>,
    /// Whether a password protects the link.
    password_is_set: bool,
    /// Expiry date, if any.
    expire_date: Option<NaiveDate>,
    /// Permission bits granted to recipients.
    permissions: SharePermissions,
    /// Whether recipients may browse the shared folder.
    show_file_listing: bool,
    /// Public URL of the link.
    url: Option<String>,
    /// Mutation currently in flight.
    #[serde(default)]
    pending: PendingOperation,
}

impl LinkShare {
    /// Build an idle share from a service snapshot.
    pub fn from_snapshot(snapshot: ShareSnapshot) -> Self {
        Self {
            id: snapshot.id,
            token: snapshot.token,
            name: snapshot.name,
            password_is_set: snapshot.password_is_set,
            expire_date: snapshot.expire_date,
            permissions: snapshot.permissions,
            show_file_listing: snapshot.show_file_listing,
            url: snapshot.url,
            pending: PendingOperation::None,
        }
    }

    /// Take a fresh snapshot of the same share, keeping the operation in
    /// flight.
    pub fn refresh_from(&mut self, snapshot: ShareSnapshot) {
        let pending = self.pending;
        *self = Self::from_snapshot(snapshot);
        self.pending = pending;
    }

    /// Server-assigned identifier.
    pub fn id(&self) -> &ShareId {
        &self.id
    }

    /// Server-assigned token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// User-given name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Whether a password protects the link.
    pub fn is_password_set(&self) -> bool {
        self.password_is_set
    }

    /// Expiry date, if any.
    pub fn expire_date(&self) -> Option<NaiveDate> {
        self.expire_date
    }

    /// Permission bits granted to recipients.
    pub fn permissions(&self) -> SharePermissions {
        self.permissions
    }

    /// Whether recipients may browse the shared folder.
    pub fn show_file_listing(&self) -> bool {
        self.show_file_listing
    }

    /// Recipient policy collapsed from the permission bits.
    pub fn policy(&self) -> LinkPolicy {
        LinkPolicy::from_permissions(self.permissions, self.show_file_listing)
    }

    /// Public URL of the link.
    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Direct download URL. Only offered when file listing is shown.
    pub fn direct_download_url(&self) -> Option<String> {
        if !self.show_file_listing {
            return None;
        }
        self.url
            .as_deref()
            .map(|url| format!("{}/download", url.trim_end_matches('/')))
    }

    /// Mutation currently in flight.
    pub fn pending(&self) -> PendingOperation {
        self.pending
    }

    /// Admit a rename.
    pub fn request_set_name(
        &mut self,
        name: &str,
        rules: &MutationRules<'_>,
    ) -> AppResult<ShareMutation> {
        self.ensure_idle()?;
        if !rules.capabilities.multiple_links_supported {
            return Err(AppError::validation(
                "The server does not support naming link shares",
            ));
        }
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Share name must not be empty"));
        }
        if name.chars().count() > rules.max_name_length {
            return Err(AppError::validation(format!(
                "Share name must not be longer than {} characters",
                rules.max_name_length
            )));
        }
        Ok(self.admit(ShareMutation::SetName(name.to_string())))
    }

    /// Admit a password change. An empty password removes protection.
    pub fn request_set_password(
        &mut self,
        password: &str,
        rules: &MutationRules<'_>,
    ) -> AppResult<ShareMutation> {
        self.ensure_idle()?;
        if password.is_empty() && rules.capabilities.enforce_password {
            return Err(AppError::validation("Public sharing requires a password"));
        }
        Ok(self.admit(ShareMutation::SetPassword(password.to_string())))
    }

    /// Admit an expiry change. `None` removes the expiry.
    pub fn request_set_expire_date(
        &mut self,
        date: Option<NaiveDate>,
        rules: &MutationRules<'_>,
    ) -> AppResult<ShareMutation> {
        self.ensure_idle()?;
        match date {
            None if rules.capabilities.enforce_expire_date => {
                return Err(AppError::validation(
                    "Public sharing requires an expiry date",
                ));
            }
            None => {}
            Some(date) => {
                if date <= rules.today {
                    return Err(AppError::validation(format!(
                        "Expiry date {date} must be after {}",
                        rules.today
                    )));
                }
                if let Some(max) = rules.capabilities.max_expire_date(rules.today) {
                    if date > max {
                        return Err(AppError::validation(format!(
                            "Expiry date {date} must not be later than {max}"
                        )));
                    }
                }
            }
        }
        Ok(self.admit(ShareMutation::SetExpireDate(date)))
    }

    /// Admit a recipient policy change.
    pub fn request_set_permissions(
        &mut self,
        policy: LinkPolicy,
        rules: &MutationRules<'_>,
    ) -> AppResult<ShareMutation> {
        self.ensure_idle()?;
        if policy != LinkPolicy::ReadOnly {
            if rules.is_file {
                return Err(AppError::validation(
                    "Files can only be shared read-only",
                ));
            }
            if !rules.capabilities.upload_allowed {
                return Err(AppError::validation(
                    "The server does not allow public uploads",
                ));
            }
        }
        if policy == LinkPolicy::UploadOnly && !rules.capabilities.upload_only_supported {
            return Err(AppError::validation(
                "The server does not support upload-only links",
            ));
        }
        Ok(self.admit(ShareMutation::SetPermissions(policy)))
    }

    /// Admit a delete.
    pub fn request_delete(&mut self) -> AppResult<ShareMutation> {
        self.ensure_idle()?;
        Ok(self.admit(ShareMutation::Delete))
    }

    /// Apply the terminal outcome of an admitted mutation.
    ///
    /// Returns `None` when the share is not waiting for this mutation, in
    /// which case nothing changes. On failure the attribute keeps its
    /// previous value; the service is authoritative.
    pub fn complete(
        &mut self,
        mutation: &ShareMutation,
        result: &AppResult<()>,
    ) -> Option<OperationOutcome> {
        if self.pending != PendingOperation::from(mutation.kind()) {
            return None;
        }
        self.pending = PendingOperation::None;

        if let Err(err) = result {
            return Some(OperationOutcome::from(err));
        }

        match mutation {
            ShareMutation::SetName(name) => self.name = Some(name.clone()),
            ShareMutation::SetPassword(password) => self.password_is_set = !password.is_empty(),
            ShareMutation::SetExpireDate(date) => self.expire_date = *date,
            ShareMutation::SetPermissions(policy) => {
                self.permissions = policy.permissions();
                self.show_file_listing = policy.shows_file_listing();
            }
            ShareMutation::Delete => {}
        }
        Some(OperationOutcome::Succeeded)
    }

    fn ensure_idle(&self) -> AppResult<()> {
        match self.pending.kind() {
            Some(kind) => Err(AppError::busy(format!(
                "Share {} is busy with {kind}",
                self.id
            ))),
            None => Ok(()),
        }
    }

    fn admit(&mut self, mutation: ShareMutation) -> ShareMutation {
        self.pending = PendingOperation::from(mutation.kind());
        mutation
    }
}
