//! Pure projection from controller state to a presentation view model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use linkshare_core::types::{ShareCapabilities, ShareView};
use linkshare_entity::{LinkShare, display_name};

use super::context::SharedPathContext;
use super::state::{ControllerPhase, ErrorNotice};

/// Everything a presentation layer needs to render the link-share panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PanelView {
    /// Current phase.
    pub phase: ControllerPhase,
    /// Shared path, once initialized.
    pub path: Option<String>,
    /// Whether the shared item is a file.
    pub is_file: bool,
    /// Link shares in server order.
    pub shares: Vec<ShareView>,
    /// The selected share.
    pub selected: Option<ShareView>,
    /// Whether a new link may be created right now.
    pub can_create: bool,
    /// Whether links can be named (multi-link servers).
    pub names_supported: bool,
    /// Whether the password toggle is locked on.
    pub password_required: bool,
    /// Whether the expiry toggle is locked on.
    pub expiry_required: bool,
    /// Earliest selectable expiry date.
    pub min_expire_date: NaiveDate,
    /// Latest selectable expiry date, if bounded.
    pub max_expire_date: Option<NaiveDate>,
    /// Whether upload policies are offered.
    pub upload_editable: bool,
    /// Whether the upload-only policy is offered.
    pub upload_only_available: bool,
    /// Server message while a create waits for a password.
    pub awaiting_password_message: Option<String>,
    /// Error currently shown.
    pub last_error: Option<ErrorNotice>,
}

/// Inputs to [`project`].
#[derive(Debug, Clone, Copy)]
pub struct ProjectionInput<'a> {
    /// Current phase.
    pub phase: ControllerPhase,
    /// Controlled path, if initialized.
    pub context: Option<&'a SharedPathContext>,
    /// Server capabilities.
    pub capabilities: &'a ShareCapabilities,
    /// Label for unnamed links on single-link servers.
    pub default_label: &'a str,
    /// Whether a create call is in flight.
    pub creating: bool,
    /// Server message while a create waits for a password.
    pub awaiting_password_message: Option<&'a str>,
    /// Error currently shown.
    pub last_error: Option<&'a ErrorNotice>,
    /// The current date.
    pub today: NaiveDate,
}

/// Project one share into its view.
pub fn share_view(
    share: &LinkShare,
    capabilities: &ShareCapabilities,
    is_file: bool,
    default_label: &str,
) -> ShareView {
    let names_supported = capabilities.multiple_links_supported;
    ShareView {
        id: share.id().clone(),
        display_name: display_name(share.name(), share.token(), names_supported, default_label),
        name_editable: names_supported,
        token: share.token().to_string(),
        password_is_set: share.is_password_set(),
        expire_date: share.expire_date(),
        policy: (!is_file).then(|| share.policy()),
        show_file_listing: share.show_file_listing(),
        pending: share.pending(),
        url: share.url().map(str::to_string),
        direct_download_url: share.direct_download_url(),
    }
}

/// Project controller state into the panel view model.
pub fn project(input: ProjectionInput<'_>) -> PanelView {
    let caps = input.capabilities;
    let is_file = input.context.is_some_and(SharedPathContext::is_file);
    let view = |share: &LinkShare| share_view(share, caps, is_file, input.default_label);

    let shares: Vec<ShareView> = input
        .context
        .map(|ctx| ctx.shares().iter().map(view).collect())
        .unwrap_or_default();
    let selected = input
        .context
        .and_then(SharedPathContext::selected_share)
        .map(view);

    let operational = matches!(
        input.phase,
        ControllerPhase::Loading
            | ControllerPhase::NoSelection
            | ControllerPhase::SelectionActive
            | ControllerPhase::AwaitingPasswordForCreate
    );
    let can_create = operational
        && !input.creating
        && (caps.multiple_links_supported || shares.is_empty());

    PanelView {
        phase: input.phase,
        path: input.context.map(|ctx| ctx.path().to_string()),
        is_file,
        shares,
        selected,
        can_create,
        names_supported: caps.multiple_links_supported,
        password_required: caps.enforce_password
            || input.phase == ControllerPhase::AwaitingPasswordForCreate,
        expiry_required: caps.enforce_expire_date,
        min_expire_date: caps.min_expire_date(input.today),
        max_expire_date: caps.max_expire_date(input.today),
        upload_editable: caps.upload_editable(is_file),
        upload_only_available: caps.upload_editable(is_file) && caps.upload_only_supported,
        awaiting_password_message: input.awaiting_password_message.map(str::to_string),
        last_error: input.last_error.cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkshare_core::types::{LinkPolicy, ShareId, SharePermissions, ShareSnapshot};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 1).expect("valid date")
    }

    fn context(is_file: bool, ids: &[&str]) -> SharedPathContext {
        let mut ctx = SharedPathContext::new("/Docs", is_file);
        ctx.replace_shares(
            ids.iter()
                .map(|id| ShareSnapshot {
                    id: ShareId::new(*id),
                    token: format!("tok{id}"),
                    name: None,
                    password_is_set: false,
                    expire_date: None,
                    permissions: SharePermissions::READ | SharePermissions::CREATE,
                    show_file_listing: true,
                    url: None,
                })
                .collect(),
        );
        ctx
    }

    fn input<'a>(
        phase: ControllerPhase,
        ctx: Option<&'a SharedPathContext>,
        caps: &'a ShareCapabilities,
    ) -> ProjectionInput<'a> {
        ProjectionInput {
            phase,
            context: ctx,
            capabilities: caps,
            default_label: "Public link",
            creating: false,
            awaiting_password_message: None,
            last_error: None,
            today: today(),
        }
    }

    #[test]
    fn test_single_link_server_blocks_second_create() {
        let caps = ShareCapabilities {
            multiple_links_supported: false,
            ..ShareCapabilities::default()
        };
        let empty = context(false, &[]);
        assert!(project(input(ControllerPhase::NoSelection, Some(&empty), &caps)).can_create);

        let one = context(false, &["1"]);
        let view = project(input(ControllerPhase::NoSelection, Some(&one), &caps));
        assert!(!view.can_create);
        assert_eq!(view.shares[0].display_name, "Public link");
        assert!(!view.shares[0].name_editable);
    }

    #[test]
    fn test_files_have_no_policy() {
        let caps = ShareCapabilities::default();
        let ctx = context(true, &["1"]);
        let view = project(input(ControllerPhase::NoSelection, Some(&ctx), &caps));
        assert_eq!(view.shares[0].policy, None);
        assert!(!view.upload_editable);
        assert!(!view.upload_only_available);

        let folder = context(false, &["1"]);
        let view = project(input(ControllerPhase::NoSelection, Some(&folder), &caps));
        assert_eq!(view.shares[0].policy, Some(LinkPolicy::ReadWrite));
        assert!(view.upload_only_available);
    }

    #[test]
    fn test_disabled_cannot_create() {
        let caps = ShareCapabilities::default();
        let view = project(input(ControllerPhase::SharingDisabled, None, &caps));
        assert!(!view.can_create);
        assert!(view.shares.is_empty());
        assert_eq!(view.path, None);
    }

    #[test]
    fn test_awaiting_password_locks_password() {
        let caps = ShareCapabilities::default();
        let ctx = context(false, &[]);
        let view = project(input(
            ControllerPhase::AwaitingPasswordForCreate,
            Some(&ctx),
            &caps,
        ));
        assert!(view.password_required);
    }
}
