//! Link-share lifecycle controller.
//!
//! The controller owns the share list of one path and the selection, admits
//! user intents against the server capabilities, runs transport calls, and
//! reports every visible change on a broadcast channel.
//!
//! Intents (`create_share`, `set_password`, ...) are synchronous: they either
//! reject immediately (busy, invalid, disabled) or accept the operation and
//! park its transport future inside the controller. Completions are applied
//! one at a time on the caller's task by [`LinkShareController::poll_completions`],
//! [`LinkShareController::next_completion`] or
//! [`LinkShareController::run_until_idle`], so controller state is only ever
//! touched through `&mut self`.

mod completion;
pub mod context;
pub mod selection;
pub mod state;
pub mod view;

use std::fmt;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use futures::{FutureExt, StreamExt};
use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use linkshare_core::config::sharing::SharingConfig;
use linkshare_core::error::AppError;
use linkshare_core::events::{ControllerEvent, ShareEvent};
use linkshare_core::result::AppResult;
use linkshare_core::traits::ShareTransport;
use linkshare_core::types::{
    LinkPolicy, OperationKind, ShareCapabilities, ShareId, SharePermissions,
};
use linkshare_entity::{LinkShare, MutationRules, ShareMutation, display_name};

use crate::manager::ShareManager;

use self::completion::Completion;
use self::context::SharedPathContext;
use self::state::{ControllerState, CreateFlow};
pub use self::state::{ControllerPhase, ErrorNotice};
pub use self::view::PanelView;

/// Source of the current date.
pub type Clock = fn() -> NaiveDate;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

/// Coordinates the link shares of one shared path.
pub struct LinkShareController {
    /// Access to the remote share service.
    manager: ShareManager,
    /// Server capabilities for the session.
    capabilities: ShareCapabilities,
    /// Controller policy.
    config: SharingConfig,
    /// Lifecycle state.
    state: ControllerState,
    /// The controlled path, once initialized.
    context: Option<SharedPathContext>,
    /// Link creation progress.
    create_flow: CreateFlow,
    /// A fetch is in flight.
    fetch_in_flight: bool,
    /// A mutation landed while a fetch was in flight; fetch again after it.
    refetch_queued: bool,
    /// Share whose id may rotate after a password change.
    rotation_watch: Option<ShareId>,
    /// Incremented by every `initialize`; older completions are stale.
    epoch: u64,
    /// Sequence number of the most recently issued fetch.
    fetch_seq: u64,
    /// Transport calls in flight.
    in_flight: FuturesUnordered<BoxFuture<'static, Completion>>,
    /// Observer fan-out.
    events: broadcast::Sender<ControllerEvent>,
    /// Error currently shown.
    last_error: Option<ErrorNotice>,
    /// Source of the current date.
    clock: Clock,
}

impl fmt::Debug for LinkShareController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkShareController")
            .field("state", &self.state)
            .field("context", &self.context)
            .field("create_flow", &self.create_flow)
            .field("fetch_in_flight", &self.fetch_in_flight)
            .field("in_flight", &self.in_flight.len())
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}

impl LinkShareController {
    /// Creates a controller for one session.
    pub fn new(
        transport: Arc<dyn ShareTransport>,
        capabilities: ShareCapabilities,
        config: SharingConfig,
    ) -> Self {
        let (events, _) = broadcast::channel(config.event_buffer.max(1));
        Self {
            manager: ShareManager::new(transport),
            capabilities,
            config,
            state: ControllerState::Uninitialized,
            context: None,
            create_flow: CreateFlow::Idle,
            fetch_in_flight: false,
            refetch_queued: false,
            rotation_watch: None,
            epoch: 0,
            fetch_seq: 0,
            in_flight: FuturesUnordered::new(),
            events,
            last_error: None,
            clock: local_today,
        }
    }

    /// Replace the date source.
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Subscribe to controller events.
    pub fn subscribe(&self) -> broadcast::Receiver<ControllerEvent> {
        self.events.subscribe()
    }

    /// Server capabilities for the session.
    pub fn capabilities(&self) -> &ShareCapabilities {
        &self.capabilities
    }

    /// Current phase.
    pub fn phase(&self) -> ControllerPhase {
        match &self.state {
            ControllerState::Uninitialized => ControllerPhase::Uninitialized,
            ControllerState::SharingDisabled { .. } => ControllerPhase::SharingDisabled,
            ControllerState::Loading => ControllerPhase::Loading,
            ControllerState::Ready => {
                if matches!(self.create_flow, CreateFlow::AwaitingPassword { .. }) {
                    ControllerPhase::AwaitingPasswordForCreate
                } else if self.selected_id().is_some() {
                    ControllerPhase::SelectionActive
                } else {
                    ControllerPhase::NoSelection
                }
            }
        }
    }

    /// Why sharing is disabled, if it is.
    pub fn disabled_reason(&self) -> Option<&str> {
        match &self.state {
            ControllerState::SharingDisabled { reason } => Some(reason),
            _ => None,
        }
    }

    /// The controlled path and share list.
    pub fn context(&self) -> Option<&SharedPathContext> {
        self.context.as_ref()
    }

    /// Link shares in server order.
    pub fn shares(&self) -> &[LinkShare] {
        self.context
            .as_ref()
            .map(SharedPathContext::shares)
            .unwrap_or_default()
    }

    /// Look up a share by id.
    pub fn share(&self, id: &ShareId) -> Option<&LinkShare> {
        self.context.as_ref().and_then(|ctx| ctx.find(id))
    }

    /// Selected share id.
    pub fn selected_id(&self) -> Option<&ShareId> {
        self.context.as_ref().and_then(SharedPathContext::selected)
    }

    /// The selected share.
    pub fn selected_share(&self) -> Option<&LinkShare> {
        self.context
            .as_ref()
            .and_then(SharedPathContext::selected_share)
    }

    /// Error currently shown.
    pub fn last_error(&self) -> Option<&ErrorNotice> {
        self.last_error.as_ref()
    }

    /// Whether no transport call is in flight.
    pub fn is_idle(&self) -> bool {
        self.in_flight.is_empty()
    }

    /// Resolve the name shown for a share.
    pub fn display_name(&self, share: &LinkShare) -> String {
        display_name(
            share.name(),
            share.token(),
            self.capabilities.multiple_links_supported,
            &self.config.default_link_name,
        )
    }

    /// Name to show in a delete confirmation prompt.
    pub fn describe_share_for_confirmation(&self, id: &ShareId) -> AppResult<String> {
        self.share(id)
            .map(|share| self.display_name(share))
            .ok_or_else(|| AppError::not_found(format!("Share {id} is not listed")))
    }

    /// Project the current state into the panel view model.
    pub fn view(&self) -> PanelView {
        let awaiting = match &self.create_flow {
            CreateFlow::AwaitingPassword { message, .. } => Some(message.as_str()),
            _ => None,
        };
        view::project(view::ProjectionInput {
            phase: self.phase(),
            context: self.context.as_ref(),
            capabilities: &self.capabilities,
            default_label: &self.config.default_link_name,
            creating: matches!(self.create_flow, CreateFlow::InFlight { .. }),
            awaiting_password_message: awaiting,
            last_error: self.last_error.as_ref(),
            today: (self.clock)(),
        })
    }

    /// Start managing link shares for `path`.
    ///
    /// Denies sharing, without any transport call, when link sharing is
    /// disabled, when `max_sharing_permissions` lacks re-share rights, or
    /// when the item has no remote path. Otherwise starts the first fetch.
    pub fn initialize(
        &mut self,
        path: &str,
        is_file: bool,
        max_sharing_permissions: SharePermissions,
    ) -> AppResult<()> {
        self.epoch += 1;
        self.context = None;
        self.create_flow = CreateFlow::Idle;
        self.fetch_in_flight = false;
        self.refetch_queued = false;
        self.rotation_watch = None;
        self.last_error = None;

        let denial = if !self.capabilities.link_sharing_enabled {
            Some("Link shares have been disabled")
        } else if !max_sharing_permissions.can_reshare() {
            Some("The file can not be shared because it was shared without sharing permission.")
        } else if path.trim().is_empty() {
            Some("Unable to share files not in a sync folder.")
        } else {
            None
        };

        if let Some(reason) = denial {
            warn!(path = %path, reason, "Link sharing denied");
            let err = AppError::precondition_denied(reason);
            self.state = ControllerState::SharingDisabled {
                reason: reason.to_string(),
            };
            self.report_error(&err);
            return Err(err);
        }

        self.context = Some(SharedPathContext::new(path, is_file));
        self.state = ControllerState::Loading;
        info!(path = %path, is_file, "Link sharing initialized");
        self.emit(ShareEvent::CapabilitiesResolved {
            capabilities: self.capabilities.clone(),
        });
        self.start_fetch();
        Ok(())
    }

    /// Refetch the share list.
    ///
    /// Coalesced into the fetch already in flight, if any.
    pub fn refresh(&mut self) -> AppResult<()> {
        self.ensure_active()?;
        if self.fetch_in_flight {
            debug!("Refresh coalesced into in-flight fetch");
            return Ok(());
        }
        self.start_fetch();
        Ok(())
    }

    /// Create a new link share.
    ///
    /// Without a name the configured default is used. Single-link servers
    /// never receive a name and accept only one link per item.
    pub fn create_share(&mut self, requested_name: Option<&str>) -> AppResult<()> {
        self.ensure_active()?;
        if matches!(self.create_flow, CreateFlow::InFlight { .. }) {
            return Err(AppError::busy("A link share is already being created"));
        }
        if !self.capabilities.multiple_links_supported && !self.shares().is_empty() {
            return Err(AppError::conflict(
                "The server supports only one public link per item",
            ));
        }
        let name = self.creation_name(requested_name)?;
        self.start_create(name, None);
        Ok(())
    }

    /// Select a share, or clear the selection.
    ///
    /// Selecting a share abandons a create that waits for a password.
    pub fn select_share(&mut self, id: Option<&ShareId>) -> AppResult<()> {
        self.ensure_active()?;
        let ctx = self.context_mut()?;
        if let Some(id) = id {
            if !ctx.contains(id) {
                return Err(AppError::not_found(format!("Share {id} is not listed")));
            }
        }
        ctx.select(id.cloned());
        if id.is_some() && matches!(self.create_flow, CreateFlow::AwaitingPassword { .. }) {
            debug!("Selection abandons password-protected create");
            self.create_flow = CreateFlow::Idle;
        }
        self.clear_error();
        self.emit_selection();
        Ok(())
    }

    /// Rename a share.
    ///
    /// A no-op when the name equals the current name or the token.
    pub fn rename_share(&mut self, id: &ShareId, name: &str) -> AppResult<()> {
        self.ensure_active()?;
        let share = self
            .share(id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} is not listed")))?;
        let trimmed = name.trim();
        if share.name() == Some(trimmed) || share.token() == trimmed {
            return Ok(());
        }
        self.mutate(id, |share, rules| share.request_set_name(name, rules))
    }

    /// Set or clear the selected share's password.
    ///
    /// While a create waits for a password, retries the create with it.
    /// Without a selection this is a no-op.
    pub fn set_password(&mut self, password: &str) -> AppResult<()> {
        self.ensure_active()?;
        if let CreateFlow::AwaitingPassword { name, .. } = &self.create_flow {
            if password.is_empty() {
                return Err(AppError::validation(
                    "A password is required to create this link share",
                ));
            }
            let name = name.clone();
            self.start_create(name, Some(password.to_string()));
            return Ok(());
        }
        match self.selected_id().cloned() {
            Some(id) => self.mutate(&id, |share, rules| share.request_set_password(password, rules)),
            None => {
                debug!("set_password without selection ignored");
                Ok(())
            }
        }
    }

    /// Set or clear the selected share's expiry date. Without a selection
    /// this is a no-op.
    pub fn set_expire_date(&mut self, date: Option<NaiveDate>) -> AppResult<()> {
        self.ensure_active()?;
        match self.selected_id().cloned() {
            Some(id) => self.mutate(&id, |share, rules| share.request_set_expire_date(date, rules)),
            None => {
                debug!("set_expire_date without selection ignored");
                Ok(())
            }
        }
    }

    /// Change the selected share's recipient policy. Without a selection
    /// this is a no-op.
    pub fn set_permissions(&mut self, policy: LinkPolicy) -> AppResult<()> {
        self.ensure_active()?;
        match self.selected_id().cloned() {
            Some(id) => self.mutate(&id, |share, rules| share.request_set_permissions(policy, rules)),
            None => {
                debug!("set_permissions without selection ignored");
                Ok(())
            }
        }
    }

    /// Delete a share. Confirmation is the caller's job; see
    /// [`Self::describe_share_for_confirmation`].
    pub fn delete_share(&mut self, id: &ShareId) -> AppResult<()> {
        self.ensure_active()?;
        self.mutate(id, |share, _| share.request_delete())
    }

    /// Apply every completion that is already available, without waiting.
    ///
    /// Also drives newly accepted transport calls forward. Returns the
    /// number of completions applied.
    pub fn poll_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Some(Some(completion)) = self.in_flight.next().now_or_never() {
            self.apply_completion(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` when nothing is in flight.
    pub async fn next_completion(&mut self) -> bool {
        match self.in_flight.next().await {
            Some(completion) => {
                self.apply_completion(completion);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is in flight, including the fetches
    /// the completions trigger.
    pub async fn run_until_idle(&mut self) {
        while self.next_completion().await {}
    }

    fn ensure_active(&self) -> AppResult<()> {
        match &self.state {
            ControllerState::Uninitialized => Err(AppError::conflict(
                "Link sharing has not been initialized",
            )),
            ControllerState::SharingDisabled { reason } => {
                Err(AppError::precondition_denied(reason.clone()))
            }
            ControllerState::Loading | ControllerState::Ready => Ok(()),
        }
    }

    fn context_mut(&mut self) -> AppResult<&mut SharedPathContext> {
        self.context
            .as_mut()
            .ok_or_else(|| AppError::conflict("Link sharing has not been initialized"))
    }

    fn creation_name(&self, requested: Option<&str>) -> AppResult<Option<String>> {
        if !self.capabilities.multiple_links_supported {
            if requested.is_some() {
                debug!("Share name suppressed on single-link server");
            }
            return Ok(None);
        }
        let name = requested
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(&self.config.default_link_name);
        if name.chars().count() > self.config.max_name_length {
            return Err(AppError::validation(format!(
                "Share name must not be longer than {} characters",
                self.config.max_name_length
            )));
        }
        Ok(Some(name.to_string()))
    }

    fn start_fetch(&mut self) {
        let Some(ctx) = self.context.as_ref() else {
            return;
        };
        let path = ctx.path().to_string();
        let manager = self.manager.clone();
        let epoch = self.epoch;
        self.fetch_seq += 1;
        let seq = self.fetch_seq;
        self.fetch_in_flight = true;
        self.in_flight.push(
            async move {
                let result = manager.fetch_link_shares(&path).await;
                Completion::Fetched { epoch, seq, result }
            }
            .boxed(),
        );
    }

    /// Fetch after a mutation, queueing behind a fetch already in flight
    /// because that one may predate the mutation.
    fn refetch(&mut self) {
        if self.fetch_in_flight {
            self.refetch_queued = true;
        } else {
            self.start_fetch();
        }
    }

    fn start_create(&mut self, name: Option<String>, password: Option<String>) {
        let Some(ctx) = self.context.as_ref() else {
            return;
        };
        let path = ctx.path().to_string();
        let manager = self.manager.clone();
        let epoch = self.epoch;
        let with_password = password.is_some();
        self.create_flow = CreateFlow::InFlight {
            name: name.clone(),
            with_password,
        };
        debug!(path = %path, name = ?name, with_password, "Creating link share");
        self.emit(ShareEvent::OperationStarted {
            share_id: None,
            kind: OperationKind::Create,
        });
        self.in_flight.push(
            async move {
                let result = manager
                    .create_link_share(&path, name.as_deref(), password.as_deref())
                    .await;
                Completion::Created {
                    epoch,
                    name,
                    with_password,
                    result,
                }
            }
            .boxed(),
        );
    }

    fn mutate<F>(&mut self, id: &ShareId, admit: F) -> AppResult<()>
    where
        F: FnOnce(&mut LinkShare, &MutationRules<'_>) -> AppResult<ShareMutation>,
    {
        let today = (self.clock)();
        let ctx = self
            .context
            .as_mut()
            .ok_or_else(|| AppError::conflict("Link sharing has not been initialized"))?;
        let rules = MutationRules {
            capabilities: &self.capabilities,
            is_file: ctx.is_file(),
            max_name_length: self.config.max_name_length,
            today,
        };
        let share = ctx
            .find_mut(id)
            .ok_or_else(|| AppError::not_found(format!("Share {id} is not listed")))?;
        let mutation = admit(share, &rules)?;

        let kind = mutation.kind();
        debug!(share_id = %id, mutation = ?mutation, "Share operation accepted");
        self.emit(ShareEvent::OperationStarted {
            share_id: Some(id.clone()),
            kind,
        });

        let manager = self.manager.clone();
        let epoch = self.epoch;
        let share_id = id.clone();
        self.in_flight.push(
            async move {
                let result = manager.apply(&share_id, &mutation).await;
                Completion::Mutated {
                    epoch,
                    share_id,
                    mutation,
                    result,
                }
            }
            .boxed(),
        );
        Ok(())
    }

    fn emit(&self, payload: ShareEvent) {
        let path = self
            .context
            .as_ref()
            .map(|ctx| ctx.path().to_string())
            .unwrap_or_default();
        let _ = self.events.send(ControllerEvent::new(path, payload));
    }

    fn emit_selection(&self) {
        let share = self.context.as_ref().and_then(|ctx| {
            ctx.selected_share().map(|share| {
                view::share_view(
                    share,
                    &self.capabilities,
                    ctx.is_file(),
                    &self.config.default_link_name,
                )
            })
        });
        self.emit(ShareEvent::SelectionChanged { share });
    }

    fn report_error(&mut self, err: &AppError) {
        self.last_error = Some(ErrorNotice::from(err));
        self.emit(ShareEvent::ErrorOccurred {
            kind: err.kind,
            code: err.code,
            message: err.message.clone(),
        });
    }

    fn clear_error(&mut self) {
        if self.last_error.take().is_some() {
            self.emit(ShareEvent::ErrorCleared);
        }
    }
}
