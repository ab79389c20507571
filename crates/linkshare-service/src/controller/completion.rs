//! Applying transport results to controller state.

use tracing::{debug, info, warn};

use linkshare_core::error::{AppError, ErrorKind};
use linkshare_core::events::ShareEvent;
use linkshare_core::result::AppResult;
use linkshare_core::types::{OperationKind, OperationOutcome, ShareId, ShareSnapshot, ShareView};
use linkshare_entity::ShareMutation;

use super::LinkShareController;
use super::selection::resolve_selection;
use super::state::{ControllerState, CreateFlow};
use super::view::share_view;

/// The result of one transport call, tagged with the epoch it was issued in.
pub(crate) enum Completion {
    Fetched {
        epoch: u64,
        seq: u64,
        result: AppResult<Vec<ShareSnapshot>>,
    },
    Created {
        epoch: u64,
        name: Option<String>,
        with_password: bool,
        result: AppResult<ShareSnapshot>,
    },
    Mutated {
        epoch: u64,
        share_id: ShareId,
        mutation: ShareMutation,
        result: AppResult<Option<ShareId>>,
    },
}

impl Completion {
    fn epoch(&self) -> u64 {
        match self {
            Self::Fetched { epoch, .. }
            | Self::Created { epoch, .. }
            | Self::Mutated { epoch, .. } => *epoch,
        }
    }
}

impl LinkShareController {
    pub(super) fn apply_completion(&mut self, completion: Completion) {
        if completion.epoch() != self.epoch {
            debug!(
                epoch = completion.epoch(),
                current = self.epoch,
                "Discarding result from a previous session"
            );
            return;
        }

        match completion {
            Completion::Fetched { seq, result, .. } => self.on_fetched(seq, result),
            Completion::Created {
                name,
                with_password,
                result,
                ..
            } => self.on_created(name, with_password, result),
            Completion::Mutated {
                share_id,
                mutation,
                result,
                ..
            } => self.on_mutated(share_id, mutation, result),
        }
    }

    fn on_fetched(&mut self, seq: u64, result: AppResult<Vec<ShareSnapshot>>) {
        self.fetch_in_flight = false;

        match result {
            Ok(snapshots) => {
                self.check_enforcement(&snapshots);
                let fallback = !matches!(self.create_flow, CreateFlow::AwaitingPassword { .. });
                let Some(ctx) = self.context.as_mut() else {
                    return;
                };

                let previous = ctx.selected().cloned();
                ctx.replace_shares(snapshots);
                let override_id = ctx.take_override_selection(seq);
                let selected = resolve_selection(
                    ctx.shares(),
                    override_id.as_ref(),
                    previous.as_ref(),
                    fallback,
                );
                ctx.select(selected.clone());

                if let Some(watched) = self.rotation_watch.take() {
                    if !ctx.contains(&watched) {
                        info!(
                            share_id = %watched,
                            "Share id changed after password change"
                        );
                    }
                }

                debug!(
                    shares = ctx.shares().len(),
                    selected = ?selected,
                    "Share list refreshed"
                );
                self.state = ControllerState::Ready;
                self.emit(ShareEvent::SharesRefreshed {
                    shares: self.share_views(),
                    selected,
                });
                self.emit_selection();
            }
            Err(err) => {
                warn!(error = %err, "Failed to fetch shares");
                if self.state == ControllerState::Loading {
                    self.state = ControllerState::Ready;
                }
                self.report_error(&err);
            }
        }

        if self.refetch_queued {
            self.refetch_queued = false;
            self.start_fetch();
        }
    }

    fn on_created(
        &mut self,
        name: Option<String>,
        with_password: bool,
        result: AppResult<ShareSnapshot>,
    ) {
        match result {
            Ok(snapshot) => {
                self.create_flow = CreateFlow::Idle;
                self.select_after_next_fetch(snapshot.id.clone());
                self.emit(ShareEvent::OperationCompleted {
                    share_id: Some(snapshot.id),
                    kind: OperationKind::Create,
                    outcome: OperationOutcome::Succeeded,
                });
                self.clear_error();
                self.refetch();
            }
            Err(err) if err.kind == ErrorKind::PasswordRequired || with_password => {
                if err.kind == ErrorKind::PasswordRequired {
                    debug!(error = %err, "Link share creation waits for a password");
                } else {
                    warn!(error = %err, "Failed to create password-protected link share");
                }
                let message = err.message.clone();
                self.create_flow = CreateFlow::AwaitingPassword {
                    name,
                    message: message.clone(),
                };
                self.emit(ShareEvent::OperationCompleted {
                    share_id: None,
                    kind: OperationKind::Create,
                    outcome: OperationOutcome::from(&err),
                });
                if let Some(ctx) = self.context.as_mut() {
                    ctx.select(None);
                }
                self.emit_selection();
                if with_password {
                    self.report_error(&err);
                }
                self.emit(ShareEvent::AwaitingPasswordForCreate { message });
            }
            Err(err) => {
                warn!(error = %err, "Failed to create link share");
                self.create_flow = CreateFlow::Idle;
                self.emit(ShareEvent::OperationCompleted {
                    share_id: None,
                    kind: OperationKind::Create,
                    outcome: OperationOutcome::from(&err),
                });
                self.report_error(&err);
            }
        }
    }

    fn on_mutated(
        &mut self,
        share_id: ShareId,
        mutation: ShareMutation,
        result: AppResult<Option<ShareId>>,
    ) {
        let Some(ctx) = self.context.as_mut() else {
            return;
        };
        let Some(share) = ctx.find_mut(&share_id) else {
            debug!(share_id = %share_id, kind = %mutation.kind(), "Discarding result for unlisted share");
            return;
        };

        let status: AppResult<()> = match &result {
            Ok(_) => Ok(()),
            Err(err) => Err(err.clone()),
        };
        let Some(outcome) = share.complete(&mutation, &status) else {
            debug!(share_id = %share_id, kind = %mutation.kind(), "Discarding unexpected result");
            return;
        };
        let is_selected = ctx.is_selected(&share_id);

        self.emit(ShareEvent::OperationCompleted {
            share_id: Some(share_id.clone()),
            kind: mutation.kind(),
            outcome,
        });

        match result {
            Err(err) => {
                warn!(share_id = %share_id, kind = %mutation.kind(), error = %err, "Share operation failed");
                self.report_error(&err);
            }
            Ok(replacement) => {
                debug!(share_id = %share_id, kind = %mutation.kind(), "Share operation succeeded");
                self.clear_error();
                match mutation {
                    ShareMutation::Delete => self.refetch(),
                    ShareMutation::SetPassword(_) => self.after_password_change(share_id, replacement, is_selected),
                    _ => {}
                }
                // A fetch issued before this mutation would overwrite it.
                if self.fetch_in_flight {
                    self.refetch_queued = true;
                }
            }
        }

        if is_selected {
            self.emit_selection();
        }
    }

    /// Some servers replace a share when its password changes. A reported
    /// replacement id is followed; otherwise a refetch reveals the change.
    fn after_password_change(
        &mut self,
        share_id: ShareId,
        replacement: Option<ShareId>,
        was_selected: bool,
    ) {
        match replacement {
            Some(new_id) => {
                info!(old_id = %share_id, new_id = %new_id, "Share replaced after password change");
                if was_selected {
                    self.select_after_next_fetch(new_id);
                }
                self.refetch();
            }
            None if self.config.refetch_after_password_change => {
                self.rotation_watch = Some(share_id);
                self.refetch();
            }
            None => {}
        }
    }

    /// Select `id` once a fetch issued from now on lists it.
    fn select_after_next_fetch(&mut self, id: ShareId) {
        let from_fetch = self.fetch_seq + 1;
        if let Some(ctx) = self.context.as_mut() {
            ctx.set_override_selection(id, from_fetch);
        }
    }

    /// Report listed shares that break enforced password or expiry rules.
    /// The list is still accepted; the service is authoritative.
    fn check_enforcement(&mut self, snapshots: &[ShareSnapshot]) {
        let caps = &self.capabilities;
        let max_expire_date = caps.max_expire_date((self.clock)());
        let violation = snapshots.iter().find_map(|share| {
            if caps.enforce_password && !share.password_is_set {
                Some(format!(
                    "Share {} has no password although passwords are enforced",
                    share.id
                ))
            } else if caps.enforce_expire_date && share.expire_date.is_none() {
                Some(format!(
                    "Share {} has no expiry date although expiry dates are enforced",
                    share.id
                ))
            } else if let (Some(date), Some(max)) = (share.expire_date, max_expire_date)
                && date > max
            {
                Some(format!(
                    "Share {} expires on {date}, later than the allowed {max}",
                    share.id
                ))
            } else {
                None
            }
        });

        if let Some(message) = violation {
            warn!(message = %message, "Share list violates server capabilities");
            self.report_error(&AppError::precondition_denied(message));
        }
    }

    fn share_views(&self) -> Vec<ShareView> {
        self.context
            .as_ref()
            .map(|ctx| {
                ctx.shares()
                    .iter()
                    .map(|share| {
                        share_view(
                            share,
                            &self.capabilities,
                            ctx.is_file(),
                            &self.config.default_link_name,
                        )
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
