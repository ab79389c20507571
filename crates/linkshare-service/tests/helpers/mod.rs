//! Shared test helpers for controller integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::oneshot;

use linkshare_core::config::sharing::SharingConfig;
use linkshare_core::error::AppError;
use linkshare_core::result::AppResult;
use linkshare_core::traits::ShareTransport;
use linkshare_core::types::{
    RemoteShare, ShareCapabilities, ShareId, SharePermissions, ShareSnapshot,
};
use linkshare_service::LinkShareController;

/// A transport call as the service saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch(String),
    Create {
        path: String,
        name: Option<String>,
        password: Option<String>,
    },
    SetName(ShareId, String),
    SetPassword(ShareId, String),
    SetExpireDate(ShareId, Option<NaiveDate>),
    SetPermissions(ShareId, SharePermissions),
    Delete(ShareId),
}

/// The answer a test gives to one recorded call.
#[derive(Debug)]
pub enum Reply {
    Shares(Vec<RemoteShare>),
    Created(ShareSnapshot),
    Done,
    Replaced(Option<ShareId>),
    Fail(AppError),
}

/// A transport whose calls stay in flight until the test answers them.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    calls: Mutex<Vec<(Call, Option<oneshot::Sender<Reply>>)>>,
}

impl ScriptedTransport {
    /// Every call recorded so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|(call, _)| call.clone())
            .collect()
    }

    /// Number of calls recorded so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// The most recent call.
    pub fn last_call(&self) -> Call {
        self.calls().pop().expect("no transport call recorded")
    }

    /// Number of fetch calls recorded so far.
    pub fn fetch_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|call| matches!(call, Call::Fetch(_)))
            .count()
    }

    /// Answer the call at `index`.
    pub fn reply(&self, index: usize, reply: Reply) {
        let sender = self.calls.lock().unwrap()[index]
            .1
            .take()
            .expect("call already answered");
        sender.send(reply).expect("call future dropped");
    }

    /// Answer the most recent call.
    pub fn reply_last(&self, reply: Reply) {
        let index = self.call_count() - 1;
        self.reply(index, reply);
    }

    async fn record(&self, call: Call) -> Reply {
        let (tx, rx) = oneshot::channel();
        self.calls.lock().unwrap().push((call, Some(tx)));
        rx.await.expect("reply sender dropped")
    }
}

fn unexpected(reply: Reply) -> ! {
    panic!("unexpected reply {reply:?}")
}

#[async_trait]
impl ShareTransport for ScriptedTransport {
    async fn fetch_shares(&self, path: &str) -> AppResult<Vec<RemoteShare>> {
        match self.record(Call::Fetch(path.to_string())).await {
            Reply::Shares(shares) => Ok(shares),
            Reply::Fail(err) => Err(err),
            other => unexpected(other),
        }
    }

    async fn create_link_share(
        &self,
        path: &str,
        name: Option<&str>,
        password: Option<&str>,
    ) -> AppResult<ShareSnapshot> {
        let call = Call::Create {
            path: path.to_string(),
            name: name.map(str::to_string),
            password: password.map(str::to_string),
        };
        match self.record(call).await {
            Reply::Created(share) => Ok(share),
            Reply::Fail(err) => Err(err),
            other => unexpected(other),
        }
    }

    async fn set_name(&self, id: &ShareId, name: &str) -> AppResult<()> {
        done(self.record(Call::SetName(id.clone(), name.to_string())).await)
    }

    async fn set_password(&self, id: &ShareId, password: &str) -> AppResult<Option<ShareId>> {
        match self
            .record(Call::SetPassword(id.clone(), password.to_string()))
            .await
        {
            Reply::Done => Ok(None),
            Reply::Replaced(new_id) => Ok(new_id),
            Reply::Fail(err) => Err(err),
            other => unexpected(other),
        }
    }

    async fn set_expire_date(&self, id: &ShareId, date: Option<NaiveDate>) -> AppResult<()> {
        done(self.record(Call::SetExpireDate(id.clone(), date)).await)
    }

    async fn set_permissions(&self, id: &ShareId, permissions: SharePermissions) -> AppResult<()> {
        done(self.record(Call::SetPermissions(id.clone(), permissions)).await)
    }

    async fn delete_share(&self, id: &ShareId) -> AppResult<()> {
        done(self.record(Call::Delete(id.clone())).await)
    }
}

fn done(reply: Reply) -> AppResult<()> {
    match reply {
        Reply::Done => Ok(()),
        Reply::Fail(err) => Err(err),
        other => unexpected(other),
    }
}

/// The date the test controllers believe it is.
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 1).unwrap()
}

/// A link share snapshot with id `id`.
pub fn link(id: &str) -> ShareSnapshot {
    ShareSnapshot {
        id: ShareId::new(id),
        token: format!("tok{id}"),
        name: Some(format!("Link {id}")),
        password_is_set: false,
        expire_date: None,
        permissions: SharePermissions::READ,
        show_file_listing: true,
        url: Some(format!("https://cloud.example.com/s/tok{id}")),
    }
}

/// A fetch reply listing link shares with the given ids.
pub fn shares(ids: &[&str]) -> Reply {
    Reply::Shares(ids.iter().map(|id| RemoteShare::Link(link(id))).collect())
}

/// Ids of the controller's shares, in order.
pub fn share_ids(controller: &LinkShareController) -> Vec<String> {
    controller
        .shares()
        .iter()
        .map(|share| share.id().to_string())
        .collect()
}

/// Selected share id as a string.
pub fn selected(controller: &LinkShareController) -> Option<String> {
    controller.selected_id().map(ToString::to_string)
}

/// A controller over a scripted transport.
pub fn controller(capabilities: ShareCapabilities) -> (LinkShareController, Arc<ScriptedTransport>) {
    let transport = Arc::new(ScriptedTransport::default());
    let controller =
        LinkShareController::new(transport.clone(), capabilities, SharingConfig::default())
            .with_clock(today);
    (controller, transport)
}

/// Initialize on `/Docs` and answer the first fetch with `ids`.
pub async fn ready(controller: &mut LinkShareController, transport: &ScriptedTransport, ids: &[&str]) {
    controller
        .initialize("/Docs", false, SharePermissions::all())
        .unwrap();
    controller.poll_completions();
    transport.reply_last(shares(ids));
    assert!(controller.next_completion().await);
}

/// Refetch and answer with `ids`.
pub async fn refresh_with(
    controller: &mut LinkShareController,
    transport: &ScriptedTransport,
    ids: &[&str],
) {
    controller.refresh().unwrap();
    controller.poll_completions();
    transport.reply_last(shares(ids));
    assert!(controller.next_completion().await);
}
