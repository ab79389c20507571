//! CLI command definitions and dispatch.

pub mod capabilities;
pub mod share;

use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use tokio::sync::broadcast::{self, error::TryRecvError};

use crate::output::{self, OutputFormat};
use linkshare_core::config::AppConfig;
use linkshare_core::error::{AppError, ErrorKind};
use linkshare_core::events::{ControllerEvent, ShareEvent};
use linkshare_core::types::{OperationOutcome, SharePermissions};
use linkshare_service::{LinkShareController, MemoryTransport};

/// LinkShare: manage public link shares of a file or folder
#[derive(Debug, Parser)]
#[command(name = "linkshare", version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Share service state file (overrides the configured one)
    #[arg(long)]
    pub state_file: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the link shares of an item
    List(share::ListArgs),
    /// Create a link share
    Create(share::CreateArgs),
    /// Rename a link share
    Rename(share::RenameArgs),
    /// Set or clear a link share password
    Password(share::PasswordArgs),
    /// Set or clear a link share expiry date
    Expire(share::ExpireArgs),
    /// Change what link recipients may do
    Permissions(share::PermissionsArgs),
    /// Delete a link share
    Delete(share::DeleteArgs),
    /// Show the share service capabilities
    Capabilities,
}

/// The shared item a command works on.
#[derive(Debug, Clone, Args)]
pub struct Target {
    /// Remote path of the shared item
    #[arg(short, long)]
    pub path: String,

    /// The item is a file rather than a folder
    #[arg(long)]
    pub file: bool,
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(&self, config: &AppConfig) -> Result<(), AppError> {
        let state_file = self
            .state_file
            .as_deref()
            .unwrap_or(&config.cli.state_file);

        match &self.command {
            Commands::List(args) => share::list(args, state_file, config, self.format).await,
            Commands::Create(args) => share::create(args, state_file, config, self.format).await,
            Commands::Rename(args) => share::rename(args, state_file, config).await,
            Commands::Password(args) => share::password(args, state_file, config).await,
            Commands::Expire(args) => share::expire(args, state_file, config).await,
            Commands::Permissions(args) => share::permissions(args, state_file, config).await,
            Commands::Delete(args) => share::delete(args, state_file, config).await,
            Commands::Capabilities => capabilities::execute(state_file, self.format).await,
        }
    }
}

/// A controller bound to the persisted share service for one command.
pub struct Session {
    /// The share service.
    transport: Arc<MemoryTransport>,
    /// Controller over the target item.
    pub controller: LinkShareController,
    /// Events since the session opened.
    events: broadcast::Receiver<ControllerEvent>,
}

impl Session {
    /// Load the share service and fetch the target's link shares.
    pub async fn open(
        state_file: &str,
        config: &AppConfig,
        target: &Target,
    ) -> Result<Self, AppError> {
        let transport = Arc::new(MemoryTransport::from_file(state_file).await?);
        let capabilities = transport.capabilities().await;
        let mut controller =
            LinkShareController::new(transport.clone(), capabilities, config.sharing.clone());

        controller.initialize(&target.path, target.file, SharePermissions::all())?;
        controller.run_until_idle().await;
        if let Some(notice) = controller.last_error() {
            output::print_warning(&notice.message);
        }

        let events = controller.subscribe();
        Ok(Self {
            transport,
            controller,
            events,
        })
    }

    /// Run the accepted operations to completion and persist the result.
    ///
    /// Returns the first failed operation as an error. Password refusals
    /// on create are left to the caller, which can retry with a password.
    pub async fn settle(&mut self) -> Result<(), AppError> {
        self.controller.run_until_idle().await;

        let mut failure = None;
        loop {
            match self.events.try_recv() {
                Ok(event) => {
                    if let ShareEvent::OperationCompleted {
                        outcome: OperationOutcome::Failed { kind, code, message },
                        ..
                    } = event.payload
                    {
                        if kind != ErrorKind::PasswordRequired && failure.is_none() {
                            failure = Some(AppError {
                                kind,
                                code,
                                message,
                                source: None,
                            });
                        }
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Controller events dropped");
                }
                Err(_) => break,
            }
        }

        self.transport.save().await?;
        failure.map_or(Ok(()), Err)
    }
}
