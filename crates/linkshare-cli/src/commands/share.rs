//! Link share CLI commands.

use chrono::NaiveDate;
use clap::Args;
use dialoguer::{Confirm, Password};

use super::{Session, Target};
use crate::output::{self, OutputFormat, ShareRow};
use linkshare_core::config::AppConfig;
use linkshare_core::error::AppError;
use linkshare_core::types::{LinkPolicy, ShareId};
use linkshare_service::ControllerPhase;

/// Arguments for `list`
#[derive(Debug, Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub target: Target,
}

/// Arguments for `create`
#[derive(Debug, Args)]
pub struct CreateArgs {
    #[command(flatten)]
    pub target: Target,

    /// Link name (ignored by servers with a single link per item)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Protect the link with this password
    #[arg(long)]
    pub password: Option<String>,
}

/// Arguments for `rename`
#[derive(Debug, Args)]
pub struct RenameArgs {
    #[command(flatten)]
    pub target: Target,

    /// Share ID
    pub id: ShareId,

    /// New name
    pub name: String,
}

/// Arguments for `password`
#[derive(Debug, Args)]
pub struct PasswordArgs {
    #[command(flatten)]
    pub target: Target,

    /// Share ID
    pub id: ShareId,

    /// New password (prompted for when omitted)
    #[arg(long, conflicts_with = "clear")]
    pub password: Option<String>,

    /// Remove the password
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for `expire`
#[derive(Debug, Args)]
pub struct ExpireArgs {
    #[command(flatten)]
    pub target: Target,

    /// Share ID
    pub id: ShareId,

    /// Expiry date (YYYY-MM-DD)
    #[arg(long, required_unless_present = "clear", conflicts_with = "clear")]
    pub date: Option<NaiveDate>,

    /// Remove the expiry date
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for `permissions`
#[derive(Debug, Args)]
pub struct PermissionsArgs {
    #[command(flatten)]
    pub target: Target,

    /// Share ID
    pub id: ShareId,

    /// read_only, read_write or upload_only
    pub policy: LinkPolicy,
}

/// Arguments for `delete`
#[derive(Debug, Args)]
pub struct DeleteArgs {
    #[command(flatten)]
    pub target: Target,

    /// Share ID
    pub id: ShareId,

    /// Do not ask for confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// List link shares
pub async fn list(
    args: &ListArgs,
    state_file: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let session = Session::open(state_file, config, &args.target).await?;
    let view = session.controller.view();

    match format {
        OutputFormat::Json => output::print_item(&view, format),
        OutputFormat::Table => {
            let selected = view.selected.as_ref().map(|s| &s.id);
            let rows: Vec<ShareRow> = view
                .shares
                .iter()
                .map(|share| ShareRow::new(share, selected == Some(&share.id)))
                .collect();
            output::print_list(&rows, format);
            output::print_kv("Can create", if view.can_create { "yes" } else { "no" });
            if view.password_required {
                output::print_kv("Password", "required");
            }
            if let Some(max) = view.max_expire_date {
                output::print_kv("Latest expiry", &max.to_string());
            }
        }
    }
    Ok(())
}

/// Create a link share, asking for a password when the server demands one
pub async fn create(
    args: &CreateArgs,
    state_file: &str,
    config: &AppConfig,
    format: OutputFormat,
) -> Result<(), AppError> {
    let mut session = Session::open(state_file, config, &args.target).await?;

    session.controller.create_share(args.name.as_deref())?;
    session.settle().await?;

    if session.controller.phase() == ControllerPhase::AwaitingPasswordForCreate {
        let message = session
            .controller
            .view()
            .awaiting_password_message
            .unwrap_or_default();
        let password = match &args.password {
            Some(password) => password.clone(),
            None => prompt_password(&message)?,
        };
        session.controller.set_password(&password)?;
        session.settle().await?;

        if session.controller.phase() == ControllerPhase::AwaitingPasswordForCreate {
            return Err(match session.controller.last_error() {
                Some(notice) => AppError {
                    kind: notice.kind,
                    code: notice.code,
                    message: notice.message.clone(),
                    source: None,
                },
                None => AppError::password_required(message),
            });
        }
    } else if let Some(password) = &args.password {
        session.controller.set_password(password)?;
        session.settle().await?;
    }

    let view = session.controller.view();
    let Some(share) = view.selected else {
        return Err(AppError::internal("Created link share is not listed"));
    };
    match format {
        OutputFormat::Json => output::print_item(&share, format),
        OutputFormat::Table => {
            output::print_success(&format!("Created link share '{}'", share.display_name));
            output::print_kv("ID", share.id.as_str());
            if let Some(url) = &share.url {
                output::print_kv("URL", url);
            }
            if let Some(date) = share.expire_date {
                output::print_kv("Expires", &date.to_string());
            }
        }
    }
    Ok(())
}

/// Rename a link share
pub async fn rename(args: &RenameArgs, state_file: &str, config: &AppConfig) -> Result<(), AppError> {
    let mut session = Session::open(state_file, config, &args.target).await?;
    session.controller.rename_share(&args.id, &args.name)?;
    session.settle().await?;
    output::print_success(&format!("Link share {} renamed", args.id));
    Ok(())
}

/// Set or clear a link share password
pub async fn password(
    args: &PasswordArgs,
    state_file: &str,
    config: &AppConfig,
) -> Result<(), AppError> {
    let mut session = Session::open(state_file, config, &args.target).await?;
    session.controller.select_share(Some(&args.id))?;

    let password = if args.clear {
        String::new()
    } else {
        match &args.password {
            Some(password) => password.clone(),
            None => Password::new()
                .with_prompt("New password")
                .with_confirmation("Repeat password", "Passwords do not match")
                .interact()
                .map_err(|e| AppError::internal(format!("Failed to read password: {e}")))?,
        }
    };

    session.controller.set_password(&password)?;
    session.settle().await?;

    if args.clear {
        output::print_success(&format!("Password of link share {} removed", args.id));
    } else {
        output::print_success(&format!("Password of link share {} set", args.id));
    }
    Ok(())
}

/// Set or clear a link share expiry date
pub async fn expire(args: &ExpireArgs, state_file: &str, config: &AppConfig) -> Result<(), AppError> {
    let mut session = Session::open(state_file, config, &args.target).await?;
    session.controller.select_share(Some(&args.id))?;

    let date = if args.clear { None } else { args.date };
    session.controller.set_expire_date(date)?;
    session.settle().await?;

    match date {
        Some(date) => output::print_success(&format!("Link share {} expires on {date}", args.id)),
        None => output::print_success(&format!("Expiry of link share {} removed", args.id)),
    }
    Ok(())
}

/// Change a link share's recipient policy
pub async fn permissions(
    args: &PermissionsArgs,
    state_file: &str,
    config: &AppConfig,
) -> Result<(), AppError> {
    let mut session = Session::open(state_file, config, &args.target).await?;
    session.controller.select_share(Some(&args.id))?;
    session.controller.set_permissions(args.policy)?;
    session.settle().await?;
    output::print_success(&format!("Link share {} is now {}", args.id, args.policy));
    Ok(())
}

/// Delete a link share after confirmation
pub async fn delete(args: &DeleteArgs, state_file: &str, config: &AppConfig) -> Result<(), AppError> {
    let mut session = Session::open(state_file, config, &args.target).await?;
    let name = session.controller.describe_share_for_confirmation(&args.id)?;

    if config.cli.confirm_delete && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete link share '{name}'?"))
            .default(false)
            .interact()
            .map_err(|e| AppError::internal(format!("Failed to read confirmation: {e}")))?;
        if !confirmed {
            output::print_warning("Aborted");
            return Ok(());
        }
    }

    session.controller.delete_share(&args.id)?;
    session.settle().await?;
    output::print_success(&format!("Link share '{name}' deleted"));
    Ok(())
}

fn prompt_password(message: &str) -> Result<String, AppError> {
    if !message.is_empty() {
        output::print_warning(message);
    }
    Password::new()
        .with_prompt("Link password")
        .interact()
        .map_err(|e| AppError::internal(format!("Failed to read password: {e}")))
}
