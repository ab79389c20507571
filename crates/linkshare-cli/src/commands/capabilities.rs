//! Share service capability CLI command.

use crate::output::{self, OutputFormat};
use linkshare_core::error::AppError;
use linkshare_service::MemoryTransport;

/// Show what the share service allows for public links
pub async fn execute(state_file: &str, format: OutputFormat) -> Result<(), AppError> {
    let transport = MemoryTransport::from_file(state_file).await?;
    let caps = transport.capabilities().await;

    match format {
        OutputFormat::Json => output::print_item(&caps, format),
        OutputFormat::Table => {
            let flag = |on: bool| if on { "yes" } else { "no" };
            output::print_kv("Link sharing", flag(caps.link_sharing_enabled));
            output::print_kv("Multiple links", flag(caps.multiple_links_supported));
            output::print_kv("Password enforced", flag(caps.enforce_password));
            output::print_kv("Expiry enforced", flag(caps.enforce_expire_date));
            output::print_kv(
                "Max expiry days",
                &caps
                    .max_expire_days
                    .map(|d| d.to_string())
                    .unwrap_or_else(|| "-".to_string()),
            );
            output::print_kv("Public upload", flag(caps.upload_allowed));
            output::print_kv("Upload-only links", flag(caps.upload_only_supported));
        }
    }
    Ok(())
}
