//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use tabled::{Table, Tabled};

use linkshare_core::types::ShareView;

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Link share display row for table output
#[derive(Debug, Serialize, Tabled)]
pub struct ShareRow {
    /// Share ID
    id: String,
    /// Selection marker
    #[tabled(rename = " ")]
    #[serde(skip)]
    marker: &'static str,
    /// Display name
    name: String,
    /// Password protected
    password: String,
    /// Expiry date
    expires: String,
    /// Recipient policy
    policy: String,
    /// Public URL
    url: String,
}

impl ShareRow {
    /// Build a row from a share view.
    pub fn new(view: &ShareView, selected: bool) -> Self {
        Self {
            id: view.id.to_string(),
            marker: if selected { "*" } else { "" },
            name: view.display_name.clone(),
            password: if view.password_is_set { "yes" } else { "no" }.to_string(),
            expires: view
                .expire_date
                .map(|d| d.to_string())
                .unwrap_or_else(|| "-".to_string()),
            policy: view
                .policy
                .map(|p| p.to_string())
                .unwrap_or_else(|| "read_only".to_string()),
            url: view.url.clone().unwrap_or_default(),
        }
    }
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No link shares.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{}", json);
        }
    }
}

/// Print a single item in the selected format
pub fn print_item<T: Serialize + std::fmt::Debug>(item: &T, format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            println!("{:#?}", item);
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(item).unwrap_or_else(|_| "{}".to_string());
            println!("{}", json);
        }
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {}", msg);
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {}", msg);
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {}", msg);
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{}:", key), value);
}
