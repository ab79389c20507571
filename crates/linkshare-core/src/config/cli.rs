//! Command-line front end configuration.

use serde::{Deserialize, Serialize};

/// Settings for the `linkshare` binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CliConfig {
    /// JSON file holding the simulated remote share service state.
    #[serde(default = "default_state_file")]
    pub state_file: String,
    /// Ask before deleting a link share.
    #[serde(default = "super::default_true")]
    pub confirm_delete: bool,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            state_file: default_state_file(),
            confirm_delete: true,
        }
    }
}

fn default_state_file() -> String {
    "data/shares.json".to_string()
}
