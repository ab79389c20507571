//! Observer events emitted by the link-share controller.
//!
//! Events are fanned out over a broadcast channel and consumed by
//! presentation layers, the CLI, and tests.

pub mod share;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use share::ShareEvent;

/// Wrapper for controller events with metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ControllerEvent {
    /// Unique event ID.
    pub id: Uuid,
    /// When the event occurred.
    pub timestamp: DateTime<Utc>,
    /// The shared path the controller manages.
    pub path: String,
    /// The event payload.
    pub payload: ShareEvent,
}

impl ControllerEvent {
    /// Create a new controller event.
    pub fn new(path: impl Into<String>, payload: ShareEvent) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            path: path.into(),
            payload,
        }
    }
}
