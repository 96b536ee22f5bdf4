//! Error types for the trigger system

use crate::id::{GroupId, TriggerId};
use thiserror::Error;

/// Trigger system errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TriggerError {
    /// Timer interval must be finite and > 0
    #[error("Invalid timer interval: {0} (must be > 0)")]
    InvalidInterval(f32),

    /// Event name not one of enter/stay/leave/timer_update/timer_end
    #[error("Unknown trigger event type: {0:?}")]
    UnknownEventType(String),

    /// Trigger is not a member of the group
    #[error("Trigger not found: {0}")]
    TriggerNotFound(TriggerId),

    /// Group is not registered with the system
    #[error("Group not found: {0}")]
    GroupNotFound(GroupId),

    /// Parameters could not be parsed
    #[error("Invalid trigger parameters: {0}")]
    InvalidParams(String),
}

/// Result type for trigger operations
pub type Result<T> = std::result::Result<T, TriggerError>;
