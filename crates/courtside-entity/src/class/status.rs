//! Class lifecycle status.

use serde::{Deserialize, Serialize};

/// Lifecycle of a class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "class_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassStatus {
    /// Accepting enrollments.
    Open,
    /// Running.
    InProgress,
    /// Cancelled; no longer occupies its slot.
    Cancelled,
    /// Ended.
    Completed,
}

impl ClassStatus {
    /// Whether the class still occupies its slot.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Terminal states cannot be edited.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }
}
