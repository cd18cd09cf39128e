//! Per-section report records.

use crate::error_chain::ErrorChain;
use crate::identity::{SectionId, SectionPath};
use crate::utils::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The outcome of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionStatus {
    /// Section has started and not yet finished.
    Pending,
    /// Section completed successfully.
    Success,
    /// Section failed.
    Failed,
    /// Section was skipped.
    Skipped,
}

impl Default for SectionStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl fmt::Display for SectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Success => write!(f, "success"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

impl SectionStatus {
    /// Returns true if the status is terminal.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Record of one executed section.
///
/// Created the instant a section begins running and finalized in place
/// exactly once. Every declared field is serialized even when it holds a
/// default value, so report consumers see a stable shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionStart {
    /// The section's id.
    pub section_id: SectionId,
    /// The section's ancestor path.
    pub section_path: SectionPath,
    /// When the section began running.
    #[serde(with = "crate::utils::iso8601")]
    pub start_time: Timestamp,
    /// When the section finished, if it has.
    #[serde(with = "crate::utils::iso8601_opt")]
    pub end_time: Option<Timestamp>,
    /// The section's outcome.
    pub status: SectionStatus,
    /// Elapsed execution time in seconds, once finished.
    pub duration_seconds: Option<f64>,
    /// The flattened cause chain, if the section failed.
    pub error: Option<ErrorChain>,
}

impl SectionStart {
    /// Creates the record for a section that is beginning to run.
    #[must_use]
    pub fn pending(section_id: SectionId, section_path: SectionPath, start_time: Timestamp) -> Self {
        Self {
            section_id,
            section_path,
            start_time,
            end_time: None,
            status: SectionStatus::Pending,
            duration_seconds: None,
            error: None,
        }
    }

    /// Finalizes the record as successful.
    pub fn mark_success(&mut self, end_time: Timestamp, duration_seconds: f64) {
        self.end_time = Some(end_time);
        self.status = SectionStatus::Success;
        self.duration_seconds = Some(duration_seconds);
    }

    /// Finalizes the record as failed with its cause chain.
    pub fn mark_failed(&mut self, end_time: Timestamp, duration_seconds: f64, error: ErrorChain) {
        self.end_time = Some(end_time);
        self.status = SectionStatus::Failed;
        self.duration_seconds = Some(duration_seconds);
        self.error = Some(error);
    }

    /// Returns true if the record reached a terminal status.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        self.status.is_terminal()
    }
}
