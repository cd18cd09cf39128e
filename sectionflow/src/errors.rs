//! Error types for the sectionflow engine.
//!
//! Three classes are kept apart: business errors raised by a section's own
//! step logic, programming errors signalling misuse of the core, and I/O or
//! serialization failures while persisting the report.

use crate::identity::SectionId;
use thiserror::Error;

/// The main error type for sectionflow operations.
#[derive(Debug, Error)]
pub enum SectionflowError {
    /// A section's step logic failed and `fail_fast` aborted the run.
    #[error("section '{section}' failed: {error}")]
    SectionFailed {
        /// The failing section.
        section: SectionId,
        /// The original error, cause chain intact.
        error: anyhow::Error,
    },

    /// A report invariant was violated; signals a core bug, not a business
    /// condition.
    #[error(transparent)]
    Report(#[from] ReportError),

    /// Serialization of the report failed.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Writing the report file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl SectionflowError {
    /// Creates a section failure from the original step error.
    #[must_use]
    pub fn section_failed(section: SectionId, error: anyhow::Error) -> Self {
        Self::SectionFailed { section, error }
    }
}

/// Errors raised by the report builder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ReportError {
    /// A section was finalized before registering its start.
    ///
    /// Registration always precedes lookup on the execute path, so hitting
    /// this means the core itself was misused.
    #[error("no SectionStart registered for section '{0}'")]
    SectionNotRegistered(SectionId),
}
