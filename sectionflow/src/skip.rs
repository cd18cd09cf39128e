//! Skip predicates backing resume semantics.
//!
//! The source of skip reasons (on-disk completion markers, CLI filters, ...)
//! lives outside the core; the runner only sees this trait.

use crate::identity::SectionId;
use std::collections::HashMap;

/// Decides whether a section is already complete for the current options.
pub trait SkipPredicate: Send + Sync {
    /// Returns a human-readable reason if the section should be skipped.
    fn skip_reason(&self, section: &SectionId) -> Option<String>;
}

/// Predicate that never skips; the default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverSkip;

impl SkipPredicate for NeverSkip {
    fn skip_reason(&self, _section: &SectionId) -> Option<String> {
        None
    }
}

/// Predicate backed by a set of known-complete section ids.
///
/// The shape an on-disk completion-marker source adapts into.
#[derive(Debug, Clone, Default)]
pub struct CompletedSet {
    reasons: HashMap<SectionId, String>,
}

impl CompletedSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a section complete with an explanatory reason.
    #[must_use]
    pub fn with_completed(mut self, id: impl Into<SectionId>, reason: impl Into<String>) -> Self {
        self.reasons.insert(id.into(), reason.into());
        self
    }

    /// Marks a section complete after construction.
    pub fn mark_completed(&mut self, id: impl Into<SectionId>, reason: impl Into<String>) {
        self.reasons.insert(id.into(), reason.into());
    }

    /// Returns the number of completed sections.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reasons.len()
    }

    /// Returns true if no section is marked complete.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reasons.is_empty()
    }
}

impl SkipPredicate for CompletedSet {
    fn skip_reason(&self, section: &SectionId) -> Option<String> {
        self.reasons.get(section).cloned()
    }
}
