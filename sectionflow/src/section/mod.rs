//! Sections: the schedulable units of pipeline work.
//!
//! A [`Section`] pairs identity with the run's failure and resume policy and
//! owns the execution contract: skip check, guaranteed-release execution,
//! and finalization of its own report record. The tree walk lives in
//! [`SectionRunner`].

mod runner;

pub use runner::{RunOptions, SectionNode, SectionRunner};

use crate::error_chain::ErrorChain;
use crate::errors::SectionflowError;
use crate::identity::{SectionId, SectionPath};
use crate::observability::EventSink;
use crate::report::{ReportBuilder, SectionStart};
use crate::session::{Session, SessionFactory, SessionGuard};
use crate::skip::SkipPredicate;
use crate::utils::now_utc;
use async_trait::async_trait;
use std::fmt::Debug;
use std::time::Instant;
use tracing::{debug, error};

/// The step logic of one section.
///
/// Steps receive the section they run under and a session scoped to this
/// execution. They fail with `anyhow::Error` so arbitrary cause chains
/// survive into the report.
#[async_trait]
pub trait SectionStep: Send + Sync + Debug {
    /// Executes the step.
    async fn run(
        &self,
        section: &Section,
        session: &mut dyn Session,
    ) -> anyhow::Result<()>;
}

/// A step backed by a plain function.
pub struct FnStep<F>
where
    F: Fn(&Section) -> anyhow::Result<()> + Send + Sync,
{
    func: F,
}

impl<F> FnStep<F>
where
    F: Fn(&Section) -> anyhow::Result<()> + Send + Sync,
{
    /// Creates a new function-based step.
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

impl<F> Debug for FnStep<F>
where
    F: Fn(&Section) -> anyhow::Result<()> + Send + Sync,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnStep").finish_non_exhaustive()
    }
}

#[async_trait]
impl<F> SectionStep for FnStep<F>
where
    F: Fn(&Section) -> anyhow::Result<()> + Send + Sync,
{
    async fn run(
        &self,
        section: &Section,
        _session: &mut dyn Session,
    ) -> anyhow::Result<()> {
        (self.func)(section)
    }
}

/// Terminal outcome of one executed section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionOutcome {
    /// The step returned normally.
    Success,
    /// The step failed and the run continues (`fail_fast` off).
    Failed,
}

/// One schedulable unit of the pipeline.
///
/// Per section the states are `Pending -> Running -> {Success, Failed}` on
/// the execute path, or `Pending -> Skipped` without entering Running.
#[derive(Debug, Clone)]
pub struct Section {
    /// Unique id among this section's siblings.
    pub id: SectionId,
    /// Ancestor ids from the root down to this section's parent.
    pub parent_path: SectionPath,
    /// Whether the first failure aborts the whole run.
    pub fail_fast: bool,
    /// Whether known-complete sections are skipped.
    pub resume_mode: bool,
}

impl Section {
    /// Creates a section with both run flags off.
    #[must_use]
    pub fn new(id: impl Into<SectionId>, parent_path: SectionPath) -> Self {
        Self {
            id: id.into(),
            parent_path,
            fail_fast: false,
            resume_mode: false,
        }
    }

    /// Sets the fail-fast flag.
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Sets the resume-mode flag.
    #[must_use]
    pub fn with_resume_mode(mut self, resume_mode: bool) -> Self {
        self.resume_mode = resume_mode;
        self
    }

    /// Returns `parent_path/id` for log lines.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        self.parent_path.qualify(&self.id)
    }

    /// Returns the skip reason for this section, if any.
    ///
    /// Always `None` outside resume mode; otherwise the external predicate
    /// decides. A returned reason is logged at DEBUG.
    #[must_use]
    pub fn skip_reason(&self, predicate: &dyn SkipPredicate) -> Option<String> {
        if !self.resume_mode {
            return None;
        }
        let reason = predicate.skip_reason(&self.id)?;
        debug!(
            section = %self.qualified_name(),
            reason = %reason,
            "section skipped"
        );
        Some(reason)
    }

    /// Returns true if this section should be skipped.
    #[must_use]
    pub fn is_skipped(&self, predicate: &dyn SkipPredicate) -> bool {
        self.skip_reason(predicate).is_some()
    }

    /// Guaranteed-release execution block.
    ///
    /// Registers this section's [`SectionStart`], acquires a session, starts
    /// a timer and invokes the step. On success the record is finalized as
    /// Success with elapsed duration. On failure with `fail_fast` the session
    /// is released and the original error propagates, aborting the run; the
    /// record is left Pending. On failure without `fail_fast` the record is
    /// finalized as Failed with the flattened cause chain, the failure is
    /// logged with section path and duration, and the error is swallowed.
    ///
    /// The session is released on every exit path.
    pub async fn run(
        &self,
        step: &dyn SectionStep,
        sessions: &dyn SessionFactory,
        report: &mut ReportBuilder,
        sink: &dyn EventSink,
    ) -> Result<SectionOutcome, SectionflowError> {
        let qualified = self.qualified_name();

        report.register(SectionStart::pending(
            self.id.clone(),
            self.parent_path.clone(),
            now_utc(),
        ));
        sink.try_emit(
            "section.started",
            Some(serde_json::json!({ "section": qualified })),
        );

        // Acquire first, then time: the duration covers the step, not
        // session setup.
        let (result, duration_seconds) = match sessions.create_session(&self.id) {
            Ok(session) => {
                let mut guard = SessionGuard::new(session);
                let timer = Instant::now();
                let result = step.run(self, guard.session_mut()).await;
                (result, timer.elapsed().as_secs_f64())
                // guard drops here, releasing the session
            }
            Err(err) => (
                Err(err.context(format!("creating session for section '{}'", self.id))),
                0.0,
            ),
        };

        match result {
            Ok(()) => {
                report.finalize_success(&self.id, duration_seconds)?;
                sink.try_emit(
                    "section.completed",
                    Some(serde_json::json!({
                        "section": qualified,
                        "duration_seconds": duration_seconds,
                    })),
                );
                debug!(section = %qualified, duration_seconds, "section completed");
                Ok(SectionOutcome::Success)
            }
            Err(err) => {
                sink.try_emit(
                    "section.failed",
                    Some(serde_json::json!({
                        "section": qualified,
                        "duration_seconds": duration_seconds,
                        "error": err.to_string(),
                    })),
                );

                if self.fail_fast {
                    return Err(SectionflowError::section_failed(self.id.clone(), err));
                }

                let chain = ErrorChain::from_anyhow(&err);
                report.finalize_failure(&self.id, duration_seconds, chain)?;
                error!(
                    section = %qualified,
                    duration_seconds,
                    error = %format!("{err:#}"),
                    "section failed; continuing with next section"
                );
                Ok(SectionOutcome::Failed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skip::{CompletedSet, NeverSkip};

    fn section(id: &str) -> Section {
        Section::new(id, SectionPath::root())
    }

    #[test]
    fn test_qualified_name() {
        let root = section("fetch");
        assert_eq!(root.qualified_name(), "fetch");

        let nested = Section::new("images", SectionPath::from_segments(["convert"]));
        assert_eq!(nested.qualified_name(), "convert/images");
    }

    #[test]
    fn test_not_skipped_outside_resume_mode() {
        let completed = CompletedSet::new().with_completed("a", "done");
        let section = section("a");

        // resume_mode off: the predicate is never consulted
        assert!(!section.is_skipped(&completed));
    }

    #[test]
    fn test_skipped_in_resume_mode() {
        let completed = CompletedSet::new().with_completed("a", "done");

        let section = section("a").with_resume_mode(true);
        assert!(section.is_skipped(&completed));
        assert_eq!(section.skip_reason(&completed), Some("done".to_string()));

        let other = Section::new("b", SectionPath::root()).with_resume_mode(true);
        assert!(!other.is_skipped(&completed));
    }

    #[test]
    fn test_never_skip_predicate() {
        let section = section("a").with_resume_mode(true);
        assert!(!section.is_skipped(&NeverSkip));
    }
}
