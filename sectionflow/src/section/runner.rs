//! Depth-first section tree execution.

use super::{Section, SectionOutcome, SectionStep};
use crate::errors::SectionflowError;
use crate::identity::{RunIdentity, SectionId, SectionPath};
use crate::observability::{EventSink, NoOpEventSink};
use crate::report::ReportBuilder;
use crate::session::{NullSessionFactory, SessionFactory};
use crate::skip::{NeverSkip, SkipPredicate};
use futures::future::BoxFuture;
use std::sync::Arc;
use tracing::{error, info};

/// One node of the declared section tree.
#[derive(Debug, Clone)]
pub struct SectionNode {
    id: SectionId,
    step: Arc<dyn SectionStep>,
    children: Vec<SectionNode>,
}

impl SectionNode {
    /// Creates a leaf node.
    #[must_use]
    pub fn new(id: impl Into<SectionId>, step: Arc<dyn SectionStep>) -> Self {
        Self {
            id: id.into(),
            step,
            children: Vec::new(),
        }
    }

    /// Appends a child node; children execute left to right.
    #[must_use]
    pub fn with_child(mut self, child: SectionNode) -> Self {
        self.children.push(child);
        self
    }

    /// Appends several children at once.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = SectionNode>) -> Self {
        self.children.extend(children);
        self
    }

    /// Returns the node's section id.
    #[must_use]
    pub fn id(&self) -> &SectionId {
        &self.id
    }

    /// Returns the node's step logic.
    #[must_use]
    pub fn step(&self) -> &dyn SectionStep {
        self.step.as_ref()
    }

    /// Returns the node's children.
    #[must_use]
    pub fn children(&self) -> &[SectionNode] {
        &self.children
    }
}

/// Run-wide flags applied to every section.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Abort the whole run on the first section failure.
    pub fail_fast: bool,
    /// Skip sections the skip predicate reports as complete.
    pub resume_mode: bool,
}

impl RunOptions {
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
}

/// Walks a section tree depth-first, left to right, driving each section's
/// skip decision and execution.
///
/// Sections run strictly one at a time; there is no parallelism across
/// siblings and no early exit other than a `fail_fast` failure propagating
/// out of the whole run.
pub struct SectionRunner {
    identity: RunIdentity,
    options: RunOptions,
    sessions: Arc<dyn SessionFactory>,
    skip: Arc<dyn SkipPredicate>,
    sink: Arc<dyn EventSink>,
}

impl SectionRunner {
    /// Creates a runner with a no-resource session factory, a never-skipping
    /// predicate and a silent event sink.
    #[must_use]
    pub fn new(pipeline: impl Into<String>, options: RunOptions) -> Self {
        Self {
            identity: RunIdentity::new(pipeline),
            options,
            sessions: Arc::new(NullSessionFactory),
            skip: Arc::new(NeverSkip),
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the session factory.
    #[must_use]
    pub fn with_session_factory(mut self, sessions: Arc<dyn SessionFactory>) -> Self {
        self.sessions = sessions;
        self
    }

    /// Sets the skip predicate.
    #[must_use]
    pub fn with_skip_predicate(mut self, skip: Arc<dyn SkipPredicate>) -> Self {
        self.skip = skip;
        self
    }

    /// Sets the event sink; its lifecycle is this run, not the process.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Returns the run identity used for log correlation.
    #[must_use]
    pub fn identity(&self) -> &RunIdentity {
        &self.identity
    }

    /// Returns the run options.
    #[must_use]
    pub fn options(&self) -> RunOptions {
        self.options
    }

    /// Runs the whole tree, registering every executed section's record
    /// with `report`.
    ///
    /// With `fail_fast` set, the first section failure propagates and the
    /// remaining sections never execute. Otherwise a failing section is
    /// recorded and the walk continues with its next sibling.
    pub async fn run(
        &self,
        nodes: &[SectionNode],
        report: &mut ReportBuilder,
    ) -> Result<(), SectionflowError> {
        info!(
            run_id = %self.identity.run_id,
            pipeline = %self.identity.pipeline,
            kind = %report.kind(),
            "pipeline run started"
        );

        let result = self.run_level(nodes, SectionPath::root(), report).await;

        match &result {
            Ok(()) => info!(
                run_id = %self.identity.run_id,
                sections = report.len(),
                "pipeline run finished"
            ),
            Err(err) => error!(
                run_id = %self.identity.run_id,
                error = %err,
                "pipeline run aborted"
            ),
        }
        result
    }

    fn run_level<'a>(
        &'a self,
        nodes: &'a [SectionNode],
        parent: SectionPath,
        report: &'a mut ReportBuilder,
    ) -> BoxFuture<'a, Result<(), SectionflowError>> {
        Box::pin(async move {
            for node in nodes {
                let section = Section::new(node.id().clone(), parent.clone())
                    .with_fail_fast(self.options.fail_fast)
                    .with_resume_mode(self.options.resume_mode);

                if let Some(reason) = section.skip_reason(self.skip.as_ref()) {
                    self.sink.try_emit(
                        "section.skipped",
                        Some(serde_json::json!({
                            "section": section.qualified_name(),
                            "reason": reason,
                        })),
                    );
                    // A complete parent implies its children: skip the subtree.
                    continue;
                }

                let outcome = section
                    .run(
                        node.step(),
                        self.sessions.as_ref(),
                        &mut *report,
                        self.sink.as_ref(),
                    )
                    .await?;

                // A failed section's subtree is not entered; the walk moves
                // on to the next sibling.
                if outcome == SectionOutcome::Success && !node.children().is_empty() {
                    self.run_level(node.children(), parent.child(node.id()), &mut *report)
                        .await?;
                }
            }
            Ok(())
        })
    }
}

impl std::fmt::Debug for SectionRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectionRunner")
            .field("identity", &self.identity)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
