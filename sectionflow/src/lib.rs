//! # Sectionflow
//!
//! A sectioned pipeline execution and reporting engine.
//!
//! Sectionflow runs a named tree of "sections" (units of fetch/convert work)
//! and produces a structured report of every executed section:
//!
//! - **Section tree execution**: Depth-first, left-to-right, one section at a time
//! - **Resume semantics**: Sections known to be complete are skipped via a pluggable predicate
//! - **Failure isolation**: Log-and-continue or abort-immediately, per `fail_fast`
//! - **Guaranteed resource release**: A scoped session is released on every exit path
//! - **Structured reporting**: Serializable per-section records with full error cause chains
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use sectionflow::prelude::*;
//!
//! // Declare the section tree
//! let tree = vec![
//!     SectionNode::new("fetch", fetch_step.clone()),
//!     SectionNode::new("convert", convert_step.clone())
//!         .with_child(SectionNode::new("images", image_step.clone())),
//! ];
//!
//! // Run it and save the report
//! let mut report = ReportBuilder::new(PipelineKind::Convert);
//! let runner = SectionRunner::new("docs", RunOptions::default());
//! runner.run(&tree, &mut report).await?;
//! report.save_report("report.json".as_ref())?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod error_chain;
pub mod errors;
pub mod identity;
pub mod observability;
pub mod report;
pub mod section;
pub mod session;
pub mod skip;
pub mod testing;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error_chain::{ErrorChain, ErrorChainBuilder, ErrorFrame};
    pub use crate::errors::{ReportError, SectionflowError};
    pub use crate::identity::{RunIdentity, SectionId, SectionPath};
    pub use crate::observability::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::report::{
        ConvertReport, DownloadReport, PipelineKind, Report, ReportBuilder,
        SectionStart, SectionStatus,
    };
    pub use crate::section::{
        FnStep, RunOptions, Section, SectionNode, SectionOutcome, SectionRunner,
        SectionStep,
    };
    pub use crate::session::{
        NullSession, NullSessionFactory, Session, SessionFactory, SessionGuard,
    };
    pub use crate::skip::{CompletedSet, NeverSkip, SkipPredicate};
    pub use crate::utils::{format_iso8601, now_utc, Timestamp};
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn prelude_exposes_core_types() {
        let id = SectionId::new("fetch");
        let path = SectionPath::root().child(&id);
        assert_eq!(path.to_string(), "fetch");

        let report = ReportBuilder::new(PipelineKind::Convert);
        assert!(report.is_empty());
    }
}
