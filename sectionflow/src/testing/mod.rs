//! Testing utilities for sectionflow pipelines.
//!
//! Mock steps, sessions and an execution log for asserting on what a run
//! actually did.

mod mocks;

pub use mocks::{
    ExecutionLog, FailingStep, RecordingSessionFactory, RecordingStep, StepFailure,
};
