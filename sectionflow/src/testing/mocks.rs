//! Mock steps and sessions for testing.

use crate::identity::SectionId;
use crate::section::{Section, SectionStep};
use crate::session::{Session, SessionFactory};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use thiserror::Error;

/// Shared, ordered log of what a run did.
#[derive(Debug, Clone, Default)]
pub struct ExecutionLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl ExecutionLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an entry.
    pub fn record(&self, entry: impl Into<String>) {
        self.entries.lock().push(entry.into());
    }

    /// Returns a snapshot of the entries in order.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

/// The error [`FailingStep`] fails with.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct StepFailure {
    /// The failure message.
    pub message: String,
}

/// A step that records its section id and succeeds.
#[derive(Debug)]
pub struct RecordingStep {
    log: ExecutionLog,
}

impl RecordingStep {
    /// Creates a step recording into `log`.
    #[must_use]
    pub fn new(log: ExecutionLog) -> Self {
        Self { log }
    }
}

#[async_trait]
impl SectionStep for RecordingStep {
    async fn run(&self, section: &Section, _session: &mut dyn Session) -> anyhow::Result<()> {
        self.log.record(format!("run:{}", section.id));
        Ok(())
    }
}

/// A step that records its section id and fails.
#[derive(Debug)]
pub struct FailingStep {
    log: ExecutionLog,
    message: String,
}

impl FailingStep {
    /// Creates a step failing with `message`.
    #[must_use]
    pub fn new(log: ExecutionLog, message: impl Into<String>) -> Self {
        Self {
            log,
            message: message.into(),
        }
    }
}

#[async_trait]
impl SectionStep for FailingStep {
    async fn run(&self, section: &Section, _session: &mut dyn Session) -> anyhow::Result<()> {
        self.log.record(format!("run:{}", section.id));
        Err(StepFailure {
            message: self.message.clone(),
        }
        .into())
    }
}

struct RecordingSession {
    section: SectionId,
    log: ExecutionLog,
    released: bool,
}

impl Session for RecordingSession {
    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.log.record(format!("release:{}", self.section));
        }
    }
}

/// Factory whose sessions record acquire and release into a shared log.
#[derive(Debug, Clone, Default)]
pub struct RecordingSessionFactory {
    log: ExecutionLog,
}

impl RecordingSessionFactory {
    /// Creates a factory recording into `log`.
    #[must_use]
    pub fn new(log: ExecutionLog) -> Self {
        Self { log }
    }
}

impl SessionFactory for RecordingSessionFactory {
    fn create_session(&self, section: &SectionId) -> anyhow::Result<Box<dyn Session>> {
        self.log.record(format!("acquire:{section}"));
        Ok(Box::new(RecordingSession {
            section: section.clone(),
            log: self.log.clone(),
            released: false,
        }))
    }
}
