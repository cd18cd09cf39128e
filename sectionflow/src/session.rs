//! Scoped session resources for section execution.
//!
//! A session (storage handle, network client, ...) is acquired once per
//! non-skipped section and released when the section finishes, regardless
//! of outcome. Release is guaranteed through a drop guard.

use crate::identity::SectionId;

/// A resource handle scoped to a single section's execution.
///
/// Implementations must make `release` idempotent: the guard may call it
/// after an explicit release.
pub trait Session: Send {
    /// Releases the underlying resource.
    fn release(&mut self);
}

/// Creates one [`Session`] per non-skipped section.
///
/// Sessions are never shared across sections.
pub trait SessionFactory: Send + Sync {
    /// Creates a session for the given section.
    fn create_session(&self, section: &SectionId) -> anyhow::Result<Box<dyn Session>>;
}

/// Guard that releases the wrapped session on every exit path.
pub struct SessionGuard {
    session: Box<dyn Session>,
}

impl SessionGuard {
    /// Wraps a session in a guard.
    #[must_use]
    pub fn new(session: Box<dyn Session>) -> Self {
        Self { session }
    }

    /// Returns the guarded session.
    pub fn session_mut(&mut self) -> &mut dyn Session {
        self.session.as_mut()
    }

    /// Releases the session now instead of at scope exit.
    pub fn release(self) {
        drop(self);
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.session.release();
    }
}

impl std::fmt::Debug for SessionGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionGuard").finish_non_exhaustive()
    }
}

/// A session with no underlying resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSession;

impl Session for NullSession {
    fn release(&mut self) {}
}

/// Factory producing [`NullSession`]s; the default when sections need no
/// shared resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSessionFactory;

impl SessionFactory for NullSessionFactory {
    fn create_session(&self, _section: &SectionId) -> anyhow::Result<Box<dyn Session>> {
        Ok(Box::new(NullSession))
    }
}
