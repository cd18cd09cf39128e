//! Observability for pipeline runs.
//!
//! The runner never logs through a process-wide singleton; it is handed an
//! [`EventSink`] whose lifecycle is scoped to one run.

mod sink;

pub use sink::{EventSink, LoggingEventSink, NoOpEventSink};

/// Installs a `tracing` subscriber reading `RUST_LOG` from the environment.
///
/// For binaries and tests that want console output. Calling it more than
/// once is harmless; later calls are ignored.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}
