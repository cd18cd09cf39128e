//! Event sink trait and implementations.

use tracing::{debug, info, Level};

/// Receives run events (`section.started`, `section.failed`, ...).
///
/// A side channel only: the report contract does not depend on what a sink
/// does with an event.
pub trait EventSink: Send + Sync {
    /// Emits an event without blocking.
    ///
    /// This method must never fail; implementations swallow their own errors.
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>);
}

/// A no-op event sink that discards all events.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpEventSink;

impl EventSink for NoOpEventSink {
    fn try_emit(&self, _event_type: &str, _data: Option<serde_json::Value>) {
        // Intentionally empty - discards all events
    }
}

/// An event sink that logs events using the tracing framework.
#[derive(Debug, Clone)]
pub struct LoggingEventSink {
    /// The log level to use.
    level: Level,
}

impl Default for LoggingEventSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingEventSink {
    /// Creates a new logging event sink with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    /// Creates an info-level logging sink.
    #[must_use]
    pub fn info() -> Self {
        Self::new(Level::INFO)
    }
}

impl EventSink for LoggingEventSink {
    fn try_emit(&self, event_type: &str, data: Option<serde_json::Value>) {
        if self.level == Level::DEBUG {
            debug!(
                event_type = %event_type,
                event_data = ?data,
                "Event: {}", event_type
            );
        } else {
            info!(
                event_type = %event_type,
                event_data = ?data,
                "Event: {}", event_type
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_sink_accepts_events() {
        let sink = NoOpEventSink;
        sink.try_emit("section.started", None);
        sink.try_emit("section.failed", Some(serde_json::json!({"section": "a"})));
    }

    #[test]
    fn test_logging_sink_levels() {
        let sink = LoggingEventSink::debug();
        sink.try_emit("section.started", None);

        let sink = LoggingEventSink::info();
        sink.try_emit("section.completed", Some(serde_json::json!({"duration_seconds": 0.1})));
    }
}
