//! Flattening of error cause chains for serialization.
//!
//! A caught error and its chain of causes become an ordered list of
//! `{type, message}` frames, outermost error first, root cause last.

use serde::{Deserialize, Serialize};
use std::error::Error;

/// Maximum number of frames captured from one cause chain.
///
/// Guards against malformed or cyclic cause graphs.
pub const MAX_CHAIN_DEPTH: usize = 50;

/// One link in a flattened cause chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorFrame {
    /// Short label for the error's type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// The error's display message.
    pub message: String,
}

impl ErrorFrame {
    /// Creates a frame from explicit parts.
    #[must_use]
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Creates a frame from an error value.
    #[must_use]
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        Self {
            type_name: type_label(err),
            message: err.to_string(),
        }
    }
}

/// Ordered, serializable flattening of an error and its causes.
///
/// Serializes as a JSON array of `{"type": ..., "message": ...}` records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorChain {
    frames: Vec<ErrorFrame>,
}

impl ErrorChain {
    /// Returns the frames, outermost error first.
    #[must_use]
    pub fn frames(&self) -> &[ErrorFrame] {
        &self.frames
    }

    /// Returns the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Returns true if the chain has no frames.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Flattens an [`anyhow::Error`] and its causes.
    #[must_use]
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut builder = ErrorChainBuilder::new();
        for cause in err.chain() {
            if !builder.push(cause) {
                break;
            }
        }
        builder.build()
    }

    /// Flattens any error by walking its `source()` links.
    #[must_use]
    pub fn from_error(err: &(dyn Error + 'static)) -> Self {
        ErrorChainBuilder::new().walk(err)
    }
}

/// Accumulates [`ErrorFrame`]s up to a depth cap.
#[derive(Debug)]
pub struct ErrorChainBuilder {
    frames: Vec<ErrorFrame>,
    max_depth: usize,
}

impl ErrorChainBuilder {
    /// Creates a builder with the default depth cap.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            max_depth: MAX_CHAIN_DEPTH,
        }
    }

    /// Overrides the depth cap.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Appends a frame for `err`.
    ///
    /// Returns false once the depth cap is reached; the frame is dropped.
    pub fn push(&mut self, err: &(dyn Error + 'static)) -> bool {
        if self.frames.len() >= self.max_depth {
            return false;
        }
        self.frames.push(ErrorFrame::from_error(err));
        true
    }

    /// Walks `err` and its `source()` links into a finished chain.
    #[must_use]
    pub fn walk(mut self, err: &(dyn Error + 'static)) -> ErrorChain {
        let mut current: Option<&(dyn Error + 'static)> = Some(err);
        while let Some(cause) = current {
            if !self.push(cause) {
                break;
            }
            current = cause.source();
        }
        self.build()
    }

    /// Finishes the chain.
    #[must_use]
    pub fn build(self) -> ErrorChain {
        ErrorChain {
            frames: self.frames,
        }
    }
}

impl Default for ErrorChainBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Derives a short type label from an error value.
///
/// Rust erases concrete types behind `dyn Error`, so the label is the leading
/// identifier of the error's `Debug` rendering (struct or enum variant name
/// for derived `Debug` impls), falling back to `"Error"`.
fn type_label(err: &(dyn Error + 'static)) -> String {
    let debug = format!("{err:?}");
    let label: String = debug
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    if label.is_empty() {
        "Error".to_string()
    } else {
        label
    }
}
