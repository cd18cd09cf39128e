//! Identity primitives for sections and runs.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique string identifier of a section among its siblings.
///
/// Opaque and immutable; equality and hashing follow the underlying string.
/// Serializes as a plain JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionId(String);

impl SectionId {
    /// Creates a new section id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the underlying string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SectionId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Ordered ancestor ids locating a section in the tree.
///
/// Runs from the pipeline root down to (but excluding) the section's own id.
/// Serializes as a JSON array of strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SectionPath(Vec<SectionId>);

impl SectionPath {
    /// Returns the empty path of a root-level section.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from id segments.
    #[must_use]
    pub fn from_segments(segments: impl IntoIterator<Item = impl Into<SectionId>>) -> Self {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Returns the path segments.
    #[must_use]
    pub fn segments(&self) -> &[SectionId] {
        &self.0
    }

    /// Returns the path of the children of a section with `id` at this path.
    #[must_use]
    pub fn child(&self, id: &SectionId) -> Self {
        let mut segments = self.0.clone();
        segments.push(id.clone());
        Self(segments)
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `path/id` for log lines.
    #[must_use]
    pub fn qualify(&self, id: &SectionId) -> String {
        if self.0.is_empty() {
            id.to_string()
        } else {
            format!("{self}/{id}")
        }
    }
}

impl fmt::Display for SectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .0
            .iter()
            .map(SectionId::as_str)
            .collect::<Vec<_>>()
            .join("/");
        f.write_str(&joined)
    }
}

/// Identifies one pipeline run for log correlation.
///
/// Attached to the structured log stream only; not part of the report file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunIdentity {
    /// The unique ID for this run.
    pub run_id: Uuid,
    /// The pipeline name.
    pub pipeline: String,
}

impl RunIdentity {
    /// Creates a new run identity with a generated run ID.
    #[must_use]
    pub fn new(pipeline: impl Into<String>) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            pipeline: pipeline.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_id_equality() {
        assert_eq!(SectionId::new("a"), SectionId::from("a"));
        assert_ne!(SectionId::new("a"), SectionId::new("b"));
    }

    #[test]
    fn test_section_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&SectionId::new("fetch")).unwrap();
        assert_eq!(json, r#""fetch""#);
    }

    #[test]
    fn test_section_path_child() {
        let root = SectionPath::root();
        assert!(root.is_empty());

        let path = root.child(&SectionId::new("convert"));
        assert_eq!(path.len(), 1);
        assert_eq!(path.to_string(), "convert");

        let nested = path.child(&SectionId::new("images"));
        assert_eq!(nested.to_string(), "convert/images");
    }

    #[test]
    fn test_section_path_qualify() {
        let id = SectionId::new("images");
        assert_eq!(SectionPath::root().qualify(&id), "images");

        let path = SectionPath::from_segments(["convert"]);
        assert_eq!(path.qualify(&id), "convert/images");
    }

    #[test]
    fn test_section_path_serializes_as_array() {
        let path = SectionPath::from_segments(["a", "b"]);
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r#"["a","b"]"#);

        let back: SectionPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }

    #[test]
    fn test_run_identity_new() {
        let identity = RunIdentity::new("docs");
        assert_eq!(identity.pipeline, "docs");
        assert_ne!(identity.run_id, RunIdentity::new("docs").run_id);
    }
}
