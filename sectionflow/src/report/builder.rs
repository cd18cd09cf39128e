//! Report accumulation and persistence.

use super::{SectionStart, SectionStatus};
use crate::error_chain::ErrorChain;
use crate::errors::{ReportError, SectionflowError};
use crate::identity::SectionId;
use crate::utils::now_utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// The closed set of pipeline kinds reports exist for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    /// A conversion pipeline.
    Convert,
    /// A download pipeline.
    Download,
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Convert => write!(f, "convert"),
            Self::Download => write!(f, "download"),
        }
    }
}

/// Report of a conversion pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertReport {
    /// One record per executed section, in execution order.
    pub section_starts: Vec<SectionStart>,
}

/// Report of a download pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DownloadReport {
    /// One record per executed section, in execution order.
    pub section_starts: Vec<SectionStart>,
}

/// A finished run report, one variant per pipeline kind.
///
/// Both variants serialize to the same `{"section_starts": [...]}` shape;
/// the variant keeps convert and download reports distinct in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Report {
    /// Report of a conversion pipeline.
    Convert(ConvertReport),
    /// Report of a download pipeline.
    Download(DownloadReport),
}

impl Report {
    /// Returns the pipeline kind this report belongs to.
    #[must_use]
    pub fn kind(&self) -> PipelineKind {
        match self {
            Self::Convert(_) => PipelineKind::Convert,
            Self::Download(_) => PipelineKind::Download,
        }
    }

    /// Returns the accumulated section records.
    #[must_use]
    pub fn section_starts(&self) -> &[SectionStart] {
        match self {
            Self::Convert(report) => &report.section_starts,
            Self::Download(report) => &report.section_starts,
        }
    }
}

/// Accumulates [`SectionStart`] records during a run and assembles the
/// final [`Report`].
///
/// The builder exclusively owns the record list; sections mutate their own
/// record through the finalize operations, never the aggregate.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    kind: PipelineKind,
    section_starts: Vec<SectionStart>,
}

impl ReportBuilder {
    /// Creates a builder for the given pipeline kind.
    #[must_use]
    pub fn new(kind: PipelineKind) -> Self {
        Self {
            kind,
            section_starts: Vec::new(),
        }
    }

    /// Returns the pipeline kind.
    #[must_use]
    pub fn kind(&self) -> PipelineKind {
        self.kind
    }

    /// Appends a record; one per executed section, in execution order.
    pub fn register(&mut self, section_start: SectionStart) {
        self.section_starts.push(section_start);
    }

    /// Returns the record for `section`, if one was registered.
    #[must_use]
    pub fn find_section_start(&self, section: &SectionId) -> Option<&SectionStart> {
        self.section_starts
            .iter()
            .find(|record| &record.section_id == section)
    }

    /// Returns the number of registered records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.section_starts.len()
    }

    /// Returns true if no record was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.section_starts.is_empty()
    }

    // Ids are only unique among siblings, so the same id can appear under
    // different parents. Execution is strictly sequential and a section
    // registers before it finalizes, so the running section's record is
    // always the newest match.
    fn get_section_start_mut(
        &mut self,
        section: &SectionId,
    ) -> Result<&mut SectionStart, ReportError> {
        self.section_starts
            .iter_mut()
            .rev()
            .find(|record| &record.section_id == section)
            .ok_or_else(|| ReportError::SectionNotRegistered(section.clone()))
    }

    /// Finalizes a section's record as successful.
    pub fn finalize_success(
        &mut self,
        section: &SectionId,
        duration_seconds: f64,
    ) -> Result<(), ReportError> {
        let end_time = now_utc();
        let record = self.get_section_start_mut(section)?;
        record.mark_success(end_time, duration_seconds);
        Ok(())
    }

    /// Finalizes a section's record as failed with its cause chain.
    pub fn finalize_failure(
        &mut self,
        section: &SectionId,
        duration_seconds: f64,
        error: ErrorChain,
    ) -> Result<(), ReportError> {
        let end_time = now_utc();
        let record = self.get_section_start_mut(section)?;
        record.mark_failed(end_time, duration_seconds, error);
        Ok(())
    }

    /// Returns how many records carry the given status.
    #[must_use]
    pub fn count_with_status(&self, status: SectionStatus) -> usize {
        self.section_starts
            .iter()
            .filter(|record| record.status == status)
            .count()
    }

    /// Assembles the typed report from the accumulated records.
    #[must_use]
    pub fn get_report(&self) -> Report {
        let section_starts = self.section_starts.clone();
        match self.kind {
            PipelineKind::Convert => Report::Convert(ConvertReport { section_starts }),
            PipelineKind::Download => Report::Download(DownloadReport { section_starts }),
        }
    }

    /// Serializes the report to pretty JSON and writes it to `path` in one
    /// operation. I/O and serialization failures propagate.
    pub fn save_report(&self, path: &Path) -> Result<(), SectionflowError> {
        let report = self.get_report();
        let bytes = serde_json::to_vec_pretty(&report)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::SectionPath;
    use pretty_assertions::assert_eq;

    fn pending(id: &str) -> SectionStart {
        SectionStart::pending(SectionId::new(id), SectionPath::root(), now_utc())
    }

    #[test]
    fn test_register_preserves_order() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);
        builder.register(pending("a"));
        builder.register(pending("b"));

        let report = builder.get_report();
        let ids: Vec<&str> = report
            .section_starts()
            .iter()
            .map(|r| r.section_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(report.kind(), PipelineKind::Convert);
    }

    #[test]
    fn test_find_section_start() {
        let mut builder = ReportBuilder::new(PipelineKind::Download);
        builder.register(pending("a"));

        assert!(builder.find_section_start(&SectionId::new("a")).is_some());
        assert!(builder.find_section_start(&SectionId::new("b")).is_none());
    }

    #[test]
    fn test_finalize_unregistered_is_programming_error() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);

        let err = builder
            .finalize_success(&SectionId::new("ghost"), 0.0)
            .unwrap_err();
        assert_eq!(
            err,
            ReportError::SectionNotRegistered(SectionId::new("ghost"))
        );
    }

    #[test]
    fn test_finalize_success_updates_record() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);
        builder.register(pending("a"));
        builder.finalize_success(&SectionId::new("a"), 1.5).unwrap();

        let record = builder.find_section_start(&SectionId::new("a")).unwrap();
        assert_eq!(record.status, SectionStatus::Success);
        assert_eq!(record.duration_seconds, Some(1.5));
        assert!(record.end_time.unwrap() >= record.start_time);
        assert_eq!(builder.count_with_status(SectionStatus::Success), 1);
        assert_eq!(builder.count_with_status(SectionStatus::Failed), 0);
    }

    #[test]
    fn test_finalize_targets_newest_record_for_repeated_id() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);
        builder.register(SectionStart::pending(
            SectionId::new("shared"),
            SectionPath::from_segments(["download"]),
            now_utc(),
        ));
        builder.finalize_success(&SectionId::new("shared"), 0.1).unwrap();
        builder.register(SectionStart::pending(
            SectionId::new("shared"),
            SectionPath::from_segments(["convert"]),
            now_utc(),
        ));
        builder.finalize_success(&SectionId::new("shared"), 0.2).unwrap();

        let report = builder.get_report();
        let records = report.section_starts();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].duration_seconds, Some(0.1));
        assert_eq!(records[1].duration_seconds, Some(0.2));
        assert_eq!(builder.count_with_status(SectionStatus::Success), 2);
    }

    #[test]
    fn test_finalize_failure_keeps_chain() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);
        builder.register(pending("b"));

        let chain = ErrorChain::from_anyhow(&anyhow::anyhow!("boom"));
        builder
            .finalize_failure(&SectionId::new("b"), 0.2, chain)
            .unwrap();

        let record = builder.find_section_start(&SectionId::new("b")).unwrap();
        assert_eq!(record.status, SectionStatus::Failed);
        assert_eq!(record.error.as_ref().unwrap().frames()[0].message, "boom");
    }

    #[test]
    fn test_download_report_same_shape() {
        let mut builder = ReportBuilder::new(PipelineKind::Download);
        builder.register(pending("a"));

        let json = serde_json::to_value(&builder.get_report()).unwrap();
        assert!(json.get("section_starts").is_some());
    }

    #[test]
    fn test_report_round_trip() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);
        builder.register(pending("a"));
        builder.register(pending("b"));
        builder.finalize_success(&SectionId::new("a"), 0.5).unwrap();
        builder
            .finalize_failure(
                &SectionId::new("b"),
                0.1,
                ErrorChain::from_anyhow(&anyhow::anyhow!("boom")),
            )
            .unwrap();

        let report = builder.get_report();
        let json = serde_json::to_string(&report).unwrap();
        let back: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(back.section_starts().len(), 2);
        assert_eq!(back.section_starts()[0].section_id, SectionId::new("a"));
        assert_eq!(back.section_starts()[1].status, SectionStatus::Failed);
        assert_eq!(
            back.section_starts()[1].error.as_ref().unwrap().len(),
            report.section_starts()[1].error.as_ref().unwrap().len()
        );
    }

    #[test]
    fn test_save_report_writes_json_file() {
        let mut builder = ReportBuilder::new(PipelineKind::Convert);
        builder.register(pending("a"));
        builder.finalize_success(&SectionId::new("a"), 0.5).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        builder.save_report(&path).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(json["section_starts"][0]["section_id"], "a");
        assert_eq!(json["section_starts"][0]["status"], "success");
    }
}
