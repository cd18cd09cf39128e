//! Run reports: per-section records, typed report variants, and the builder
//! that accumulates and persists them.

mod builder;
mod record;

pub use builder::{ConvertReport, DownloadReport, PipelineKind, Report, ReportBuilder};
pub use record::{SectionStart, SectionStatus};
