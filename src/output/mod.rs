//! Report rendering for the command-line surface

pub mod formatter;
pub mod report;

pub use formatter::{save_report_to_file, OutputFormatter, ReportGenerator};
pub use report::{ReportBody, ReportMetadata, ScreeningReport};
