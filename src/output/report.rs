//! Report structures shared by every output format

use crate::processing::assessment::JobAssessment;
use crate::processing::jd_parser::ParsedJobDescription;
use crate::processing::match_scorer::MatchResult;
use crate::processing::scam_detector::ScamVerdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One rendered command result plus the metadata printed around it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub metadata: ReportMetadata,
    #[serde(flatten)]
    pub body: ReportBody,
}

/// Which engine operation produced the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportBody {
    Parsed(ParsedJobDescription),
    Match {
        parsed: ParsedJobDescription,
        result: MatchResult,
    },
    Scam(ScamVerdict),
    Assessment(JobAssessment),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub screener_version: String,
    pub job_file: String,
    /// Absent for commands that never read a resume.
    pub resume_file: Option<String>,
    pub company: Option<String>,
    pub processing_time_ms: u64,
}

impl ReportMetadata {
    pub fn new(job_file: impl Into<String>) -> Self {
        Self {
            generated_at: Utc::now(),
            screener_version: env!("CARGO_PKG_VERSION").to_string(),
            job_file: job_file.into(),
            resume_file: None,
            company: None,
            processing_time_ms: 0,
        }
    }

    pub fn with_resume(mut self, resume_file: impl Into<String>) -> Self {
        self.resume_file = Some(resume_file.into());
        self
    }

    pub fn with_company(mut self, company: Option<String>) -> Self {
        self.company = company;
        self
    }

    pub fn with_processing_time(mut self, processing_time_ms: u64) -> Self {
        self.processing_time_ms = processing_time_ms;
        self
    }
}

impl ScreeningReport {
    pub fn new(body: ReportBody, metadata: ReportMetadata) -> Self {
        Self { metadata, body }
    }

    /// Title used for headings in every format.
    pub fn title(&self) -> &'static str {
        match self.body {
            ReportBody::Parsed(_) => "Parsed Job Description",
            ReportBody::Match { .. } => "Resume Match",
            ReportBody::Scam(_) => "Scam Check",
            ReportBody::Assessment(_) => "Job Assessment",
        }
    }

    pub fn parsed(&self) -> Option<&ParsedJobDescription> {
        match &self.body {
            ReportBody::Parsed(parsed) => Some(parsed),
            ReportBody::Match { parsed, .. } => Some(parsed),
            ReportBody::Assessment(assessment) => Some(&assessment.parsed_data),
            ReportBody::Scam(_) => None,
        }
    }

    pub fn match_result(&self) -> Option<MatchResult> {
        match &self.body {
            ReportBody::Match { result, .. } => Some(result.clone()),
            ReportBody::Assessment(assessment) => Some(assessment.match_result()),
            _ => None,
        }
    }

    pub fn scam_verdict(&self) -> Option<ScamVerdict> {
        match &self.body {
            ReportBody::Scam(verdict) => Some(verdict.clone()),
            ReportBody::Assessment(assessment) => Some(assessment.scam_verdict()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::scam_detector::{detect_scam, JobRecord};

    #[test]
    fn test_scam_report_exposes_only_verdict() {
        let verdict = detect_scam(&JobRecord::new("wire transfer").with_company("Acme"));
        let report =
            ScreeningReport::new(ReportBody::Scam(verdict), ReportMetadata::new("job.txt"));

        assert_eq!(report.title(), "Scam Check");
        assert!(report.parsed().is_none());
        assert!(report.match_result().is_none());
        assert_eq!(report.scam_verdict().map(|v| v.score), Some(40));
    }

    #[test]
    fn test_report_json_is_keyed_by_body_kind() {
        let report = ScreeningReport::new(
            ReportBody::Parsed(ParsedJobDescription::default()),
            ReportMetadata::new("job.md").with_resume("cv.pdf"),
        );
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["metadata"]["job_file"], "job.md");
        assert_eq!(json["metadata"]["resume_file"], "cv.pdf");
        assert_eq!(json["parsed"]["seniority"], "mid");
    }
}
