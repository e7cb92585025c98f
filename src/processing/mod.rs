//! Job description parsing, match scoring and scam detection

pub mod assessment;
pub mod jd_parser;
pub mod match_scorer;
pub mod scam_detector;
pub mod vocabulary;

pub use assessment::{JobAssessment, Screener};
pub use jd_parser::{parse_job_description, JdParser, ParseCache, ParsedJobDescription, Seniority};
pub use match_scorer::{
    compute_match_score, MatchResult, MatchScorer, ProjectSummary, Recommendation,
};
pub use scam_detector::{detect_scam, JobRecord, ScamDetector, ScamVerdict};
