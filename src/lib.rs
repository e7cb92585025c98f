//! Job screener library
//!
//! Vocabulary-driven job description parsing, multi-factor resume matching
//! and rule-based scam detection. Every engine operation is pure and
//! deterministic; file and terminal I/O stay in `input` and `output`.

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod processing;

pub use config::Config;
pub use error::{Result, ScreenerError};
pub use processing::{
    compute_match_score, detect_scam, parse_job_description, JobAssessment, JobRecord,
    ParsedJobDescription, Screener,
};
