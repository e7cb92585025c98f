//! CLI interface for the job screener

use crate::config::OutputFormat;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "job-screener")]
#[command(about = "Parse job descriptions, score resume fit and flag scam postings")]
#[command(long_about = "Deterministic job screening: vocabulary-driven job description parsing, multi-factor resume matching and rule-based scam detection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (overrides the configured default)
    #[arg(short, long, global = true, value_enum)]
    pub format: Option<FormatArg>,

    /// Save the rendered report to a file
    #[arg(short, long, global = true)]
    pub save: Option<PathBuf>,

    /// Show matched and missing items for every factor
    #[arg(short, long, global = true)]
    pub detailed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Console,
    Json,
    #[value(alias = "md")]
    Markdown,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Console => OutputFormat::Console,
            FormatArg::Json => OutputFormat::Json,
            FormatArg::Markdown => OutputFormat::Markdown,
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract structured requirements from a job description
    Parse {
        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,
    },

    /// Score a resume against a job description
    Score {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// JSON array of candidate projects
        #[arg(short, long)]
        projects: Option<PathBuf>,
    },

    /// Check a job posting for scam indicators
    Scam {
        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Company name as listed on the posting
        #[arg(long)]
        company: Option<String>,

        /// Contact or application text listed with the posting
        #[arg(long)]
        contact: Option<String>,
    },

    /// Parse, score and scam-check in one pass
    Assess {
        /// Path to resume file (PDF, TXT, MD)
        #[arg(short, long)]
        resume: PathBuf,

        /// Path to job description file (TXT, MD, PDF)
        #[arg(short, long)]
        job: PathBuf,

        /// Company name as listed on the posting
        #[arg(long)]
        company: Option<String>,

        /// Contact or application text listed with the posting
        #[arg(long)]
        contact: Option<String>,

        /// JSON array of candidate projects
        #[arg(short, long)]
        projects: Option<PathBuf>,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset configuration to defaults
    Reset,

    /// Print the configuration file location
    Path,
}

/// Validate file extension
pub fn validate_file_extension(path: &Path, allowed_extensions: &[&str]) -> Result<(), String> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => {
            if allowed_extensions.contains(&ext.to_lowercase().as_str()) {
                Ok(())
            } else {
                Err(format!(
                    "Unsupported file extension: .{}. Allowed: {}",
                    ext,
                    allowed_extensions.join(", ")
                ))
            }
        }
        None => Err("File has no extension".to_string()),
    }
}
