//! Configuration management for the job screener
//!
//! Every reference vocabulary the engine matches against lives here so it can
//! be swapped by editing `config.toml` instead of recompiling.

use crate::error::{Result, ScreenerError};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub parser: ParserConfig,
    pub scoring: ScoringConfig,
    pub scam: ScamConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Reference skill vocabulary, in display casing. Output order follows this list.
    pub skills: Vec<String>,
    pub senior_terms: Vec<String>,
    pub junior_terms: Vec<String>,
    pub remote_terms: Vec<String>,
    pub equity_terms: Vec<String>,
    /// Section headings that open the preferred-skills region. A heading is the
    /// whole line, optionally followed by `:` and an inline list.
    pub preferred_markers: Vec<String>,
    /// Section headings that open (or reopen) the required-skills region.
    /// Preferred headings only take effect after one of these.
    pub required_markers: Vec<String>,
    pub max_keywords: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub remote_resume_terms: Vec<String>,
    pub equity_resume_terms: Vec<String>,
    pub weights: ScoringWeights,
    /// Allocation used instead of `weights` when candidate projects are supplied.
    pub project_weights: ScoringWeights,
}

/// Point allocation per match factor. Must total exactly 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub required_skills: u32,
    pub experience: u32,
    pub keywords: u32,
    pub seniority: u32,
    pub remote_bonus: u32,
    pub equity_bonus: u32,
    #[serde(default)]
    pub projects: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScamConfig {
    pub free_email_domains: Vec<String>,
    pub contact_terms: Vec<String>,
    pub payment_phrases: Vec<String>,
    pub salary_terms: Vec<String>,
    pub unrealistic_amounts: Vec<String>,
    pub lure_phrases: Vec<String>,
    pub easy_money_phrases: Vec<String>,
    pub min_company_len: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    pub detailed: bool,
    pub color_output: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Console,
    Json,
    Markdown,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            skills: strings(&[
                "Python",
                "JavaScript",
                "TypeScript",
                "React",
                "Node.js",
                "FastAPI",
                "Django",
                "Flask",
                "PostgreSQL",
                "MySQL",
                "MongoDB",
                "Redis",
                "SQL",
                "AWS",
                "Azure",
                "GCP",
                "Docker",
                "Kubernetes",
                "Terraform",
                "Git",
                "Java",
                "Golang",
                "Rust",
                "C++",
                "GraphQL",
                "Machine Learning",
                "LangChain",
                "LLM",
            ]),
            senior_terms: strings(&["senior", "lead", "principal", "staff"]),
            junior_terms: strings(&["junior", "entry", "associate"]),
            remote_terms: strings(&["remote"]),
            equity_terms: strings(&["equity", "stock"]),
            preferred_markers: strings(&[
                "preferred",
                "nice to have",
                "nice-to-have",
                "bonus points",
                "desired",
            ]),
            required_markers: strings(&[
                "requirements",
                "required",
                "required qualifications",
                "must have",
                "must-have",
            ]),
            max_keywords: 10,
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            remote_resume_terms: strings(&["remote"]),
            equity_resume_terms: strings(&["startup", "equity", "founder"]),
            weights: ScoringWeights::default(),
            project_weights: ScoringWeights::with_projects(),
        }
    }
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            required_skills: 40,
            experience: 20,
            keywords: 20,
            seniority: 10,
            remote_bonus: 5,
            equity_bonus: 5,
            projects: 0,
        }
    }
}

impl ScoringWeights {
    /// Allocation that carves ten points out of skills and experience for project alignment.
    pub fn with_projects() -> Self {
        Self {
            required_skills: 35,
            experience: 15,
            keywords: 20,
            seniority: 10,
            remote_bonus: 5,
            equity_bonus: 5,
            projects: 10,
        }
    }

    fn parts(&self) -> [u32; 7] {
        [
            self.required_skills,
            self.experience,
            self.keywords,
            self.seniority,
            self.remote_bonus,
            self.equity_bonus,
            self.projects,
        ]
    }

    /// Sum of all factor weights. Widened so hostile config values cannot overflow.
    pub fn total(&self) -> u64 {
        self.parts().iter().map(|&w| u64::from(w)).sum()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(weight) = self.parts().into_iter().find(|&w| w > 100) {
            return Err(ScreenerError::InvalidInput(format!(
                "scoring weight {} exceeds 100",
                weight
            )));
        }
        let total = self.total();
        if total == 100 {
            Ok(())
        } else {
            Err(ScreenerError::InvalidInput(format!(
                "scoring weights must sum to 100, got {}",
                total
            )))
        }
    }
}

impl ScoringConfig {
    /// Both allocations must total 100, and the default one cannot reserve
    /// points for projects since it only applies when none are supplied.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.project_weights.validate()?;
        if self.weights.projects != 0 {
            return Err(ScreenerError::InvalidInput(format!(
                "weights.projects must be 0 outside the project allocation, got {}",
                self.weights.projects
            )));
        }
        Ok(())
    }
}

impl Default for ScamConfig {
    fn default() -> Self {
        Self {
            free_email_domains: strings(&[
                "gmail.com",
                "yahoo.com",
                "hotmail.com",
                "outlook.com",
                "protonmail.com",
            ]),
            contact_terms: strings(&["contact"]),
            payment_phrases: strings(&[
                "payment upfront",
                "wire transfer",
                "western union",
                "pay fee",
                "processing fee",
                "training fee",
                "background check fee",
            ]),
            salary_terms: strings(&["salary"]),
            unrealistic_amounts: strings(&["million", "500k", "1000k"]),
            lure_phrases: strings(&["work from home", "no experience", "guaranteed income"]),
            easy_money_phrases: strings(&["easy money", "quick cash", "earn thousands"]),
            min_company_len: 3,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Console,
            detailed: false,
            color_output: true,
        }
    }
}

impl Config {
    /// Load from the default location, writing defaults there on first run.
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            warn!(
                "No configuration at {}, writing defaults",
                config_path.display()
            );
            let config = Self::default();
            config.save()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.scoring
            .validate()
            .map_err(|e| ScreenerError::Configuration(format!("scoring: {}", e)))?;
        if self.parser.max_keywords == 0 {
            return Err(ScreenerError::Configuration(
                "parser.max_keywords must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")))
            .join("job-screener")
            .join("config.toml")
    }
}
