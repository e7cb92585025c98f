//! Job description parsing into a structured, immutable record

use crate::config::ParserConfig;
use crate::error::Result;
use crate::processing::vocabulary::PhraseSet;
use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Matches "5 years", "5+ years" or "10 year", case-insensitive. Capture 1 is the count.
static YEARS_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\+?\s*years?").expect("Invalid years regex"));

static CAPITALIZED_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b[A-Z][a-z]+\b").expect("Invalid capitalized word regex"));

static DEFAULT_PARSER: LazyLock<JdParser> = LazyLock::new(JdParser::default);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seniority {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl Seniority {
    /// The literal the match scorer looks for in a resume.
    pub fn label(&self) -> &'static str {
        match self {
            Seniority::Junior => "junior",
            Seniority::Mid => "mid",
            Seniority::Senior => "senior",
        }
    }
}

impl fmt::Display for Seniority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobFlags {
    pub is_remote: bool,
    pub has_equity: bool,
}

/// Structured view of one job posting. Skill lists keep vocabulary casing and
/// vocabulary order; keywords keep first-occurrence order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedJobDescription {
    /// Persisted as `skills`.
    #[serde(default, rename = "skills", alias = "required_skills")]
    pub required_skills: Vec<String>,
    #[serde(default)]
    pub preferred_skills: Vec<String>,
    #[serde(default)]
    pub seniority: Seniority,
    #[serde(default)]
    pub years_required: Option<u32>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub flags: JobFlags,
}

/// Which list a line of the posting feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Unheaded,
    Required,
    Preferred,
}

/// Vocabulary-driven job description parser. Stateless once built.
#[derive(Debug, Clone)]
pub struct JdParser {
    skills: PhraseSet,
    senior_terms: PhraseSet,
    junior_terms: PhraseSet,
    remote_terms: PhraseSet,
    equity_terms: PhraseSet,
    preferred_markers: Vec<String>,
    required_markers: Vec<String>,
    max_keywords: usize,
}

impl JdParser {
    pub fn new(config: &ParserConfig) -> Result<Self> {
        Ok(Self {
            skills: PhraseSet::new(&config.skills)?,
            senior_terms: PhraseSet::new(&config.senior_terms)?,
            junior_terms: PhraseSet::new(&config.junior_terms)?,
            remote_terms: PhraseSet::new(&config.remote_terms)?,
            equity_terms: PhraseSet::new(&config.equity_terms)?,
            preferred_markers: normalize_markers(&config.preferred_markers),
            required_markers: normalize_markers(&config.required_markers),
            max_keywords: config.max_keywords,
        })
    }

    /// Parse raw posting text. Never fails: missing signals fall back to
    /// `Mid` seniority, empty skill lists and no years requirement.
    pub fn parse(&self, raw_text: &str) -> ParsedJobDescription {
        let normalized = raw_text.to_lowercase();

        let (required_region, preferred_region) = self.split_sections(&normalized);

        let required_idx = self.skills.matched_indices(&required_region);
        let preferred_idx: Vec<usize> = self
            .skills
            .matched_indices(&preferred_region)
            .into_iter()
            .filter(|idx| !required_idx.contains(idx))
            .collect();

        let entries = self.skills.entries();
        let required_skills = required_idx.iter().map(|&i| entries[i].clone()).collect();
        let preferred_skills = preferred_idx.iter().map(|&i| entries[i].clone()).collect();

        let seniority = if self.senior_terms.contains_any(&normalized) {
            Seniority::Senior
        } else if self.junior_terms.contains_any(&normalized) {
            Seniority::Junior
        } else {
            Seniority::Mid
        };

        let parsed = ParsedJobDescription {
            required_skills,
            preferred_skills,
            seniority,
            years_required: first_years_mention(raw_text),
            keywords: self.extract_keywords(raw_text),
            flags: JobFlags {
                is_remote: self.remote_terms.contains_any(&normalized),
                has_equity: self.equity_terms.contains_any(&normalized),
            },
        };

        debug!(
            "Parsed job description: {} required, {} preferred, seniority {}, years {:?}",
            parsed.required_skills.len(),
            parsed.preferred_skills.len(),
            parsed.seniority,
            parsed.years_required
        );

        parsed
    }

    /// Split the lower-cased text into required and preferred regions by
    /// section headings. A preferred heading only counts once a required
    /// heading has been seen, and a later required heading closes it again.
    fn split_sections(&self, normalized: &str) -> (String, String) {
        let mut required = String::with_capacity(normalized.len());
        let mut preferred = String::new();
        let mut section = Section::Unheaded;

        for line in normalized.split_inclusive('\n') {
            if is_heading(line, &self.required_markers) {
                section = Section::Required;
            } else if section != Section::Unheaded && is_heading(line, &self.preferred_markers) {
                section = Section::Preferred;
            }

            match section {
                Section::Preferred => preferred.push_str(line),
                Section::Unheaded | Section::Required => required.push_str(line),
            }
        }

        (required, preferred)
    }

    fn extract_keywords(&self, raw_text: &str) -> Vec<String> {
        let mut keywords: Vec<String> = Vec::new();

        for mat in CAPITALIZED_WORD.find_iter(raw_text) {
            if keywords.len() >= self.max_keywords {
                break;
            }
            let word = mat.as_str();
            if !keywords.iter().any(|k| k == word) {
                keywords.push(word.to_string());
            }
        }

        keywords
    }
}

impl Default for JdParser {
    fn default() -> Self {
        Self::new(&ParserConfig::default()).expect("Failed to create default JD parser")
    }
}

fn normalize_markers(markers: &[String]) -> Vec<String> {
    markers
        .iter()
        .map(|m| m.trim().to_lowercase())
        .filter(|m| !m.is_empty())
        .collect()
}

/// A heading is a bullet-stripped line that is exactly a marker, optionally
/// followed by `:` and inline content. "preferred location: nyc" is not one.
fn is_heading(line: &str, markers: &[String]) -> bool {
    let body = line
        .trim_start_matches(|c: char| c.is_whitespace() || matches!(c, '-' | '*' | '#' | '•'))
        .trim_end();
    markers.iter().any(|marker| match body.strip_prefix(marker.as_str()) {
        Some(rest) => {
            let rest = rest.trim_start();
            rest.is_empty() || rest.starts_with(':')
        }
        None => false,
    })
}

/// Parse with the built-in reference vocabulary.
pub fn parse_job_description(raw_text: &str) -> ParsedJobDescription {
    DEFAULT_PARSER.parse(raw_text)
}

/// Count from the first "N years" / "N+ years" mention.
pub fn first_years_mention(text: &str) -> Option<u32> {
    YEARS_PATTERN
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

/// Largest count across every "N years" / "N+ years" mention.
pub fn max_years_mentioned(text: &str) -> Option<u32> {
    YEARS_PATTERN
        .captures_iter(text)
        .filter_map(|caps| caps[1].parse::<u32>().ok())
        .max()
}

/// Memoizes parses by SHA-256 of the raw text. Owned by one caller; the
/// parser itself holds no state.
#[derive(Debug, Default)]
pub struct ParseCache {
    entries: HashMap<[u8; 32], ParsedJobDescription>,
}

impl ParseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn parse(&mut self, parser: &JdParser, raw_text: &str) -> &ParsedJobDescription {
        let key = Self::content_key(raw_text);
        if self.entries.contains_key(&key) {
            debug!("Parse cache hit");
        }
        self.entries
            .entry(key)
            .or_insert_with(|| parser.parse(raw_text))
    }

    pub fn content_key(raw_text: &str) -> [u8; 32] {
        Sha256::digest(raw_text.as_bytes()).into()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
