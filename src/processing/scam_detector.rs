//! Rule-based scam detection for job postings
//!
//! Rules are independent and additive. They run in a fixed order so the flag
//! list is deterministic, and the summed points are capped at 100.

use crate::config::ScamConfig;
use crate::error::Result;
use crate::processing::vocabulary::PhraseSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

/// Verdicts at or above this score are scams.
pub const SCAM_THRESHOLD: u32 = 50;

static DEFAULT_DETECTOR: LazyLock<ScamDetector> = LazyLock::new(ScamDetector::default);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlagType {
    FreeEmailDomain,
    PaymentRequest,
    UnrealisticCompensation,
    MissingCompany,
    TooGoodToBeTrue,
}

impl FlagType {
    pub fn points(&self) -> u32 {
        match self {
            FlagType::FreeEmailDomain => 30,
            FlagType::PaymentRequest => 40,
            FlagType::UnrealisticCompensation => 20,
            FlagType::MissingCompany => 15,
            FlagType::TooGoodToBeTrue => 25,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlagType::FreeEmailDomain => "free_email_domain",
            FlagType::PaymentRequest => "payment_request",
            FlagType::UnrealisticCompensation => "unrealistic_compensation",
            FlagType::MissingCompany => "missing_company",
            FlagType::TooGoodToBeTrue => "too_good_to_be_true",
        }
    }
}

impl fmt::Display for FlagType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamFlag {
    pub flag_type: FlagType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScamVerdict {
    pub is_scam: bool,
    pub score: u32,
    /// Detection order. Not deduplicated.
    pub flags: Vec<ScamFlag>,
}

impl ScamVerdict {
    /// Flag descriptions joined for the persisted `scam_reason` column.
    pub fn scam_reason(&self) -> Option<String> {
        if self.flags.is_empty() {
            return None;
        }
        Some(
            self.flags
                .iter()
                .map(|f| f.description.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }
}

/// The slice of a job record the detector reads. Absent fields count as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(default, alias = "raw_text")]
    pub description: String,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub contact_text: Option<String>,
}

impl JobRecord {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.company = Some(company.into());
        self
    }

    pub fn with_contact(mut self, contact_text: impl Into<String>) -> Self {
        self.contact_text = Some(contact_text.into());
        self
    }

    /// Lower-cased description, followed by the contact text when present.
    fn scan_text(&self) -> String {
        let mut text = self.description.to_lowercase();
        if let Some(contact) = self.contact_text.as_deref() {
            if !contact.trim().is_empty() {
                text.push('\n');
                text.push_str(&contact.to_lowercase());
            }
        }
        text
    }
}

#[derive(Debug, Clone)]
pub struct ScamDetector {
    free_email_domains: PhraseSet,
    contact_terms: PhraseSet,
    payment_phrases: PhraseSet,
    salary_terms: PhraseSet,
    unrealistic_amounts: PhraseSet,
    lure_phrases: PhraseSet,
    easy_money_phrases: PhraseSet,
    min_company_len: usize,
}

impl ScamDetector {
    pub fn new(config: &ScamConfig) -> Result<Self> {
        Ok(Self {
            free_email_domains: PhraseSet::new(&config.free_email_domains)?,
            contact_terms: PhraseSet::new(&config.contact_terms)?,
            payment_phrases: PhraseSet::new(&config.payment_phrases)?,
            salary_terms: PhraseSet::new(&config.salary_terms)?,
            unrealistic_amounts: PhraseSet::new(&config.unrealistic_amounts)?,
            lure_phrases: PhraseSet::new(&config.lure_phrases)?,
            easy_money_phrases: PhraseSet::new(&config.easy_money_phrases)?,
            min_company_len: config.min_company_len,
        })
    }

    pub fn detect(&self, job: &JobRecord) -> ScamVerdict {
        let text = job.scan_text();
        let mut flags = Vec::new();

        if self.free_email_domains.contains_any(&text) && self.contact_terms.contains_any(&text) {
            flags.push(ScamFlag {
                flag_type: FlagType::FreeEmailDomain,
                description: "Uses free email domain for contact.".to_string(),
            });
        }

        for phrase in self.payment_phrases.matches(&text) {
            flags.push(ScamFlag {
                flag_type: FlagType::PaymentRequest,
                description: format!("Contains suspicious phrase: '{}'", phrase),
            });
        }

        if self.salary_terms.contains_any(&text) && self.unrealistic_amounts.contains_any(&text) {
            flags.push(ScamFlag {
                flag_type: FlagType::UnrealisticCompensation,
                description: "Unrealistic compensation mentioned.".to_string(),
            });
        }

        let company_len = job
            .company
            .as_deref()
            .map_or(0, |c| c.trim().chars().count());
        if company_len < self.min_company_len {
            flags.push(ScamFlag {
                flag_type: FlagType::MissingCompany,
                description: "Company name missing or too short.".to_string(),
            });
        }

        if self.lure_phrases.contains_any(&text) && self.easy_money_phrases.contains_any(&text) {
            flags.push(ScamFlag {
                flag_type: FlagType::TooGoodToBeTrue,
                description: "Too good to be true indicators.".to_string(),
            });
        }

        let raw_score: u32 = flags.iter().map(|f| f.flag_type.points()).sum();
        let score = raw_score.min(100);

        for flag in &flags {
            debug!("Scam rule {} triggered: {}", flag.flag_type, flag.description);
        }
        debug!("Scam score: {} (raw {})", score, raw_score);

        ScamVerdict {
            is_scam: score >= SCAM_THRESHOLD,
            score,
            flags,
        }
    }
}

impl Default for ScamDetector {
    fn default() -> Self {
        Self::new(&ScamConfig::default()).expect("Failed to create default scam detector")
    }
}

/// Detect with the reference phrase lists.
pub fn detect_scam(job: &JobRecord) -> ScamVerdict {
    DEFAULT_DETECTOR.detect(job)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flag_types(verdict: &ScamVerdict) -> Vec<FlagType> {
        verdict.flags.iter().map(|f| f.flag_type).collect()
    }

    #[test]
    fn test_two_payment_phrases_cross_threshold() {
        let job = JobRecord::new("Send a wire transfer to cover the processing fee.")
            .with_company("Acme Corp");
        let verdict = detect_scam(&job);

        assert_eq!(verdict.score, 80);
        assert!(verdict.is_scam);
        assert_eq!(
            flag_types(&verdict),
            vec![FlagType::PaymentRequest, FlagType::PaymentRequest]
        );
        assert!(verdict.flags[0].description.contains("wire transfer"));
        assert!(verdict.flags[1].description.contains("processing fee"));
    }

    #[test]
    fn test_payment_flags_follow_phrase_list_order() {
        let job = JobRecord::new("Processing fee first, then a Wire Transfer.")
            .with_company("Acme Corp");
        let verdict = detect_scam(&job);
        assert!(verdict.flags[0].description.contains("wire transfer"));
        assert!(verdict.flags[1].description.contains("processing fee"));
    }

    #[test]
    fn test_missing_company_alone_is_not_scam() {
        let verdict = detect_scam(&JobRecord::new("Build reliable APIs.").with_company(""));
        assert_eq!(verdict.score, 15);
        assert!(!verdict.is_scam);
        assert_eq!(flag_types(&verdict), vec![FlagType::MissingCompany]);

        let absent = detect_scam(&JobRecord::new("Build reliable APIs."));
        assert_eq!(absent.score, 15);
    }

    #[test]
    fn test_company_length_uses_trimmed_chars() {
        let short = detect_scam(&JobRecord::new("Role").with_company("  AB  "));
        assert_eq!(flag_types(&short), vec![FlagType::MissingCompany]);

        let ok = detect_scam(&JobRecord::new("Role").with_company("IBM"));
        assert!(ok.flags.is_empty());
        assert_eq!(ok.score, 0);

        let unicode = detect_scam(&JobRecord::new("Role").with_company("Üçé"));
        assert!(unicode.flags.is_empty());
    }

    #[test]
    fn test_free_email_requires_contact_word() {
        let with_contact = detect_scam(
            &JobRecord::new("Contact hr.jobs@gmail.com or backup@yahoo.com").with_company("Acme"),
        );
        assert_eq!(with_contact.score, 30);
        assert_eq!(flag_types(&with_contact), vec![FlagType::FreeEmailDomain]);
        assert_eq!(
            with_contact.flags[0].description,
            "Uses free email domain for contact."
        );

        let without =
            detect_scam(&JobRecord::new("Send CV to hr.jobs@gmail.com").with_company("Acme"));
        assert_eq!(without.score, 0);
    }

    #[test]
    fn test_contact_text_is_scanned() {
        let job = JobRecord::new("Use the contact details below.")
            .with_company("Acme")
            .with_contact("Recruiter: jane@outlook.com");
        assert_eq!(flag_types(&detect_scam(&job)), vec![FlagType::FreeEmailDomain]);
    }

    #[test]
    fn test_unrealistic_compensation() {
        let job = JobRecord::new("Salary: 1 million per month").with_company("Acme");
        let verdict = detect_scam(&job);
        assert_eq!(verdict.score, 20);
        assert_eq!(flag_types(&verdict), vec![FlagType::UnrealisticCompensation]);

        let no_salary =
            detect_scam(&JobRecord::new("Serving a million users").with_company("Acme"));
        assert_eq!(no_salary.score, 0);
    }

    #[test]
    fn test_too_good_to_be_true_needs_both_lists() {
        let both = detect_scam(&JobRecord::new("Work from home, easy money!").with_company("Acme"));
        assert_eq!(both.score, 25);

        let lure_only =
            detect_scam(&JobRecord::new("Work from home on Fridays").with_company("Acme"));
        assert_eq!(lure_only.score, 0);
    }

    #[test]
    fn test_flags_follow_rule_order_not_text_order() {
        let job = JobRecord::new(
            "No experience needed, quick cash! Salary 500k. Contact boss@hotmail.com",
        )
        .with_company("Acme");
        let verdict = detect_scam(&job);
        assert_eq!(
            flag_types(&verdict),
            vec![
                FlagType::FreeEmailDomain,
                FlagType::UnrealisticCompensation,
                FlagType::TooGoodToBeTrue,
            ]
        );
        assert_eq!(verdict.score, 75);
        assert!(verdict.is_scam);
    }

    #[test]
    fn test_score_clamped_to_100() {
        let job = JobRecord::new(
            "Contact me at x@gmail.com. Payment upfront via western union, \
             training fee and background check fee apply. Salary one million. \
             Guaranteed income, earn thousands.",
        );
        let verdict = detect_scam(&job);
        assert_eq!(verdict.score, 100);
        assert!(verdict.is_scam);
        // free email + 4 payment phrases + salary + company + too good
        assert_eq!(verdict.flags.len(), 8);
    }

    #[test]
    fn test_clean_posting() {
        let verdict = detect_scam(
            &JobRecord::new("Senior Rust engineer, hybrid, competitive pay")
                .with_company("Ferrous Systems"),
        );
        assert_eq!(verdict.score, 0);
        assert!(!verdict.is_scam);
        assert_eq!(verdict.scam_reason(), None);
    }

    #[test]
    fn test_scam_reason_joins_descriptions() {
        let verdict = detect_scam(&JobRecord::new("pay fee now"));
        assert_eq!(
            verdict.scam_reason().as_deref(),
            Some("Contains suspicious phrase: 'pay fee'; Company name missing or too short.")
        );
    }

    #[test]
    fn test_custom_phrase_list() {
        let config = ScamConfig {
            payment_phrases: vec!["gift card".to_string()],
            ..ScamConfig::default()
        };
        let detector = ScamDetector::new(&config).unwrap();
        let verdict = detector
            .detect(&JobRecord::new("Buy a gift card, then wire transfer").with_company("Acme"));
        assert_eq!(verdict.score, 40);
    }

    #[test]
    fn test_detect_is_idempotent() {
        let job = JobRecord::new("wire transfer").with_company("A");
        assert_eq!(detect_scam(&job), detect_scam(&job));
    }

    #[test]
    fn test_verdict_json_shape() {
        let verdict = detect_scam(&JobRecord::new("western union"));
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["flags"][0]["flag_type"], "payment_request");
        assert_eq!(json["flags"][1]["flag_type"], "missing_company");
        assert_eq!(json["score"], 55);
        assert_eq!(json["is_scam"], true);
    }

    #[test]
    fn test_job_record_accepts_raw_text_alias() {
        let job: JobRecord =
            serde_json::from_str(r#"{"raw_text": "wire transfer", "company": "Acme"}"#).unwrap();
        assert_eq!(job.description, "wire transfer");
        assert_eq!(detect_scam(&job).score, 40);
    }
}
