//! Resume to job description match scoring
//!
//! Every factor owns a slice of a 100-point budget (see [`ScoringWeights`]).
//! A factor's subscore is clamped to its weight, the clamped subscores are
//! summed, and the sum is floored and clamped to `0..=100`.

use crate::config::{ScoringConfig, ScoringWeights};
use crate::error::Result;
use crate::processing::jd_parser::{max_years_mentioned, ParsedJobDescription};
use crate::processing::vocabulary::PhraseSet;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

static DEFAULT_SCORER: LazyLock<MatchScorer> = LazyLock::new(MatchScorer::default);

/// Absorbs float error such as 19.999999999999996 before flooring.
const SCORE_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Factor {
    RequiredSkills,
    Experience,
    Keywords,
    Seniority,
    Bonus,
    Projects,
    /// Informational: always weight 0.
    PreferredSkills,
}

impl fmt::Display for Factor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Factor::RequiredSkills => "Required skills",
            Factor::Experience => "Experience",
            Factor::Keywords => "Keywords",
            Factor::Seniority => "Seniority",
            Factor::Bonus => "Remote/equity bonus",
            Factor::Projects => "Project alignment",
            Factor::PreferredSkills => "Preferred skills",
        };
        f.write_str(name)
    }
}

/// Explainable contribution of one factor.
///
/// For [`Factor::Experience`], `possible` holds the required years and
/// `matched` the largest years figure found in the resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactorScore {
    pub matched: Vec<String>,
    pub possible: Vec<String>,
    pub weight: u32,
    pub subscore: f64,
}

impl FactorScore {
    pub fn missing(&self) -> Vec<&str> {
        self.possible
            .iter()
            .filter(|p| !self.matched.contains(p))
            .map(String::as_str)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub total_score: u32,
    pub breakdown: BTreeMap<Factor, FactorScore>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    StrongMatch,
    GoodMatch,
    WeakMatch,
    PoorMatch,
}

impl Recommendation {
    pub fn from_score(score: u32) -> Self {
        if score >= 80 {
            Recommendation::StrongMatch
        } else if score >= 60 {
            Recommendation::GoodMatch
        } else if score >= 40 {
            Recommendation::WeakMatch
        } else {
            Recommendation::PoorMatch
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Recommendation::StrongMatch => "strong_match",
            Recommendation::GoodMatch => "good_match",
            Recommendation::WeakMatch => "weak_match",
            Recommendation::PoorMatch => "poor_match",
        }
    }
}

impl fmt::Display for Recommendation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl MatchResult {
    /// Subscore of `factor`, or 0 when the factor was not scored.
    pub fn subscore(&self, factor: Factor) -> f64 {
        self.breakdown.get(&factor).map_or(0.0, |f| f.subscore)
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_score(self.total_score)
    }

    pub fn improvement_suggestions(&self) -> Vec<String> {
        let mut suggestions = Vec::new();

        if let Some(skills) = self.breakdown.get(&Factor::RequiredSkills) {
            for skill in skills.missing().into_iter().take(5) {
                suggestions.push(format!("Add concrete evidence of {} experience", skill));
            }
        }

        if let Some(experience) = self.breakdown.get(&Factor::Experience) {
            if experience.subscore < experience.weight as f64 {
                if let Some(required) = experience.possible.first() {
                    suggestions.push(format!(
                        "State at least {} years of relevant experience",
                        required
                    ));
                }
            }
        }

        if let Some(seniority) = self.breakdown.get(&Factor::Seniority) {
            if seniority.weight > 0 && seniority.matched.is_empty() {
                if let Some(label) = seniority.possible.first() {
                    suggestions.push(format!("Describe your {}-level scope explicitly", label));
                }
            }
        }

        suggestions
    }
}

/// A candidate project used by the optional project-alignment factor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "tech_stack")]
    pub technologies: Vec<String>,
}

impl ProjectSummary {
    fn normalized_text(&self) -> String {
        let mut text = String::with_capacity(
            self.name.len() + self.description.len() + self.technologies.len() * 12,
        );
        text.push_str(&self.name.to_lowercase());
        text.push('\n');
        text.push_str(&self.description.to_lowercase());
        for tech in &self.technologies {
            text.push('\n');
            text.push_str(&tech.to_lowercase());
        }
        text
    }
}

/// Deterministic multi-factor scorer. Holds only immutable configuration.
#[derive(Debug, Clone)]
pub struct MatchScorer {
    weights: ScoringWeights,
    project_weights: ScoringWeights,
    remote_terms: PhraseSet,
    equity_terms: PhraseSet,
}

impl MatchScorer {
    pub fn new(config: &ScoringConfig) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            weights: config.weights,
            project_weights: config.project_weights,
            remote_terms: PhraseSet::new(&config.remote_resume_terms)?,
            equity_terms: PhraseSet::new(&config.equity_resume_terms)?,
        })
    }

    /// Weight allocation that applies for the given project list.
    pub fn weights_for(&self, projects: Option<&[ProjectSummary]>) -> &ScoringWeights {
        match projects {
            Some(p) if !p.is_empty() => &self.project_weights,
            _ => &self.weights,
        }
    }

    pub fn score(
        &self,
        resume_text: &str,
        jd: &ParsedJobDescription,
        projects: Option<&[ProjectSummary]>,
    ) -> MatchResult {
        let resume_lower = resume_text.to_lowercase();
        let projects = projects.filter(|p| !p.is_empty());
        let weights = self.weights_for(projects);

        let mut breakdown = BTreeMap::new();

        breakdown.insert(
            Factor::RequiredSkills,
            required_skills_factor(&resume_lower, jd, weights.required_skills),
        );

        if let Some(required) = jd.years_required {
            breakdown.insert(
                Factor::Experience,
                experience_factor(resume_text, required, weights.experience),
            );
        }

        breakdown.insert(
            Factor::Keywords,
            keyword_factor(&resume_lower, jd, weights.keywords),
        );

        breakdown.insert(
            Factor::Seniority,
            seniority_factor(&resume_lower, jd, weights.seniority),
        );

        breakdown.insert(Factor::Bonus, self.bonus_factor(&resume_lower, jd, weights));

        if let Some(projects) = projects {
            breakdown.insert(
                Factor::Projects,
                project_factor(projects, jd, weights.projects),
            );
        }

        if !jd.preferred_skills.is_empty() {
            let (matched, _) = partition_present(&jd.preferred_skills, &resume_lower);
            breakdown.insert(
                Factor::PreferredSkills,
                FactorScore {
                    matched,
                    possible: jd.preferred_skills.clone(),
                    weight: 0,
                    subscore: 0.0,
                },
            );
        }

        let mut sum = 0.0;
        for (factor, entry) in breakdown.iter_mut() {
            entry.subscore = entry.subscore.clamp(0.0, entry.weight as f64);
            sum += entry.subscore;
            debug!(
                "{}: {:.2}/{} ({} of {} matched)",
                factor,
                entry.subscore,
                entry.weight,
                entry.matched.len(),
                entry.possible.len()
            );
        }

        let total_score = ((sum + SCORE_EPSILON).floor() as u32).min(100);
        debug!("Match score: {}", total_score);

        MatchResult {
            total_score,
            breakdown,
        }
    }

    fn bonus_factor(
        &self,
        resume_lower: &str,
        jd: &ParsedJobDescription,
        weights: &ScoringWeights,
    ) -> FactorScore {
        let mut matched = Vec::new();
        let mut possible = Vec::new();
        let mut subscore = 0.0;

        if jd.flags.is_remote {
            possible.push("remote".to_string());
            if self.remote_terms.contains_any(resume_lower) {
                matched.push("remote".to_string());
                subscore += weights.remote_bonus as f64;
            }
        }

        if jd.flags.has_equity {
            possible.push("equity".to_string());
            if self.equity_terms.contains_any(resume_lower) {
                matched.push("equity".to_string());
                subscore += weights.equity_bonus as f64;
            }
        }

        FactorScore {
            matched,
            possible,
            weight: weights.remote_bonus + weights.equity_bonus,
            subscore,
        }
    }
}

impl Default for MatchScorer {
    fn default() -> Self {
        Self::new(&ScoringConfig::default()).expect("Failed to create default match scorer")
    }
}

/// Score with the reference weights and resume vocabularies.
pub fn compute_match_score(
    resume_text: &str,
    jd: &ParsedJobDescription,
    projects: Option<&[ProjectSummary]>,
) -> MatchResult {
    DEFAULT_SCORER.score(resume_text, jd, projects)
}

fn partition_present(items: &[String], haystack_lower: &str) -> (Vec<String>, Vec<String>) {
    items
        .iter()
        .cloned()
        .partition(|item| haystack_lower.contains(&item.to_lowercase()))
}

/// No stated requirements earns the full weight: skills cannot be a blocker.
fn required_skills_factor(
    resume_lower: &str,
    jd: &ParsedJobDescription,
    weight: u32,
) -> FactorScore {
    let (matched, _) = partition_present(&jd.required_skills, resume_lower);
    let total = jd.required_skills.len() as u32;

    let subscore = if total == 0 {
        weight
    } else {
        weight * matched.len() as u32 / total
    };

    FactorScore {
        matched,
        possible: jd.required_skills.clone(),
        weight,
        subscore: subscore as f64,
    }
}

fn experience_factor(resume_text: &str, required: u32, weight: u32) -> FactorScore {
    let resume_years = max_years_mentioned(resume_text);

    let subscore = match resume_years {
        Some(years) if years >= required => weight as f64,
        Some(years) => weight as f64 * years as f64 / required as f64,
        None => 0.0,
    };

    FactorScore {
        matched: resume_years.map(|y| y.to_string()).into_iter().collect(),
        possible: vec![required.to_string()],
        weight,
        subscore,
    }
}

fn keyword_factor(resume_lower: &str, jd: &ParsedJobDescription, weight: u32) -> FactorScore {
    let (matched, _) = partition_present(&jd.keywords, resume_lower);

    let subscore = if jd.keywords.is_empty() {
        0.0
    } else {
        weight as f64 * matched.len() as f64 / jd.keywords.len() as f64
    };

    FactorScore {
        matched,
        possible: jd.keywords.clone(),
        weight,
        subscore,
    }
}

fn seniority_factor(resume_lower: &str, jd: &ParsedJobDescription, weight: u32) -> FactorScore {
    let label = jd.seniority.label();
    let hit = resume_lower.contains(label);

    FactorScore {
        matched: if hit { vec![label.to_string()] } else { Vec::new() },
        possible: vec![label.to_string()],
        weight,
        subscore: if hit { weight as f64 } else { 0.0 },
    }
}

/// Required skills evidenced by at least one project's name, description or stack.
fn project_factor(
    projects: &[ProjectSummary],
    jd: &ParsedJobDescription,
    weight: u32,
) -> FactorScore {
    let corpora: Vec<String> = projects.iter().map(ProjectSummary::normalized_text).collect();

    let matched: Vec<String> = jd
        .required_skills
        .iter()
        .filter(|skill| {
            let needle = skill.to_lowercase();
            corpora.iter().any(|text| text.contains(&needle))
        })
        .cloned()
        .collect();

    let subscore = if jd.required_skills.is_empty() {
        0.0
    } else {
        weight as f64 * matched.len() as f64 / jd.required_skills.len() as f64
    };

    FactorScore {
        matched,
        possible: jd.required_skills.clone(),
        weight,
        subscore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::jd_parser::{JobFlags, Seniority};

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn jd_with_skills(skills: &[&str]) -> ParsedJobDescription {
        ParsedJobDescription {
            required_skills: strings(skills),
            ..ParsedJobDescription::default()
        }
    }

    #[test]
    fn test_no_requirements_gets_full_skill_weight() {
        let jd = ParsedJobDescription::default();
        for resume in ["", "nothing relevant", "Python Rust Go"] {
            let result = compute_match_score(resume, &jd, None);
            assert_eq!(result.subscore(Factor::RequiredSkills), 40.0);
        }
    }

    #[test]
    fn test_full_skill_match_scores_forty() {
        let jd = jd_with_skills(&["Python", "FastAPI", "PostgreSQL"]);
        let resume = "Backend developer: Python, FastAPI and PostgreSQL in production.";

        let result = compute_match_score(resume, &jd, None);
        assert_eq!(result.subscore(Factor::RequiredSkills), 40.0);
        assert_eq!(result.subscore(Factor::Experience), 0.0);
        assert_eq!(result.subscore(Factor::Keywords), 0.0);
        assert_eq!(result.total_score, 40);
        assert!(result.breakdown[&Factor::RequiredSkills].missing().is_empty());
    }

    #[test]
    fn test_partial_skill_match_rounds_toward_zero() {
        let jd = jd_with_skills(&["Python", "FastAPI", "PostgreSQL"]);
        let result = compute_match_score("python and fastapi", &jd, None);

        // 40 * 2 / 3 = 26.67 -> 26
        assert_eq!(result.subscore(Factor::RequiredSkills), 26.0);
        assert_eq!(
            result.breakdown[&Factor::RequiredSkills].missing(),
            vec!["PostgreSQL"]
        );
    }

    #[test]
    fn test_experience_factor() {
        let jd = ParsedJobDescription {
            years_required: Some(5),
            ..ParsedJobDescription::default()
        };

        let short = compute_match_score("3 years of Python", &jd, None);
        assert_eq!(short.subscore(Factor::Experience), 12.0);
        assert_eq!(short.breakdown[&Factor::Experience].matched, vec!["3"]);
        assert_eq!(short.breakdown[&Factor::Experience].possible, vec!["5"]);

        let long = compute_match_score("1 year at A, 7+ years at B", &jd, None);
        assert_eq!(long.subscore(Factor::Experience), 20.0);

        let none = compute_match_score("lots of experience", &jd, None);
        assert_eq!(none.subscore(Factor::Experience), 0.0);
        assert!(none.breakdown[&Factor::Experience].matched.is_empty());
    }

    #[test]
    fn test_experience_omitted_without_requirement() {
        let jd = ParsedJobDescription::default();
        let result = compute_match_score("10 years of everything", &jd, None);
        assert!(!result.breakdown.contains_key(&Factor::Experience));
    }

    #[test]
    fn test_zero_years_required_needs_a_resume_figure() {
        let jd = ParsedJobDescription {
            years_required: Some(0),
            ..ParsedJobDescription::default()
        };
        assert_eq!(
            compute_match_score("0 years", &jd, None).subscore(Factor::Experience),
            20.0
        );
        assert_eq!(
            compute_match_score("fresh graduate", &jd, None).subscore(Factor::Experience),
            0.0
        );
    }

    #[test]
    fn test_keyword_density() {
        let jd = ParsedJobDescription {
            keywords: strings(&["Acme", "Payments", "Ledger", "Kafka"]),
            ..ParsedJobDescription::default()
        };
        let result = compute_match_score("Built Kafka pipelines at ACME", &jd, None);
        assert_eq!(result.subscore(Factor::Keywords), 10.0);
        assert_eq!(
            result.breakdown[&Factor::Keywords].matched,
            vec!["Acme", "Kafka"]
        );
    }

    #[test]
    fn test_seniority_term() {
        let jd = ParsedJobDescription {
            seniority: Seniority::Senior,
            ..ParsedJobDescription::default()
        };
        assert_eq!(
            compute_match_score("Senior engineer", &jd, None).subscore(Factor::Seniority),
            10.0
        );
        assert_eq!(
            compute_match_score("Engineer", &jd, None).subscore(Factor::Seniority),
            0.0
        );
    }

    #[test]
    fn test_bonus_requires_jd_flag_and_resume_term() {
        let both = ParsedJobDescription {
            flags: JobFlags {
                is_remote: true,
                has_equity: true,
            },
            ..ParsedJobDescription::default()
        };
        let full = compute_match_score("Remote-first startup veteran", &both, None);
        assert_eq!(full.subscore(Factor::Bonus), 10.0);

        let remote_only = compute_match_score("Worked remote", &both, None);
        assert_eq!(remote_only.subscore(Factor::Bonus), 5.0);

        let no_flags = ParsedJobDescription::default();
        let none = compute_match_score("Remote founder", &no_flags, None);
        assert_eq!(none.subscore(Factor::Bonus), 0.0);
        assert!(none.breakdown[&Factor::Bonus].possible.is_empty());
    }

    #[test]
    fn test_perfect_candidate_scores_exactly_100() {
        let jd = ParsedJobDescription {
            required_skills: strings(&["Python"]),
            preferred_skills: vec![],
            seniority: Seniority::Senior,
            years_required: Some(3),
            keywords: strings(&["Acme"]),
            flags: JobFlags {
                is_remote: true,
                has_equity: true,
            },
        };
        let resume = "Senior Python engineer at Acme, 5 years, fully remote, startup founder";

        let result = compute_match_score(resume, &jd, None);
        assert_eq!(result.total_score, 100);
        assert_eq!(result.recommendation(), Recommendation::StrongMatch);
        assert!(result.improvement_suggestions().is_empty());
    }

    #[test]
    fn test_total_is_bounded() {
        let jd = ParsedJobDescription {
            required_skills: strings(&["Python", "Go"]),
            years_required: Some(1),
            keywords: strings(&["Go"]),
            ..ParsedJobDescription::default()
        };
        for resume in ["", "go python 100 years mid remote", "\u{0}\u{ffff}"] {
            let result = compute_match_score(resume, &jd, None);
            assert!(result.total_score <= 100);
            for entry in result.breakdown.values() {
                assert!(entry.subscore >= 0.0);
                assert!(entry.subscore <= entry.weight as f64);
            }
        }
    }

    #[test]
    fn test_projects_switch_allocation() {
        let jd = jd_with_skills(&["Python", "Docker"]);
        let projects = vec![ProjectSummary {
            name: "Deploy kit".to_string(),
            description: "Container tooling".to_string(),
            technologies: strings(&["Docker"]),
        }];

        let result = compute_match_score("Python and Docker", &jd, Some(projects.as_slice()));
        assert_eq!(result.breakdown[&Factor::RequiredSkills].weight, 35);
        assert_eq!(result.subscore(Factor::RequiredSkills), 35.0);
        assert_eq!(result.subscore(Factor::Projects), 5.0);
        assert_eq!(result.breakdown[&Factor::Projects].matched, vec!["Docker"]);
        assert_eq!(result.total_score, 40);
    }

    #[test]
    fn test_empty_project_list_uses_default_allocation() {
        let jd = jd_with_skills(&["Python"]);
        let result = compute_match_score("Python", &jd, Some(&[][..]));
        assert_eq!(result.breakdown[&Factor::RequiredSkills].weight, 40);
        assert!(!result.breakdown.contains_key(&Factor::Projects));
    }

    #[test]
    fn test_preferred_skills_are_informational() {
        let jd = ParsedJobDescription {
            preferred_skills: strings(&["Kubernetes", "Terraform"]),
            ..ParsedJobDescription::default()
        };
        let result = compute_match_score("Kubernetes operator", &jd, None);
        let preferred = &result.breakdown[&Factor::PreferredSkills];
        assert_eq!(preferred.weight, 0);
        assert_eq!(preferred.subscore, 0.0);
        assert_eq!(preferred.matched, vec!["Kubernetes"]);
        // Only the empty-requirements benefit of the doubt counts.
        assert_eq!(result.total_score, 40);
    }

    #[test]
    fn test_improvement_suggestions() {
        let jd = ParsedJobDescription {
            required_skills: strings(&["Python", "Rust"]),
            seniority: Seniority::Senior,
            years_required: Some(5),
            ..ParsedJobDescription::default()
        };
        let result = compute_match_score("Python, 2 years", &jd, None);
        let suggestions = result.improvement_suggestions();

        assert_eq!(suggestions.len(), 3);
        assert!(suggestions[0].contains("Rust"));
        assert!(suggestions[1].contains("5 years"));
        assert!(suggestions[2].contains("senior"));
    }

    #[test]
    fn test_recommendation_thresholds() {
        assert_eq!(Recommendation::from_score(100), Recommendation::StrongMatch);
        assert_eq!(Recommendation::from_score(80), Recommendation::StrongMatch);
        assert_eq!(Recommendation::from_score(79), Recommendation::GoodMatch);
        assert_eq!(Recommendation::from_score(60), Recommendation::GoodMatch);
        assert_eq!(Recommendation::from_score(40), Recommendation::WeakMatch);
        assert_eq!(Recommendation::from_score(39), Recommendation::PoorMatch);
        assert_eq!(Recommendation::from_score(0).to_string(), "poor_match");
    }

    #[test]
    fn test_unbalanced_weights_rejected() {
        let config = ScoringConfig {
            weights: ScoringWeights {
                keywords: 30,
                ..ScoringWeights::default()
            },
            ..ScoringConfig::default()
        };
        assert!(MatchScorer::new(&config).is_err());
    }

    #[test]
    fn test_score_is_idempotent() {
        let jd = jd_with_skills(&["Python", "SQL"]);
        let a = compute_match_score("Python, 4 years", &jd, None);
        let b = compute_match_score("Python, 4 years", &jd, None);
        assert_eq!(a, b);
    }

    #[test]
    fn test_breakdown_serializes_with_snake_case_keys() {
        let result = compute_match_score("", &ParsedJobDescription::default(), None);
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["breakdown"]["required_skills"].is_object());
        assert_eq!(json["total_score"], 40);
    }
}
