//! Full per-job assessment: parse, score against a resume, and scam-check

use crate::config::Config;
use crate::error::Result;
use crate::processing::jd_parser::{JdParser, ParseCache, ParsedJobDescription};
use crate::processing::match_scorer::{
    Factor, FactorScore, MatchResult, MatchScorer, ProjectSummary, Recommendation,
};
use crate::processing::scam_detector::{JobRecord, ScamDetector, ScamFlag, ScamVerdict};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fields persisted for each assessed job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobAssessment {
    pub parsed_data: ParsedJobDescription,
    pub match_score: u32,
    pub match_breakdown: BTreeMap<Factor, FactorScore>,
    pub is_scam: bool,
    pub scam_score: u32,
    pub scam_reason: Option<String>,
    #[serde(default)]
    pub scam_flags: Vec<ScamFlag>,
}

impl JobAssessment {
    pub fn from_parts(
        parsed_data: ParsedJobDescription,
        match_result: MatchResult,
        verdict: ScamVerdict,
    ) -> Self {
        let scam_reason = verdict.scam_reason();
        Self {
            parsed_data,
            match_score: match_result.total_score,
            match_breakdown: match_result.breakdown,
            is_scam: verdict.is_scam,
            scam_score: verdict.score,
            scam_reason,
            scam_flags: verdict.flags,
        }
    }

    pub fn match_result(&self) -> MatchResult {
        MatchResult {
            total_score: self.match_score,
            breakdown: self.match_breakdown.clone(),
        }
    }

    pub fn scam_verdict(&self) -> ScamVerdict {
        ScamVerdict {
            is_scam: self.is_scam,
            score: self.scam_score,
            flags: self.scam_flags.clone(),
        }
    }

    pub fn recommendation(&self) -> Recommendation {
        Recommendation::from_score(self.match_score)
    }
}

/// The three engine components bundled behind one configuration.
#[derive(Debug, Clone)]
pub struct Screener {
    parser: JdParser,
    scorer: MatchScorer,
    detector: ScamDetector,
}

impl Screener {
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self {
            parser: JdParser::new(&config.parser)?,
            scorer: MatchScorer::new(&config.scoring)?,
            detector: ScamDetector::new(&config.scam)?,
        })
    }

    pub fn parser(&self) -> &JdParser {
        &self.parser
    }

    pub fn scorer(&self) -> &MatchScorer {
        &self.scorer
    }

    pub fn detector(&self) -> &ScamDetector {
        &self.detector
    }

    pub fn assess(
        &self,
        resume_text: &str,
        job: &JobRecord,
        projects: Option<&[ProjectSummary]>,
    ) -> JobAssessment {
        let parsed = self.parser.parse(&job.description);
        self.assess_parsed(resume_text, job, parsed, projects)
    }

    /// Assess a batch against one resume. Identical descriptions are parsed once.
    pub fn assess_all(
        &self,
        resume_text: &str,
        jobs: &[JobRecord],
        projects: Option<&[ProjectSummary]>,
    ) -> Vec<JobAssessment> {
        let mut cache = ParseCache::new();
        let assessments: Vec<JobAssessment> = jobs
            .iter()
            .map(|job| {
                let parsed = cache.parse(&self.parser, &job.description).clone();
                self.assess_parsed(resume_text, job, parsed, projects)
            })
            .collect();

        info!(
            "Assessed {} jobs ({} distinct descriptions)",
            assessments.len(),
            cache.len()
        );
        assessments
    }

    fn assess_parsed(
        &self,
        resume_text: &str,
        job: &JobRecord,
        parsed: ParsedJobDescription,
        projects: Option<&[ProjectSummary]>,
    ) -> JobAssessment {
        let match_result = self.scorer.score(resume_text, &parsed, projects);
        let verdict = self.detector.detect(job);
        debug!(
            "Assessment: match {} / scam {}",
            match_result.total_score, verdict.score
        );
        JobAssessment::from_parts(parsed, match_result, verdict)
    }
}

impl Default for Screener {
    fn default() -> Self {
        Self {
            parser: JdParser::default(),
            scorer: MatchScorer::default(),
            detector: ScamDetector::default(),
        }
    }
}
