//! Output formatters for screening reports

use crate::config::OutputFormat;
use crate::error::{Result, ScreenerError};
use crate::output::report::{ReportBody, ScreeningReport};
use crate::processing::jd_parser::ParsedJobDescription;
use crate::processing::match_scorer::{MatchResult, Recommendation};
use crate::processing::scam_detector::ScamVerdict;
use colored::{Color, Colorize};
use std::path::Path;

pub trait OutputFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String>;
    fn supports_format(&self) -> OutputFormat;
}

/// Terminal output with optional colors and per-factor detail
pub struct ConsoleFormatter {
    use_colors: bool,
    detailed: bool,
}

pub struct JsonFormatter {
    pretty: bool,
}

pub struct MarkdownFormatter {
    include_metadata: bool,
}

/// Report generator that coordinates different formatters
pub struct ReportGenerator {
    console_formatter: ConsoleFormatter,
    json_formatter: JsonFormatter,
    markdown_formatter: MarkdownFormatter,
}

fn join_or_none(items: &[String]) -> String {
    if items.is_empty() {
        "none".to_string()
    } else {
        items.join(", ")
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

impl ConsoleFormatter {
    pub fn new(use_colors: bool, detailed: bool) -> Self {
        Self { use_colors, detailed }
    }

    fn colorize(&self, text: &str, color: Color) -> String {
        if self.use_colors {
            text.color(color).to_string()
        } else {
            text.to_string()
        }
    }

    fn format_header(&self, title: &str, level: u8) -> String {
        let prefix = match level {
            1 => "█",
            2 => "▓",
            3 => "▒",
            _ => "░",
        };

        let color = match level {
            1 => Color::Blue,
            2 => Color::Green,
            3 => Color::Yellow,
            _ => Color::White,
        };

        if self.use_colors {
            format!("\n{} {}\n", prefix.color(color).bold(), title.color(color).bold())
        } else {
            format!("\n{} {}\n", prefix, title)
        }
    }

    fn format_score_badge(&self, recommendation: Recommendation) -> String {
        let (badge, color) = match recommendation {
            Recommendation::StrongMatch => ("STRONG MATCH", Color::Green),
            Recommendation::GoodMatch => ("GOOD MATCH", Color::BrightGreen),
            Recommendation::WeakMatch => ("WEAK MATCH", Color::Yellow),
            Recommendation::PoorMatch => ("POOR MATCH", Color::BrightRed),
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_scam_badge(&self, verdict: &ScamVerdict) -> String {
        let (badge, color) = if verdict.is_scam {
            ("LIKELY SCAM", Color::BrightRed)
        } else if verdict.flags.is_empty() {
            ("CLEAN", Color::Green)
        } else {
            ("SUSPICIOUS", Color::Yellow)
        };

        if self.use_colors {
            format!("[{}]", badge.color(color).bold())
        } else {
            format!("[{}]", badge)
        }
    }

    fn format_parsed(&self, parsed: &ParsedJobDescription) -> String {
        let mut output = self.format_header("📄 Job Description", 2);
        output.push_str(&format!(
            "Seniority: {}\n",
            self.colorize(parsed.seniority.label(), Color::Cyan)
        ));
        match parsed.years_required {
            Some(years) => output.push_str(&format!("Years required: {}\n", years)),
            None => output.push_str("Years required: not stated\n"),
        }
        output.push_str(&format!(
            "Required skills: {}\n",
            self.colorize(&join_or_none(&parsed.required_skills), Color::White)
        ));
        output.push_str(&format!("Preferred skills: {}\n", join_or_none(&parsed.preferred_skills)));
        output.push_str(&format!("Keywords: {}\n", join_or_none(&parsed.keywords)));
        output.push_str(&format!(
            "Remote: {} | Equity: {}\n",
            yes_no(parsed.flags.is_remote),
            yes_no(parsed.flags.has_equity)
        ));
        output
    }

    fn format_match(&self, result: &MatchResult) -> String {
        let mut output = self.format_header("🎯 Match Score", 2);
        output.push_str(&format!(
            "Overall Score: {}/100 {}\n",
            result.total_score,
            self.format_score_badge(result.recommendation())
        ));

        output.push_str(&self.format_header("Score Breakdown", 3));
        for (factor, entry) in &result.breakdown {
            if entry.weight == 0 && !self.detailed {
                continue;
            }
            output.push_str(&format!(
                "  {}: {:.1}/{} ({} of {} matched)\n",
                factor,
                entry.subscore,
                entry.weight,
                entry.matched.len(),
                entry.possible.len()
            ));
            if self.detailed {
                if !entry.matched.is_empty() {
                    output.push_str(&format!(
                        "    ✅ {}\n",
                        self.colorize(&entry.matched.join(", "), Color::Green)
                    ));
                }
                let missing = entry.missing();
                if !missing.is_empty() {
                    output.push_str(&format!(
                        "    ❌ {}\n",
                        self.colorize(&missing.join(", "), Color::Red)
                    ));
                }
            }
        }

        let suggestions = result.improvement_suggestions();
        if !suggestions.is_empty() {
            output.push_str(&self.format_header("💡 Suggestions", 3));
            for suggestion in &suggestions {
                output.push_str(&format!("  • {}\n", self.colorize(suggestion, Color::Yellow)));
            }
        }
        output
    }

    fn format_scam(&self, verdict: &ScamVerdict) -> String {
        let mut output = self.format_header("🛡️ Scam Check", 2);
        output.push_str(&format!(
            "Scam Score: {}/100 {}\n",
            verdict.score,
            self.format_scam_badge(verdict)
        ));
        for flag in &verdict.flags {
            output.push_str(&format!(
                "  ⚠️ {} {}\n",
                self.colorize(&flag.description, Color::Red),
                self.colorize(&format!("(+{})", flag.flag_type.points()), Color::BrightBlack)
            ));
        }
        output
    }
}

impl OutputFormatter for ConsoleFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.format_header(&report.title().to_uppercase(), 1));
        output.push_str(&format!(
            "Generated: {} | Processing time: {}ms\n",
            report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.metadata.processing_time_ms
        ));
        if let Some(company) = &report.metadata.company {
            output.push_str(&format!("Company: {}\n", company));
        }

        match &report.body {
            ReportBody::Parsed(parsed) => output.push_str(&self.format_parsed(parsed)),
            ReportBody::Match { parsed, result } => {
                if self.detailed {
                    output.push_str(&self.format_parsed(parsed));
                }
                output.push_str(&self.format_match(result));
            }
            ReportBody::Scam(verdict) => output.push_str(&self.format_scam(verdict)),
            ReportBody::Assessment(assessment) => {
                output.push_str(&self.format_parsed(&assessment.parsed_data));
                output.push_str(&self.format_match(&assessment.match_result()));
                output.push_str(&self.format_scam(&assessment.scam_verdict()));
            }
        }

        output.push_str(&format!(
            "\n{} Generated by job-screener v{}\n",
            self.colorize("ℹ️", Color::Blue),
            report.metadata.screener_version
        ));

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Console
    }
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        if self.pretty {
            Ok(serde_json::to_string_pretty(report)?)
        } else {
            Ok(serde_json::to_string(report)?)
        }
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Json
    }
}

impl MarkdownFormatter {
    pub fn new(include_metadata: bool) -> Self {
        Self { include_metadata }
    }

    fn markdown_score_badge(recommendation: Recommendation) -> &'static str {
        match recommendation {
            Recommendation::StrongMatch => "🟢 Strong match",
            Recommendation::GoodMatch => "🟡 Good match",
            Recommendation::WeakMatch => "🟠 Weak match",
            Recommendation::PoorMatch => "🔴 Poor match",
        }
    }

    fn format_parsed(parsed: &ParsedJobDescription) -> String {
        let mut output = String::from("## 📄 Job Description\n\n");
        output.push_str(&format!("- **Seniority:** {}\n", parsed.seniority));
        output.push_str(&format!(
            "- **Years required:** {}\n",
            parsed
                .years_required
                .map_or_else(|| "not stated".to_string(), |y| y.to_string())
        ));
        output.push_str(&format!(
            "- **Required skills:** {}\n",
            join_or_none(&parsed.required_skills)
        ));
        output.push_str(&format!(
            "- **Preferred skills:** {}\n",
            join_or_none(&parsed.preferred_skills)
        ));
        output.push_str(&format!("- **Keywords:** {}\n", join_or_none(&parsed.keywords)));
        output.push_str(&format!(
            "- **Remote:** {} | **Equity:** {}\n\n",
            yes_no(parsed.flags.is_remote),
            yes_no(parsed.flags.has_equity)
        ));
        output
    }

    fn format_match(result: &MatchResult) -> String {
        let mut output = String::from("## 🎯 Match Score\n\n");
        output.push_str(&format!(
            "**Overall Score:** {}/100 {}\n\n",
            result.total_score,
            Self::markdown_score_badge(result.recommendation())
        ));

        output.push_str("| Factor | Score | Weight | Matched | Missing |\n");
        output.push_str("|--------|-------|--------|---------|---------|\n");
        for (factor, entry) in &result.breakdown {
            output.push_str(&format!(
                "| {} | {:.1} | {} | {} | {} |\n",
                factor,
                entry.subscore,
                entry.weight,
                entry.matched.join(", "),
                entry.missing().join(", ")
            ));
        }
        output.push('\n');

        let suggestions = result.improvement_suggestions();
        if !suggestions.is_empty() {
            output.push_str("### 💡 Suggestions\n\n");
            for suggestion in &suggestions {
                output.push_str(&format!("- {}\n", suggestion));
            }
            output.push('\n');
        }
        output
    }

    fn format_scam(verdict: &ScamVerdict) -> String {
        let mut output = String::from("## 🛡️ Scam Check\n\n");
        output.push_str(&format!(
            "**Scam Score:** {}/100 | **Likely scam:** {}\n\n",
            verdict.score,
            yes_no(verdict.is_scam)
        ));
        for flag in &verdict.flags {
            output.push_str(&format!(
                "- `{}` (+{}): {}\n",
                flag.flag_type,
                flag.flag_type.points(),
                flag.description
            ));
        }
        if !verdict.flags.is_empty() {
            output.push('\n');
        }
        output
    }
}

impl OutputFormatter for MarkdownFormatter {
    fn format_report(&self, report: &ScreeningReport) -> Result<String> {
        let mut output = format!("# 📊 {}\n\n", report.title());

        if self.include_metadata {
            output.push_str(&format!(
                "**Generated:** {} | **Processing Time:** {}ms\n",
                report.metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
                report.metadata.processing_time_ms
            ));
            output.push_str(&format!("**Job:** `{}`", file_label(&report.metadata.job_file)));
            if let Some(resume) = &report.metadata.resume_file {
                output.push_str(&format!(" | **Resume:** `{}`", file_label(resume)));
            }
            if let Some(company) = &report.metadata.company {
                output.push_str(&format!(" | **Company:** {}", company));
            }
            output.push_str("\n\n");
        }

        match &report.body {
            ReportBody::Parsed(parsed) => output.push_str(&Self::format_parsed(parsed)),
            ReportBody::Match { parsed, result } => {
                output.push_str(&Self::format_parsed(parsed));
                output.push_str(&Self::format_match(result));
            }
            ReportBody::Scam(verdict) => output.push_str(&Self::format_scam(verdict)),
            ReportBody::Assessment(assessment) => {
                output.push_str(&Self::format_parsed(&assessment.parsed_data));
                output.push_str(&Self::format_match(&assessment.match_result()));
                output.push_str(&Self::format_scam(&assessment.scam_verdict()));
            }
        }

        if self.include_metadata {
            output.push_str("---\n\n");
            output.push_str(&format!(
                "*Generated by job-screener v{}*\n",
                report.metadata.screener_version
            ));
        }

        Ok(output)
    }

    fn supports_format(&self) -> OutputFormat {
        OutputFormat::Markdown
    }
}

fn file_label(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map_or_else(|| path.to_string(), |name| name.to_string_lossy().into_owned())
}

impl ReportGenerator {
    pub fn with_options(
        use_colors: bool,
        detailed: bool,
        pretty_json: bool,
        include_metadata: bool,
    ) -> Self {
        Self {
            console_formatter: ConsoleFormatter::new(use_colors, detailed),
            json_formatter: JsonFormatter::new(pretty_json),
            markdown_formatter: MarkdownFormatter::new(include_metadata),
        }
    }

    pub fn generate_report(
        &self,
        report: &ScreeningReport,
        format: &OutputFormat,
    ) -> Result<String> {
        let formatter: &dyn OutputFormatter = match format {
            OutputFormat::Console => &self.console_formatter,
            OutputFormat::Json => &self.json_formatter,
            OutputFormat::Markdown => &self.markdown_formatter,
        };
        debug_assert_eq!(formatter.supports_format(), *format);
        formatter.format_report(report)
    }
}

pub fn save_report_to_file(content: &str, file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(file_path, content).map_err(|e| {
        ScreenerError::OutputFormatting(format!(
            "Failed to write report to {}: {}",
            file_path.display(),
            e
        ))
    })
}

pub fn suggest_filename(format: &OutputFormat, job_name: &str, timestamp: bool) -> String {
    let base_name = Path::new(job_name)
        .file_stem()
        .unwrap_or_default()
        .to_string_lossy();

    let timestamp_suffix = if timestamp {
        format!("_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
    } else {
        String::new()
    };

    match format {
        OutputFormat::Console => format!("{}_screening{}.txt", base_name, timestamp_suffix),
        OutputFormat::Json => format!("{}_screening{}.json", base_name, timestamp_suffix),
        OutputFormat::Markdown => format!("{}_screening{}.md", base_name, timestamp_suffix),
    }
}
