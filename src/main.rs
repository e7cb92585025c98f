//! job-screener: deterministic job description parsing, resume matching and scam detection

use clap::Parser;
use job_screener::cli::{self, Cli, Commands, ConfigAction};
use job_screener::config::{Config, OutputFormat};
use job_screener::error::{Result, ScreenerError};
use job_screener::input::{load_projects, InputManager};
use job_screener::output::formatter::suggest_filename;
use job_screener::output::{
    save_report_to_file, ReportBody, ReportGenerator, ReportMetadata, ScreeningReport,
};
use job_screener::processing::{JobRecord, ProjectSummary, Screener};
use log::{error, info};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;

const JOB_EXTENSIONS: &[&str] = &["txt", "md", "markdown", "pdf"];
const RESUME_EXTENSIONS: &[&str] = &["pdf", "txt", "md", "markdown"];

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run_command(cli, config).await {
        error!("Command failed: {}", e);
        process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
}

async fn run_command(cli: Cli, config: Config) -> Result<()> {
    let Cli {
        command,
        config: config_override,
        format,
        save,
        detailed,
        ..
    } = cli;

    let format = format.map(OutputFormat::from).unwrap_or(config.output.format);
    let generator = ReportGenerator::with_options(
        config.output.color_output && save.is_none(),
        detailed || config.output.detailed,
        true,
        true,
    );
    let screener = Screener::from_config(&config)?;
    let mut input_manager = InputManager::new();
    let started = Instant::now();

    let (body, metadata) = match command {
        Commands::Config { action } => return handle_config(action, &config, config_override),

        Commands::Parse { job } => {
            let job_text = read_job(&mut input_manager, &job).await?;
            let parsed = screener.parser().parse(&job_text);
            (ReportBody::Parsed(parsed), ReportMetadata::new(job.display().to_string()))
        }

        Commands::Score { resume, job, projects } => {
            let resume_text = read_resume(&mut input_manager, &resume).await?;
            let job_text = read_job(&mut input_manager, &job).await?;
            let projects = read_projects(projects.as_deref()).await?;

            let parsed = screener.parser().parse(&job_text);
            let result = screener
                .scorer()
                .score(&resume_text, &parsed, projects.as_deref());
            info!("Match score: {} ({})", result.total_score, result.recommendation());

            (
                ReportBody::Match { parsed, result },
                ReportMetadata::new(job.display().to_string())
                    .with_resume(resume.display().to_string()),
            )
        }

        Commands::Scam { job, company, contact } => {
            let job_text = read_job(&mut input_manager, &job).await?;
            let record = JobRecord {
                description: job_text,
                company: company.clone(),
                contact_text: contact,
            };
            let verdict = screener.detector().detect(&record);
            info!("Scam score: {}", verdict.score);

            (
                ReportBody::Scam(verdict),
                ReportMetadata::new(job.display().to_string()).with_company(company),
            )
        }

        Commands::Assess {
            resume,
            job,
            company,
            contact,
            projects,
        } => {
            let resume_text = read_resume(&mut input_manager, &resume).await?;
            let job_text = read_job(&mut input_manager, &job).await?;
            let projects = read_projects(projects.as_deref()).await?;
            let record = JobRecord {
                description: job_text,
                company: company.clone(),
                contact_text: contact,
            };

            let assessment = screener.assess(&resume_text, &record, projects.as_deref());
            info!(
                "Assessment complete: match {}, scam {}",
                assessment.match_score, assessment.scam_score
            );

            (
                ReportBody::Assessment(assessment),
                ReportMetadata::new(job.display().to_string())
                    .with_resume(resume.display().to_string())
                    .with_company(company),
            )
        }
    };

    let metadata = metadata.with_processing_time(started.elapsed().as_millis() as u64);
    let report = ScreeningReport::new(body, metadata);
    let rendered = generator.generate_report(&report, &format)?;

    match save {
        Some(path) => {
            let path = if path.is_dir() {
                path.join(suggest_filename(&format, &report.metadata.job_file, true))
            } else {
                path
            };
            save_report_to_file(&rendered, &path)?;
            println!("💾 Report saved to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    Ok(())
}

async fn read_job(input_manager: &mut InputManager, path: &Path) -> Result<String> {
    cli::validate_file_extension(path, JOB_EXTENSIONS)
        .map_err(|e| ScreenerError::InvalidInput(format!("Job description file: {}", e)))?;
    input_manager.extract_text(path).await
}

async fn read_resume(input_manager: &mut InputManager, path: &Path) -> Result<String> {
    cli::validate_file_extension(path, RESUME_EXTENSIONS)
        .map_err(|e| ScreenerError::InvalidInput(format!("Resume file: {}", e)))?;
    input_manager.extract_text(path).await
}

async fn read_projects(path: Option<&Path>) -> Result<Option<Vec<ProjectSummary>>> {
    match path {
        Some(path) => Ok(Some(load_projects(path).await?)),
        None => Ok(None),
    }
}

fn handle_config(
    action: Option<ConfigAction>,
    config: &Config,
    config_override: Option<PathBuf>,
) -> Result<()> {
    let path = config_override.unwrap_or_else(Config::config_path);

    match action {
        Some(ConfigAction::Show) | None => {
            println!("⚙️  Current Configuration ({})\n", path.display());
            let rendered = toml::to_string_pretty(config)?;
            println!("{}", rendered);
        }

        Some(ConfigAction::Reset) => {
            println!("🔄 Resetting configuration to defaults...");
            Config::default().save_to(&path)?;
            println!("✅ Configuration reset successfully!");
        }

        Some(ConfigAction::Path) => {
            println!("{}", path.display());
        }
    }

    Ok(())
}
