//! Candidate project lists for the project-alignment factor

use crate::error::{Result, ScreenerError};
use crate::processing::match_scorer::ProjectSummary;
use log::info;
use std::path::Path;
use tokio::fs;

/// Read a JSON array of projects.
pub async fn load_projects(path: &Path) -> Result<Vec<ProjectSummary>> {
    if !path.exists() {
        return Err(ScreenerError::InvalidInput(format!(
            "Project file does not exist: {}",
            path.display()
        )));
    }

    let content = fs::read_to_string(path).await?;
    let projects: Vec<ProjectSummary> = serde_json::from_str(&content)?;
    info!("Loaded {} projects from {}", projects.len(), path.display());
    Ok(projects)
}
