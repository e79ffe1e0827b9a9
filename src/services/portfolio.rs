use crate::models::{Portfolio, Project};
use anyhow::{Context, Result};
use std::path::Path;

/// Reads the portfolio data file. A missing file is an empty portfolio.
pub fn load(path: Option<&Path>) -> Result<Portfolio> {
    let Some(path) = path else {
        return Ok(Portfolio::default());
    };
    if !path.exists() {
        tracing::warn!(
            "Portfolio data file '{}' not found, serving an empty portfolio",
            path.display()
        );
        return Ok(Portfolio::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read portfolio data '{}'", path.display()))?;
    parse(&content).with_context(|| format!("Invalid portfolio data in '{}'", path.display()))
}

pub fn parse(content: &str) -> Result<Portfolio> {
    let portfolio: Portfolio = toml::from_str(content)?;
    let mut seen = std::collections::HashSet::new();
    for project in &portfolio.projects {
        if !seen.insert(project.id.as_str()) {
            anyhow::bail!("duplicate project id '{}'", project.id);
        }
    }
    Ok(portfolio)
}

pub fn projects(portfolio: &Portfolio, featured_only: bool) -> Vec<Project> {
    portfolio
        .projects
        .iter()
        .filter(|p| !featured_only || p.featured)
        .cloned()
        .collect()
}
