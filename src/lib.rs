pub mod chart;
pub mod config;
pub mod error;
pub mod github;
pub mod metrics;
pub mod types;

use chart::{ChartSettings, Panel};
use config::AppConfig;
use error::Result;
use github::GitHubClient;
use metrics::MetricSet;
use serde::Serialize;
use std::path::{Path, PathBuf};
use types::RepoId;

/// Outcome of a successful fetch-render cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ChartReport {
    pub repo_id: RepoId,
    /// Where the chart was written, after the default extension was applied.
    pub destination: PathBuf,
    pub metrics: MetricSet,
    pub panels: Vec<Panel>,
}

/// Runs the fetch, classify and render pipeline. Holds no UI state.
pub struct Visualizer {
    client: GitHubClient,
    settings: ChartSettings,
}

impl Visualizer {
    /// Initializes the GitHub client and chart settings from the configuration.
    pub fn new(config: &AppConfig) -> anyhow::Result<Self> {
        Ok(Self {
            client: GitHubClient::new(config)?,
            settings: ChartSettings::from(config),
        })
    }

    /// Fetches the metrics of `owner/repo` and saves their chart at `destination`.
    ///
    /// Inputs are validated before any request is made. Nothing is written unless every
    /// GitHub call succeeded.
    pub async fn run(&self, owner: &str, repo: &str, destination: &Path) -> Result<ChartReport> {
        let repo_id = RepoId::new(owner, repo)?;
        let destination = chart::resolve_destination(destination)?;

        let metrics = self.client.fetch_metrics(&repo_id).await?;
        let panels = chart::render(&metrics, &destination, &self.settings)?;
        tracing::info!(repo_id = %repo_id, path = %destination.display(), "Chart saved");

        Ok(ChartReport {
            repo_id,
            destination,
            metrics,
            panels,
        })
    }
}
