use crate::adapters::{LocalStorage, SlackDirectoryFetcher};
use crate::config::ConfigResolver;
use crate::core::etl::CollectorEngine;
use crate::core::pipeline::SnapshotPipeline;
use crate::core::snapshot::SnapshotWriter;
use crate::domain::model::SnapshotLocation;
use crate::utils::error::Result;
use chrono::Local;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// `None` roots at the executable's directory.
    pub app_root: Option<PathBuf>,
    pub config_path: PathBuf,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Written(SnapshotLocation),
    DryRun {
        destination: PathBuf,
        member_count: usize,
    },
}

/// One complete collection: resolve, fetch, anonymize, write.
pub async fn run(options: &RunOptions) -> Result<RunOutcome> {
    let resolver = match &options.app_root {
        Some(root) => ConfigResolver::new(root),
        None => ConfigResolver::from_executable()?,
    };
    tracing::info!(
        "Loading configuration from: {}",
        resolver.config_path(&options.config_path).display()
    );
    let config = resolver.load(&options.config_path)?;
    tracing::debug!("Configuration: {:?}", config);

    let fetcher = SlackDirectoryFetcher::from_config(&config)?;
    tracing::info!("Fetching member directory from: {}", fetcher.endpoint());
    let engine = CollectorEngine::new(SnapshotPipeline::new(fetcher, LocalStorage::new(), config));

    if options.dry_run {
        tracing::info!("DRY RUN MODE - no snapshot will be written");
        let cleaned = engine.preview().await?;
        let destination = SnapshotWriter::<LocalStorage>::destination(
            engine.pipeline().config(),
            Local::now().date_naive(),
        );
        return Ok(RunOutcome::DryRun {
            destination,
            member_count: cleaned.member_count(),
        });
    }

    engine.run().await.map(RunOutcome::Written)
}
