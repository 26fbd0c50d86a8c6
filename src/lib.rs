pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliArgs;

pub use adapters::{LocalStorage, SlackDirectoryFetcher};
pub use app::{run, RunOptions, RunOutcome};
pub use config::{ConfigResolver, Configuration};
pub use crate::core::{anonymizer::anonymize, etl::CollectorEngine, pipeline::SnapshotPipeline};
pub use domain::model::{DirectoryPayload, MemberRecord, SnapshotLocation};
pub use utils::error::{CollectorError, FetchFailure, Result};
