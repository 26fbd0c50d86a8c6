use crate::config::Configuration;
use crate::core::anonymizer::Anonymizer;
use crate::core::snapshot::SnapshotWriter;
use crate::core::{DirectoryPayload, DirectorySource, Pipeline, SnapshotLocation, Storage};
use crate::utils::error::Result;

/// Fetch → anonymize → write, wired from one [`Configuration`].
pub struct SnapshotPipeline<F: DirectorySource, S: Storage> {
    source: F,
    anonymizer: Anonymizer,
    writer: SnapshotWriter<S>,
    config: Configuration,
}

impl<F: DirectorySource, S: Storage> SnapshotPipeline<F, S> {
    pub fn new(source: F, storage: S, config: Configuration) -> Self {
        Self {
            source,
            anonymizer: Anonymizer::with_extra_fields(config.extra_sensitive_fields.iter().cloned()),
            writer: SnapshotWriter::new(storage),
            config,
        }
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }
}

#[async_trait::async_trait]
impl<F: DirectorySource, S: Storage> Pipeline for SnapshotPipeline<F, S> {
    async fn extract(&self) -> Result<DirectoryPayload> {
        self.source.fetch(&self.config.api_token).await
    }

    async fn transform(&self, payload: DirectoryPayload) -> Result<DirectoryPayload> {
        self.anonymizer.anonymize(payload)
    }

    async fn load(&self, payload: DirectoryPayload) -> Result<SnapshotLocation> {
        self.writer.write(&payload, &self.config).await
    }
}
