use crate::core::{DirectoryPayload, Pipeline, SnapshotLocation};
use crate::utils::error::Result;

/// Drives a [`Pipeline`] once, strictly in order.
pub struct CollectorEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> CollectorEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn pipeline(&self) -> &P {
        &self.pipeline
    }

    pub async fn run(&self) -> Result<SnapshotLocation> {
        let cleaned = self.collect().await?;

        tracing::info!("Writing snapshot...");
        let location = self.pipeline.load(cleaned).await?;
        tracing::info!("Job complete. Snapshot saved to: {}", location);

        Ok(location)
    }

    /// Extract and transform only; nothing is persisted.
    pub async fn preview(&self) -> Result<DirectoryPayload> {
        self.collect().await
    }

    async fn collect(&self) -> Result<DirectoryPayload> {
        tracing::info!("Information retrieval began...");
        let raw = self.pipeline.extract().await?;
        tracing::info!("Data retrieved: {} members", raw.member_count());

        tracing::info!("Anonymizing member records...");
        let cleaned = self.pipeline.transform(raw).await?;
        tracing::debug!("Anonymized {} members", cleaned.member_count());

        Ok(cleaned)
    }
}
