use crate::domain::model::{DirectoryPayload, SnapshotLocation};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::Path;

/// Durable byte sink for snapshots.
pub trait Storage: Send + Sync {
    /// Create or replace `path` so that readers see either the old file or the full new one.
    fn write_file(
        &self,
        path: &Path,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Remote member directory, e.g. Slack `users.list`.
pub trait DirectorySource: Send + Sync {
    fn fetch(
        &self,
        credential: &str,
    ) -> impl std::future::Future<Output = Result<DirectoryPayload>> + Send;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<DirectoryPayload>;
    async fn transform(&self, payload: DirectoryPayload) -> Result<DirectoryPayload>;
    async fn load(&self, payload: DirectoryPayload) -> Result<SnapshotLocation>;
}
