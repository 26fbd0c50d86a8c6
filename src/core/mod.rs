pub mod anonymizer;
pub mod etl;
pub mod pipeline;
pub mod snapshot;

pub use crate::domain::model::{DirectoryPayload, MemberRecord, SnapshotLocation};
pub use crate::domain::ports::{DirectorySource, Pipeline, Storage};
pub use crate::utils::error::Result;
