use crate::config::Configuration;
use crate::domain::model::{DirectoryPayload, SnapshotLocation};
use crate::domain::ports::Storage;
use crate::utils::error::{CollectorError, Result};
use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};
use std::path::PathBuf;

const INDENT: &[u8] = b"    ";

/// `{prefix}-{day}-{month}-{year}.json`, day and month unpadded.
pub fn snapshot_file_name(prefix: &str, date: NaiveDate) -> String {
    format!(
        "{}-{}-{}-{}.json",
        prefix,
        date.day(),
        date.month(),
        date.year()
    )
}

/// Rebuild objects with keys in lexical order at every depth.
fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sorted(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

/// Pretty JSON with sorted keys and literal non-ASCII text.
pub fn render_snapshot(payload: &DirectoryPayload) -> serde_json::Result<Vec<u8>> {
    let value = sorted(Value::Object(payload.fields().clone()));
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Persists anonymized payloads as dated snapshots through a [`Storage`].
pub struct SnapshotWriter<S: Storage> {
    storage: S,
}

impl<S: Storage> SnapshotWriter<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn destination(config: &Configuration, date: NaiveDate) -> PathBuf {
        config
            .data_dir
            .join(snapshot_file_name(&config.file_prefix, date))
    }

    /// Write dated with today's local date.
    pub async fn write(
        &self,
        payload: &DirectoryPayload,
        config: &Configuration,
    ) -> Result<SnapshotLocation> {
        self.write_dated(payload, config, Local::now().date_naive())
            .await
    }

    pub async fn write_dated(
        &self,
        payload: &DirectoryPayload,
        config: &Configuration,
        date: NaiveDate,
    ) -> Result<SnapshotLocation> {
        let path = Self::destination(config, date);
        tracing::info!("Attempting to write data to output file: {}", path.display());

        let data = render_snapshot(payload)
            .map_err(|e| CollectorError::write_failed(&path, std::io::Error::other(e)))?;
        self.storage.write_file(&path, &data).await?;

        Ok(SnapshotLocation {
            path,
            member_count: payload.member_count(),
            bytes_written: data.len(),
        })
    }
}
