use crate::utils::error::{CollectorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::PathBuf;

/// One workspace member as returned by the API. Open schema.
pub type MemberRecord = Map<String, Value>;

pub const MEMBERS_KEY: &str = "members";

/// The `users.list` response object, kept verbatim apart from anonymization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DirectoryPayload(Map<String, Value>);

impl DirectoryPayload {
    pub fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The `members` sequence, if present and an array.
    pub fn members(&self) -> Option<&[Value]> {
        self.0
            .get(MEMBERS_KEY)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    }

    pub fn member_count(&self) -> usize {
        self.members().map_or(0, <[Value]>::len)
    }

    pub fn members_mut(&mut self) -> Result<&mut Vec<Value>> {
        match self.0.get_mut(MEMBERS_KEY) {
            Some(Value::Array(members)) => Ok(members),
            Some(other) => Err(CollectorError::invalid_shape(format!(
                "`{}` is {} instead of an array",
                MEMBERS_KEY,
                json_kind(other)
            ))),
            None => Err(CollectorError::invalid_shape(format!(
                "payload has no `{}` key",
                MEMBERS_KEY
            ))),
        }
    }
}

impl TryFrom<Value> for DirectoryPayload {
    type Error = CollectorError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(CollectorError::invalid_shape(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Where a run's snapshot ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotLocation {
    pub path: PathBuf,
    pub member_count: usize,
    pub bytes_written: usize,
}

impl fmt::Display for SnapshotLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} members, {} bytes)",
            self.path.display(),
            self.member_count,
            self.bytes_written
        )
    }
}
