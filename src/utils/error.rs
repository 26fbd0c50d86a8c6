use std::path::PathBuf;
use thiserror::Error;

/// Why the single member directory request did not produce a payload.
#[derive(Error, Debug)]
pub enum FetchFailure {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("response body is not valid JSON: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("API rejected the request: {error}")]
    Rejected { error: String },
}

#[derive(Error, Debug)]
pub enum CollectorError {
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Configuration is malformed: {message}")]
    ConfigMalformed { message: String },

    #[error("Member directory fetch failed: {0}")]
    FetchFailed(#[from] FetchFailure),

    #[error("Member directory is empty")]
    EmptyResult,

    #[error("Invalid payload shape: {message}")]
    InvalidPayloadShape { message: String },

    #[error("Failed to write snapshot {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CollectorError {
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::ConfigMalformed {
            message: message.into(),
        }
    }

    pub fn invalid_shape(message: impl Into<String>) -> Self {
        Self::InvalidPayloadShape {
            message: message.into(),
        }
    }

    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::WriteFailed {
            path: path.into(),
            source,
        }
    }

    /// Stable name of the failure class, used in fatal log events.
    pub fn class(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => "ConfigNotFound",
            Self::ConfigMalformed { .. } => "ConfigMalformed",
            Self::FetchFailed(_) => "FetchFailed",
            Self::EmptyResult => "EmptyResult",
            Self::InvalidPayloadShape { .. } => "InvalidPayloadShape",
            Self::WriteFailed { .. } => "WriteFailed",
        }
    }

    /// Process exit status, distinct per class. 1-3 keep the historical numbering.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigNotFound { .. } => 1,
            Self::ConfigMalformed { .. } => 2,
            Self::WriteFailed { .. } => 3,
            Self::FetchFailed(_) => 4,
            Self::EmptyResult => 5,
            Self::InvalidPayloadShape { .. } => 6,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ConfigNotFound { path, .. } => format!(
                "Configuration file does not exist: {}. Make sure it exists and is readable.",
                path.display()
            ),
            Self::ConfigMalformed { message } => {
                format!("Corrupted configuration, it could not be used: {}", message)
            }
            Self::FetchFailed(cause) => format!("Could not retrieve the member list: {}", cause),
            Self::EmptyResult => "No data was retrieved. Aborting now.".to_string(),
            Self::InvalidPayloadShape { message } => {
                format!("The member list had an unexpected shape: {}", message)
            }
            Self::WriteFailed { path, source } => {
                format!("Failed to write data to {}: {}", path.display(), source)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            Self::ConfigNotFound { .. } => {
                "Create config/config.toml under the application root or pass --config"
            }
            Self::ConfigMalformed { .. } => {
                "Check the TOML syntax and the storage/secure sections of the config file"
            }
            Self::FetchFailed(FetchFailure::Rejected { .. }) => {
                "Verify that secure.slack_group_token is a valid token with users:read scope"
            }
            Self::FetchFailed(_) => "Check network connectivity and the source endpoint",
            Self::EmptyResult => "Confirm the token belongs to the intended workspace",
            Self::InvalidPayloadShape { .. } => {
                "Confirm source.endpoint points at a users.list compatible API"
            }
            Self::WriteFailed { .. } => {
                "Check permissions and free space for storage.data_dir"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CollectorError>;
