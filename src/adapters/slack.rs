use crate::config::Configuration;
use crate::domain::model::{DirectoryPayload, MEMBERS_KEY};
use crate::domain::ports::DirectorySource;
use crate::utils::error::{CollectorError, FetchFailure, Result};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

/// Longest slice of an error body carried into [`FetchFailure::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Fetches the member directory with a single bearer-authenticated GET.
#[derive(Debug, Clone)]
pub struct SlackDirectoryFetcher {
    client: Client,
    endpoint: String,
}

impl SlackDirectoryFetcher {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("slack-collector/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(FetchFailure::Transport)?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn from_config(config: &Configuration) -> Result<Self> {
        Self::new(config.endpoint.clone(), config.timeout)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl DirectorySource for SlackDirectoryFetcher {
    async fn fetch(&self, credential: &str) -> Result<DirectoryPayload> {
        tracing::debug!("Making API request to: {}", self.endpoint);
        let response = self
            .client
            .get(&self.endpoint)
            .bearer_auth(credential)
            .send()
            .await
            .map_err(FetchFailure::Transport)?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        let body = response.bytes().await.map_err(FetchFailure::Transport)?;

        if !status.is_success() {
            let text = String::from_utf8_lossy(&body);
            return Err(FetchFailure::Status {
                status: status.as_u16(),
                body: text.chars().take(MAX_ERROR_BODY).collect(),
            }
            .into());
        }

        if body.iter().all(u8::is_ascii_whitespace) {
            return Err(CollectorError::EmptyResult);
        }

        let value: Value = serde_json::from_slice(&body).map_err(FetchFailure::Decode)?;
        if value.is_null() {
            return Err(CollectorError::EmptyResult);
        }
        let payload = DirectoryPayload::try_from(value)?;

        // Slack reports auth problems as 200 with `"ok": false`.
        if payload.get("ok") == Some(&Value::Bool(false)) {
            let error = payload
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown_error")
                .to_string();
            return Err(FetchFailure::Rejected { error }.into());
        }

        // Absent, null or empty `members` all mean nothing to snapshot.
        match payload.get(MEMBERS_KEY) {
            None | Some(Value::Null) => return Err(CollectorError::EmptyResult),
            Some(Value::Array(members)) if members.is_empty() => {
                return Err(CollectorError::EmptyResult)
            }
            _ => {}
        }

        tracing::info!("Retrieved {} members", payload.member_count());
        Ok(payload)
    }
}
