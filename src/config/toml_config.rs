use crate::utils::error::{CollectorError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::Deserialize;
use std::fmt;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://slack.com/api/users.list";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Directory under the application root that holds relative config files.
pub const CONFIG_DIR: &str = "config";

static ENV_PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

/// On-disk layout. Every key is optional here so that a missing required key
/// is reported by name rather than as a generic deserialization failure.
#[derive(Debug, Default, Deserialize)]
struct RawConfig {
    storage: Option<StorageSection>,
    secure: Option<SecureSection>,
    source: Option<SourceSection>,
    anonymize: Option<AnonymizeSection>,
}

#[derive(Debug, Default, Deserialize)]
struct StorageSection {
    data_dir: Option<String>,
    data_file_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SecureSection {
    slack_group_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SourceSection {
    endpoint: Option<String>,
    timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AnonymizeSection {
    extra_fields: Option<Vec<String>>,
}

/// Resolved run parameters. Immutable after [`ConfigResolver::load`].
#[derive(Clone, PartialEq)]
pub struct Configuration {
    pub data_dir: PathBuf,
    pub file_prefix: String,
    pub api_token: String,
    pub endpoint: String,
    pub timeout: Duration,
    pub extra_sensitive_fields: Vec<String>,
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("data_dir", &self.data_dir)
            .field("file_prefix", &self.file_prefix)
            .field("api_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .field("extra_sensitive_fields", &self.extra_sensitive_fields)
            .finish()
    }
}

impl Validate for Configuration {
    fn validate(&self) -> Result<()> {
        validation::validate_path("storage.data_dir", &self.data_dir.to_string_lossy())?;
        validation::validate_file_name_component("storage.data_file_prefix", &self.file_prefix)?;
        validation::validate_non_empty_string("secure.slack_group_token", &self.api_token)?;
        validation::validate_url("source.endpoint", &self.endpoint)?;
        validation::validate_range(
            "source.timeout_seconds",
            self.timeout.as_secs(),
            1,
            MAX_TIMEOUT_SECONDS,
        )?;
        for field in &self.extra_sensitive_fields {
            validation::validate_non_empty_string("anonymize.extra_fields", field)?;
        }
        Ok(())
    }
}

fn required(field_name: &str, value: Option<String>) -> Result<String> {
    let value = value.ok_or_else(|| {
        CollectorError::malformed(format!("missing required key `{}`", field_name))
    })?;
    let value = expand_env_vars(field_name, &value)?;
    validation::validate_non_empty_string(field_name, &value)?;
    Ok(value)
}

impl RawConfig {
    fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CollectorError::malformed(format!("TOML parsing error: {}", e)))
    }

    fn resolve(self, app_root: &Path) -> Result<Configuration> {
        let storage = self.storage.unwrap_or_default();
        let secure = self.secure.unwrap_or_default();
        let source = self.source.unwrap_or_default();
        let anonymize = self.anonymize.unwrap_or_default();

        let data_dir = required("storage.data_dir", storage.data_dir)?;
        validation::validate_path("storage.data_dir", &data_dir)?;

        let endpoint = match source.endpoint {
            Some(endpoint) => expand_env_vars("source.endpoint", &endpoint)?,
            None => DEFAULT_ENDPOINT.to_string(),
        };

        Ok(Configuration {
            // Joining an absolute path yields that path unchanged.
            data_dir: app_root.join(data_dir),
            file_prefix: required("storage.data_file_prefix", storage.data_file_prefix)?,
            api_token: required("secure.slack_group_token", secure.slack_group_token)?,
            endpoint,
            timeout: Duration::from_secs(source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)),
            extra_sensitive_fields: anonymize.extra_fields.unwrap_or_default(),
        })
    }
}

/// Replace `${VAR}` in an already parsed value. An unset variable is an error
/// naming the variable, never its value.
fn expand_env_vars(field_name: &str, value: &str) -> Result<String> {
    let mut unset = None;
    let expanded = ENV_PLACEHOLDER.replace_all(value, |caps: &regex::Captures| {
        std::env::var(&caps[1]).unwrap_or_else(|_| {
            unset.get_or_insert_with(|| caps[1].to_string());
            String::new()
        })
    });

    match unset {
        Some(var_name) => Err(CollectorError::malformed(format!(
            "`{}` references environment variable `{}` which is not set",
            field_name, var_name
        ))),
        None => Ok(expanded.into_owned()),
    }
}

/// Loads [`Configuration`] relative to a fixed application root.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    app_root: PathBuf,
}

impl ConfigResolver {
    pub fn new(app_root: impl Into<PathBuf>) -> Self {
        Self {
            app_root: app_root.into(),
        }
    }

    /// Root at the directory containing the running executable.
    pub fn from_executable() -> Result<Self> {
        std::env::current_exe()
            .and_then(|exe| {
                exe.parent().map(Path::to_path_buf).ok_or_else(|| {
                    std::io::Error::new(ErrorKind::NotFound, "executable has no parent directory")
                })
            })
            .map(Self::new)
            .map_err(|source| CollectorError::ConfigNotFound {
                path: PathBuf::from(CONFIG_DIR),
                source,
            })
    }

    pub fn app_root(&self) -> &Path {
        &self.app_root
    }

    /// `{app_root}/config/{path}` for relative paths, `path` itself otherwise.
    pub fn config_path(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.app_root.join(CONFIG_DIR).join(path)
        }
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Configuration> {
        let full_path = self.config_path(path);
        tracing::debug!("Reading configuration from {}", full_path.display());

        let content = std::fs::read_to_string(&full_path).map_err(|source| {
            if source.kind() == ErrorKind::InvalidData {
                CollectorError::malformed(format!(
                    "{} is not valid UTF-8",
                    full_path.display()
                ))
            } else {
                CollectorError::ConfigNotFound {
                    path: full_path.clone(),
                    source,
                }
            }
        })?;

        let config = RawConfig::from_toml_str(&content)?.resolve(&self.app_root)?;
        config.validate()?;
        Ok(config)
    }
}
