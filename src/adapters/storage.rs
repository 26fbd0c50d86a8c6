use crate::domain::ports::Storage;
use crate::utils::error::{CollectorError, Result};
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Local filesystem storage with temp-file-and-rename writes.
#[derive(Debug, Clone, Default)]
pub struct LocalStorage;

impl LocalStorage {
    pub fn new() -> Self {
        Self
    }
}

fn temp_path_for(path: &Path) -> PathBuf {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", file_name))
}

fn write_synced(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}

impl Storage for LocalStorage {
    async fn write_file(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .map_err(|e| CollectorError::write_failed(parent, e))?;
        }

        let temp_path = temp_path_for(path);
        let written = write_synced(&temp_path, data).and_then(|()| fs::rename(&temp_path, path));

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(CollectorError::write_failed(path, e));
        }

        tracing::debug!("Wrote {} bytes to {}", data.len(), path.display());
        Ok(())
    }
}
