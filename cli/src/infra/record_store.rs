//! Infrastructure implementation of the `DeploymentStore` port.
//!
//! `JsonRecordStore` provides async load/save using `tokio::task::spawn_blocking`
//! with atomic write (temp file + rename) so an interrupted deploy never leaves
//! a half-written record.

use std::path::{Path, PathBuf};

use agentctl_common::DeploymentRecord;
use anyhow::{Context, Result};

use crate::application::ports::DeploymentStore;

/// Record file written to the working directory when none is named.
pub const DEFAULT_RECORD_FILE: &str = "deployment_info.json";

/// Deployment record file: implements `DeploymentStore` for the infra layer.
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Synchronous load - used internally by `load_async` via `spawn_blocking`.
    fn load_sync(&self) -> Result<Option<DeploymentRecord>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading deployment record {}", self.path.display()))?;
        let record = DeploymentRecord::from_json(&content)
            .with_context(|| format!("invalid deployment record {}", self.path.display()))?;
        Ok(Some(record))
    }

    /// Synchronous save - used internally by `save_async` via `spawn_blocking`.
    fn save_sync(&self, record: &DeploymentRecord) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let mut content = record.to_json_pretty()?;
        content.push('\n');

        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .with_context(|| format!("writing temp file {}", temp_path.display()))?;
        std::fs::rename(&temp_path, &self.path)
            .with_context(|| format!("finalizing deployment record {}", self.path.display()))?;
        tracing::debug!(path = %self.path.display(), agent_id = %record.agent_id, "saved deployment record");
        Ok(())
    }
}

impl DeploymentStore for JsonRecordStore {
    async fn load_async(&self) -> Result<Option<DeploymentRecord>> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || JsonRecordStore::with_path(path).load_sync())
            .await
            .context("record load task panicked")?
    }

    async fn save_async(&self, record: &DeploymentRecord) -> Result<()> {
        let path = self.path.clone();
        let record = record.clone();
        tokio::task::spawn_blocking(move || JsonRecordStore::with_path(path).save_sync(&record))
            .await
            .context("record save task panicked")?
    }
}
