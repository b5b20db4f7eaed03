//! Settings resolution from the YAML file and the environment.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::config::{ConfigFile, Overrides, Settings};

/// Config file read from the working directory when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "agentctl.yaml";

/// Load the YAML config file.
///
/// An explicitly named file must exist. The default `./agentctl.yaml` is
/// optional.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn load_config_file(explicit: Option<&Path>) -> Result<(ConfigFile, Option<PathBuf>)> {
    let path = match explicit {
        Some(p) => p.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !default.exists() {
                return Ok((ConfigFile::default(), None));
            }
            default
        }
    };
    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    let file = if content.trim().is_empty() {
        ConfigFile::default()
    } else {
        serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), "loaded config file");
    Ok((file, Some(path)))
}

/// Overrides from `AWS_REGION`, `AWS_ACCOUNT_ID`, `SHARED_S3_BUCKET` and
/// `APPROVED_ECR_REPO`.
#[must_use]
pub fn env_overrides() -> Overrides {
    env_overrides_from(|key| std::env::var(key).ok())
}

/// Same as [`env_overrides`] with an injectable lookup. Empty values are ignored.
pub fn env_overrides_from(lookup: impl Fn(&str) -> Option<String>) -> Overrides {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
    Overrides {
        region: get("AWS_REGION"),
        account_id: get("AWS_ACCOUNT_ID"),
        shared_bucket: get("SHARED_S3_BUCKET"),
        repository: get("APPROVED_ECR_REPO"),
        storage_mode: None,
        preset: None,
    }
}

/// Resolve settings: defaults, file, environment, then flags.
///
/// # Errors
///
/// Returns an error if the config file is unusable or names an unknown preset.
pub fn resolve_settings(explicit: Option<&Path>, flags: Overrides) -> Result<Settings> {
    let (file, _) = load_config_file(explicit)?;
    let overrides = env_overrides().merged_with(flags);
    Ok(Settings::resolve(&file, &overrides)?)
}
