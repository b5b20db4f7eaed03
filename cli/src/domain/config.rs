//! Domain types and validators for agentctl settings.
//!
//! Pure functions only: no I/O, no async, no filesystem access. The infra
//! layer reads the YAML file and the environment; everything here takes
//! those layers as data and produces one immutable [`Settings`].

use std::sync::LazyLock;
use std::time::Duration;

use agentctl_common::StorageMode;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::presets::{self, AgentPreset};

// ── Constants ────────────────────────────────────────────────────────────────

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ACCOUNT_ID: &str = "YOUR_ACCOUNT_ID";
pub const DEFAULT_SHARED_BUCKET: &str = "company-bedrock-agents";
pub const DEFAULT_REPOSITORY: &str = "bedrock-agents";
pub const DEFAULT_EXECUTION_ROLE: &str = "BedrockAgentExecutionRole";
pub const DEFAULT_FOUNDATION_MODEL: &str = "anthropic.claude-3-sonnet-20240229-v1:0";
pub const DEFAULT_IDLE_SESSION_TTL: u32 = 600;
pub const DEFAULT_ALIAS_NAME: &str = "production";
pub const DEFAULT_PROMPT_DELAY_SECS: u64 = 2;
/// A freshly created bucket-backed deployment waits this long after
/// preparation before creating the alias.
pub const DEDICATED_ALIAS_DELAY_SECS: u64 = 15;

static AGENT_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^([0-9a-zA-Z][_-]?){1,100}$").expect("valid regex")
});

// ── Config file schema ───────────────────────────────────────────────────────

/// Optional YAML configuration (`agentctl.yaml`). Every key is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    pub region: Option<String>,
    pub account_id: Option<String>,
    pub agent: AgentSection,
    pub storage: StorageSection,
    pub registry: RegistrySection,
    pub identity: IdentitySection,
    pub timing: TimingSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentSection {
    pub preset: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub instruction: Option<String>,
    pub foundation_model: Option<String>,
    pub idle_session_ttl: Option<u32>,
    pub alias_name: Option<String>,
    pub prompts: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub mode: Option<StorageMode>,
    pub shared_bucket: Option<String>,
    pub folders: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RegistrySection {
    pub repository: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IdentitySection {
    pub execution_role_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingSection {
    pub alias_delay_secs: Option<u64>,
    pub prompt_delay_secs: Option<u64>,
}

/// Values supplied by the environment or command-line flags.
///
/// Applied after the config file; flags are applied after the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub account_id: Option<String>,
    pub shared_bucket: Option<String>,
    pub repository: Option<String>,
    pub storage_mode: Option<StorageMode>,
    pub preset: Option<String>,
}

impl Overrides {
    /// Layer `other` on top of `self`; values present in `other` win.
    #[must_use]
    pub fn merged_with(self, other: Overrides) -> Self {
        Self {
            region: other.region.or(self.region),
            account_id: other.account_id.or(self.account_id),
            shared_bucket: other.shared_bucket.or(self.shared_bucket),
            repository: other.repository.or(self.repository),
            storage_mode: other.storage_mode.or(self.storage_mode),
            preset: other.preset.or(self.preset),
        }
    }
}

// ── Resolved settings ────────────────────────────────────────────────────────

/// The agent resource as submitted to `CreateAgent`.
#[derive(Debug, Clone, Serialize)]
pub struct AgentDefinition {
    pub name: String,
    pub description: String,
    pub instruction: String,
    pub foundation_model: String,
    pub idle_session_ttl: u32,
}

/// Where the agent's data lives.
#[derive(Debug, Clone, Serialize)]
pub struct StorageSettings {
    pub mode: StorageMode,
    pub shared_bucket: String,
    /// Bucket actually used: the shared bucket or `{agent}-data-{account}`.
    pub bucket_name: String,
    /// `s3://` prefix under which the agent's folders live.
    pub prefix: String,
    pub folders: Vec<String>,
}

/// Immutable process-wide settings, resolved once at start-up.
#[derive(Debug, Clone, Serialize)]
pub struct Settings {
    pub region: String,
    pub account_id: String,
    pub preset: String,
    pub agent: AgentDefinition,
    pub alias_name: String,
    pub storage: StorageSettings,
    pub repository: String,
    pub execution_role_name: String,
    pub execution_role_arn: String,
    pub alias_delay_secs: u64,
    pub prompt_delay_secs: u64,
    pub test_prompts: Vec<String>,
}

impl Settings {
    /// Resolve settings from defaults, the config file, and overrides.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownPreset`] if the selected preset does not exist.
    pub fn resolve(file: &ConfigFile, overrides: &Overrides) -> Result<Self, ConfigError> {
        let preset_name = overrides
            .preset
            .clone()
            .or_else(|| file.agent.preset.clone())
            .unwrap_or_else(|| presets::DEFAULT_PRESET.to_string());
        let preset: &AgentPreset =
            presets::find_preset(&preset_name).ok_or_else(|| ConfigError::UnknownPreset {
                name: preset_name.clone(),
                valid: presets::preset_names(),
            })?;

        let region = pick(&overrides.region, &file.region, DEFAULT_REGION);
        let account_id = pick(&overrides.account_id, &file.account_id, DEFAULT_ACCOUNT_ID);
        let mode = overrides
            .storage_mode
            .or(file.storage.mode)
            .unwrap_or_default();

        let agent = AgentDefinition {
            name: pick(&None, &file.agent.name, preset.name),
            description: pick(&None, &file.agent.description, preset.description),
            instruction: pick(&None, &file.agent.instruction, preset.instruction),
            foundation_model: pick(&None, &file.agent.foundation_model, DEFAULT_FOUNDATION_MODEL),
            idle_session_ttl: file
                .agent
                .idle_session_ttl
                .unwrap_or(DEFAULT_IDLE_SESSION_TTL),
        };

        let shared_bucket = pick(
            &overrides.shared_bucket,
            &file.storage.shared_bucket,
            DEFAULT_SHARED_BUCKET,
        );
        let (bucket_name, prefix) = match mode {
            StorageMode::Shared => (
                shared_bucket.clone(),
                format!("s3://{shared_bucket}/agents/{}", agent.name),
            ),
            StorageMode::Dedicated => {
                let bucket = dedicated_bucket_name(&agent.name, &account_id);
                let prefix = format!("s3://{bucket}");
                (bucket, prefix)
            }
        };
        let folders = file
            .storage
            .folders
            .clone()
            .unwrap_or_else(|| preset.folders.iter().map(|f| (*f).to_string()).collect());

        let execution_role_name = pick(
            &None,
            &file.identity.execution_role_name,
            DEFAULT_EXECUTION_ROLE,
        );
        let execution_role_arn = format!("arn:aws:iam::{account_id}:role/{execution_role_name}");

        let default_alias_delay = match mode {
            StorageMode::Shared => 0,
            StorageMode::Dedicated => DEDICATED_ALIAS_DELAY_SECS,
        };

        let test_prompts = file.agent.prompts.clone().map_or_else(
            || {
                preset
                    .prompts
                    .iter()
                    .map(|t| presets::render_prompt(t, &prefix))
                    .collect()
            },
            |custom| {
                custom
                    .iter()
                    .map(|t| presets::render_prompt(t, &prefix))
                    .collect()
            },
        );

        Ok(Self {
            region,
            account_id,
            preset: preset.name.to_string(),
            alias_name: pick(&None, &file.agent.alias_name, DEFAULT_ALIAS_NAME),
            storage: StorageSettings {
                mode,
                shared_bucket,
                bucket_name,
                prefix,
                folders,
            },
            repository: pick(&overrides.repository, &file.registry.repository, DEFAULT_REPOSITORY),
            execution_role_name,
            execution_role_arn,
            alias_delay_secs: file.timing.alias_delay_secs.unwrap_or(default_alias_delay),
            prompt_delay_secs: file
                .timing
                .prompt_delay_secs
                .unwrap_or(DEFAULT_PROMPT_DELAY_SECS),
            test_prompts,
            agent,
        })
    }

    /// Check the settings a deploy relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_agent_name(&self.agent.name)?;
        if self.agent.instruction.trim().is_empty() {
            return Err(ConfigError::Empty("agent.instruction"));
        }
        if self.agent.foundation_model.trim().is_empty() {
            return Err(ConfigError::Empty("agent.foundation_model"));
        }
        if self.alias_name.trim().is_empty() {
            return Err(ConfigError::Empty("agent.alias_name"));
        }
        if !(60..=3600).contains(&self.agent.idle_session_ttl) {
            return Err(ConfigError::InvalidIdleTtl(self.agent.idle_session_ttl));
        }
        validate_bucket_name(&self.storage.bucket_name)
    }

    #[must_use]
    pub fn alias_delay(&self) -> Duration {
        Duration::from_secs(self.alias_delay_secs)
    }

    #[must_use]
    pub fn prompt_delay(&self) -> Duration {
        Duration::from_secs(self.prompt_delay_secs)
    }

    /// Full `s3://` path of each placeholder folder.
    #[must_use]
    pub fn folder_paths(&self) -> Vec<String> {
        self.storage
            .folders
            .iter()
            .map(|f| format!("{}/{}", self.storage.prefix, f.trim_end_matches('/')))
            .collect()
    }
}

fn pick(over: &Option<String>, file: &Option<String>, default: &str) -> String {
    over.as_deref()
        .or(file.as_deref())
        .unwrap_or(default)
        .to_string()
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Name of the per-agent bucket in dedicated storage mode.
#[must_use]
pub fn dedicated_bucket_name(agent_name: &str, account_id: &str) -> String {
    format!("{agent_name}-data-{account_id}").to_ascii_lowercase()
}

/// Validates an agent name against the control plane's naming rule.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidAgentName`] when the name does not match.
pub fn validate_agent_name(name: &str) -> Result<(), ConfigError> {
    if AGENT_NAME_RE.is_match(name) {
        Ok(())
    } else {
        Err(ConfigError::InvalidAgentName(name.to_string()))
    }
}

/// Validates a bucket name against the general-purpose bucket naming rules.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidBucketName`] describing the first violated rule.
pub fn validate_bucket_name(bucket: &str) -> Result<(), ConfigError> {
    let invalid = |reason: &str| {
        Err(ConfigError::InvalidBucketName {
            bucket: bucket.to_string(),
            reason: reason.to_string(),
        })
    };
    if !(3..=63).contains(&bucket.len()) {
        return invalid("must be 3-63 characters long");
    }
    if !bucket
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '.' || c == '-')
    {
        return invalid("only lowercase letters, digits, '.' and '-' are allowed");
    }
    let starts_ok = bucket.starts_with(|c: char| c.is_ascii_alphanumeric());
    let ends_ok = bucket.ends_with(|c: char| c.is_ascii_alphanumeric());
    if !starts_ok || !ends_ok {
        return invalid("must begin and end with a letter or digit");
    }
    if bucket.contains("..") {
        return invalid("must not contain two adjacent periods");
    }
    let parts: Vec<&str> = bucket.split('.').collect();
    if parts.len() == 4 && parts.iter().all(|p| !p.is_empty() && p.chars().all(|c| c.is_ascii_digit())) {
        return invalid("must not be formatted as an IP address");
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
