use serde::{Deserialize, Serialize};

/// How an agent's data bucket is provisioned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum StorageMode {
    /// Agents live under a prefix of the team's existing bucket.
    #[default]
    Shared,
    /// Each agent gets its own bucket, created on deploy and removed on cleanup.
    Dedicated,
}

impl StorageMode {
    /// Whether this mode creates (and therefore owns) its bucket.
    #[must_use]
    pub fn owns_bucket(self) -> bool {
        matches!(self, Self::Dedicated)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Shared => "shared",
            Self::Dedicated => "dedicated",
        }
    }
}

impl std::fmt::Display for StorageMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for StorageMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shared" => Ok(Self::Shared),
            "dedicated" => Ok(Self::Dedicated),
            other => Err(format!("unknown storage mode '{other}' (expected shared or dedicated)")),
        }
    }
}
