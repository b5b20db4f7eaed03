//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod cleanup;
pub mod config;
pub mod error;
pub mod invocation;
pub mod presets;
pub mod verification;

pub use cleanup::{
    CleanupOutcome, CleanupReport, MAX_DELETE_BATCH, ObjectVersion, StepOutcome, VersionCursor,
    VersionPage, is_confirmed,
};
pub use config::{ConfigFile, Overrides, Settings, validate_agent_name, validate_bucket_name};
pub use error::{ConfigError, DeployError, RemoteError, RemoteErrorKind};
pub use invocation::{PromptOutcome, SmokeTestReport, Utf8Fragments, session_id};
pub use verification::{CheckKind, CheckResult, DenialOutcome, VerificationReport};
