//! Typed domain error enums.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator.

use thiserror::Error;

// ── Remote control-plane errors ───────────────────────────────────────────────

/// Broad classification of a failed control-plane call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteErrorKind {
    /// The caller is not authorized for the operation.
    AccessDenied,
    /// `CreateBucket` on a bucket the caller already owns.
    BucketAlreadyOwnedByYou,
    /// `CreateBucket` on a name taken by another account.
    BucketAlreadyExists,
    /// The named resource does not exist.
    NotFound,
    /// Any other service-side error code.
    Service,
    /// The call never reached the service (spawn failure, timeout, broken pipe).
    Transport,
    /// The service answered but the response could not be parsed.
    Malformed,
}

/// A failed control-plane call, carrying the error kind as payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} failed ({code}): {message}")]
pub struct RemoteError {
    /// Operation name, e.g. `CreateAgent`.
    pub operation: String,
    pub kind: RemoteErrorKind,
    /// Service error code, e.g. `AccessDeniedException`.
    pub code: String,
    pub message: String,
}

impl RemoteError {
    #[must_use]
    pub fn new(
        operation: impl Into<String>,
        kind: RemoteErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            operation: operation.into(),
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// The call could not be completed at the transport level.
    #[must_use]
    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(operation, RemoteErrorKind::Transport, "Transport", message)
    }

    /// The response could not be decoded.
    #[must_use]
    pub fn malformed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(operation, RemoteErrorKind::Malformed, "Malformed", message)
    }

    /// Classify a service error reported with an explicit code, as SDK
    /// clients do.
    #[must_use]
    pub fn from_code(
        operation: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let (code, message) = (code.into(), message.into());
        let kind = classify(&code, &message);
        Self::new(operation, kind, code, message)
    }

    /// Classify a failure from the control-plane CLI's stderr.
    ///
    /// The CLI reports service errors as
    /// `An error occurred (<Code>) when calling the <Op> operation: <message>`.
    /// Output that does not follow this shape is kept verbatim as the message.
    #[must_use]
    pub fn from_cli_stderr(operation: impl Into<String>, stderr: &str) -> Self {
        let stderr = stderr.trim();
        let (code, message) = parse_cli_error(stderr);
        let kind = classify(&code, &message);
        Self::new(operation, kind, code, message)
    }

    #[must_use]
    pub fn is_access_denied(&self) -> bool {
        self.kind == RemoteErrorKind::AccessDenied
    }

    #[must_use]
    pub fn is(&self, kind: RemoteErrorKind) -> bool {
        self.kind == kind
    }
}

fn parse_cli_error(stderr: &str) -> (String, String) {
    const MARKER: &str = "An error occurred (";
    let Some(start) = stderr.find(MARKER) else {
        let message = if stderr.is_empty() {
            "no error output".to_string()
        } else {
            stderr.to_string()
        };
        return ("Unknown".to_string(), message);
    };
    let rest = &stderr[start + MARKER.len()..];
    let Some(end) = rest.find(')') else {
        return ("Unknown".to_string(), stderr.to_string());
    };
    let code = rest[..end].to_string();
    let message = rest[end..]
        .split_once("operation: ")
        .map_or_else(|| rest[end + 1..].trim(), |(_, m)| m.trim())
        .to_string();
    (code, message)
}

fn classify(code: &str, message: &str) -> RemoteErrorKind {
    match code {
        "BucketAlreadyOwnedByYou" => RemoteErrorKind::BucketAlreadyOwnedByYou,
        "BucketAlreadyExists" => RemoteErrorKind::BucketAlreadyExists,
        "403" | "UnauthorizedOperation" => RemoteErrorKind::AccessDenied,
        "404" | "NoSuchBucket" | "NoSuchEntity" | "NoSuchKey" => RemoteErrorKind::NotFound,
        c if c.contains("Denied") || message.contains("Denied") => RemoteErrorKind::AccessDenied,
        c if c.ends_with("NotFound") || c.ends_with("NotFoundException") => {
            RemoteErrorKind::NotFound
        }
        _ => RemoteErrorKind::Service,
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors raised while resolving settings, before any remote call.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown agent preset '{name}'\n\nValid presets: {valid}")]
    UnknownPreset { name: String, valid: String },

    #[error(
        "Invalid agent name '{0}': must match ([0-9a-zA-Z][_-]?){{1,100}} (letters, digits, single '_' or '-' separators)"
    )]
    InvalidAgentName(String),

    #[error("Invalid bucket name '{bucket}': {reason}")]
    InvalidBucketName { bucket: String, reason: String },

    #[error("Invalid idle session TTL {0}s: must be between 60 and 3600 seconds")]
    InvalidIdleTtl(u32),

    #[error("Setting '{0}' must not be empty")]
    Empty(&'static str),
}

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// A deploy pipeline stage failed.
///
/// Stages after the first leave earlier resources in place; `orphaned()`
/// lists them so the operator can report them.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("cannot provision bucket {bucket}")]
    Bucket { bucket: String, source: RemoteError },

    #[error("cannot create agent {name}")]
    CreateAgent {
        name: String,
        source: RemoteError,
        orphaned: Vec<String>,
    },

    #[error("cannot prepare agent {agent_id}")]
    Prepare {
        agent_id: String,
        source: RemoteError,
        orphaned: Vec<String>,
    },

    #[error("cannot create alias for agent {agent_id}")]
    Alias {
        agent_id: String,
        source: RemoteError,
        orphaned: Vec<String>,
    },

    #[error("cannot save deployment record: {message}")]
    Persist {
        message: String,
        orphaned: Vec<String>,
    },
}

impl DeployError {
    /// Resources created by this run that remain after the failure.
    #[must_use]
    pub fn orphaned(&self) -> &[String] {
        match self {
            Self::Bucket { .. } => &[],
            Self::CreateAgent { orphaned, .. }
            | Self::Prepare { orphaned, .. }
            | Self::Alias { orphaned, .. }
            | Self::Persist { orphaned, .. } => orphaned,
        }
    }
}
