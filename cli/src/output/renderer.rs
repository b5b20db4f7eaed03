//! `Renderer`: one entry point for command output in either mode.
//!
//! Commands call `app.renderer()` and never branch on `--json` themselves.

use std::path::Path;

use agentctl_common::DeploymentRecord;
use anyhow::Result;

use crate::domain::config::Settings;
use crate::domain::{CleanupOutcome, DeployError, SmokeTestReport, VerificationReport};
use crate::output::{HumanRenderer, OutputContext, json};

pub enum Renderer<'a> {
    Human(HumanRenderer<'a>),
    Json(json::JsonRenderer),
}

impl<'a> Renderer<'a> {
    #[must_use]
    pub fn new(ctx: &'a OutputContext, json: bool) -> Self {
        if json {
            Self::Json(json::JsonRenderer)
        } else {
            Self::Human(HumanRenderer::new(ctx))
        }
    }

    pub fn version(&self, version: &str) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_version(version);
                Ok(())
            }
            Self::Json(r) => r.render_version(version),
        }
    }

    pub fn target(&self, title: &str, settings: &Settings) {
        if let Self::Human(r) = self {
            r.render_target(title, settings);
        }
    }

    /// Identifiers of the record a command is about to act on.
    pub fn record(&self, title: &str, record: &DeploymentRecord) {
        if let Self::Human(r) = self {
            r.render_banner(title);
            r.render_record(record);
        }
    }

    pub fn no_record(&self, path: &Path) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_no_record(path);
                Ok(())
            }
            Self::Json(r) => r.render_no_record(path),
        }
    }

    pub fn verification(&self, report: &VerificationReport) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_verification(report);
                Ok(())
            }
            Self::Json(_) => json::print(report),
        }
    }

    pub fn deployed(
        &self,
        record: &DeploymentRecord,
        settings: &Settings,
        saved_to: &Path,
    ) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_deployed(record, settings, saved_to);
                Ok(())
            }
            Self::Json(_) => json::print(record),
        }
    }

    /// Orphaned resources go to stderr in both modes.
    pub fn deploy_failure(&self, err: &DeployError) {
        match self {
            Self::Human(r) => r.render_deploy_failure(err),
            Self::Json(_) => {
                for resource in err.orphaned() {
                    tracing::error!(resource = %resource, "left behind by failed deploy");
                }
            }
        }
    }

    pub fn smoke_test(&self, report: &SmokeTestReport) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_smoke_test(report);
                Ok(())
            }
            Self::Json(_) => json::print(report),
        }
    }

    pub fn cleanup(&self, outcome: &CleanupOutcome) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_cleanup_outcome(outcome);
                Ok(())
            }
            Self::Json(_) => json::print(outcome),
        }
    }

    pub fn settings(&self, settings: &Settings) -> Result<()> {
        match self {
            Self::Human(r) => {
                r.render_settings(settings);
                Ok(())
            }
            Self::Json(_) => json::print(settings),
        }
    }
}
