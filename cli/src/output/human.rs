//! Human-readable terminal renderer.

use std::path::Path;

use agentctl_common::{DeploymentRecord, StorageMode};
use owo_colors::OwoColorize as _;

use crate::domain::config::Settings;
use crate::domain::{
    CleanupOutcome, CleanupReport, DeployError, SmokeTestReport, StepOutcome, VerificationReport,
};
use crate::output::OutputContext;

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information. Printed even when quiet.
    pub fn render_version(&self, version: &str) {
        println!("agentctl {version}");
    }

    /// Title framed by rules.
    pub fn render_banner(&self, title: &str) {
        self.ctx.banner(title);
    }

    /// Title block shown before a command talks to the control plane.
    pub fn render_target(&self, title: &str, settings: &Settings) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.banner(title);
        self.ctx.kv("Account:", &settings.account_id);
        self.ctx.kv("Region: ", &settings.region);
        self.ctx.kv("Storage:", settings.storage.mode.as_str());
        println!();
    }

    pub fn render_verification(&self, report: &VerificationReport) {
        if self.ctx.quiet {
            return;
        }
        let s = &self.ctx.styles;
        println!();
        self.ctx.banner("Verification Summary");
        for check in &report.checks {
            let status = if check.passed {
                format!("{}", "✓ PASS".style(s.success))
            } else {
                format!("{}", "✗ FAIL".style(s.error))
            };
            println!(
                "  {status}  {:<15} {}",
                check.check.label().to_uppercase(),
                check.check.title().style(s.dim)
            );
            for warning in &check.warnings {
                println!("            {} {warning}", "⚠".style(s.warning));
            }
        }
        println!();
        if report.all_passed {
            self.ctx.success("All checks passed! Ready to deploy agents.");
            self.ctx.info("Run: agentctl deploy");
        } else {
            self.ctx
                .warn("Some checks failed. Contact your infrastructure team.");
            self.ctx.kv("Required policy:", report.required_policy());
        }
    }

    /// Summary after a successful deploy.
    pub fn render_deployed(&self, record: &DeploymentRecord, settings: &Settings, saved_to: &Path) {
        if self.ctx.quiet {
            return;
        }
        self.ctx
            .success(&format!("deployment record saved to {}", saved_to.display()));
        println!();
        self.ctx.banner("Deployment Complete");
        self.ctx.kv("Agent ID: ", &record.agent_id);
        self.ctx.kv("Alias ID: ", &record.alias_id);
        if let Some(bucket) = &record.s3_bucket {
            self.ctx.kv("Bucket:   ", bucket);
        }
        self.ctx.kv("Prefix:   ", &settings.storage.prefix);
        println!();
        self.ctx.header("Next steps:");
        println!(
            "  1. Console: https://console.aws.amazon.com/bedrock/home?region={}#/agents/{}",
            record.region, record.agent_id
        );
        println!("  2. Test:    agentctl test");
        if settings.storage.mode == StorageMode::Dedicated {
            if let Some(folder) = settings.folder_paths().first() {
                println!("  3. Upload:  aws s3 cp video.mp4 {folder}/");
            }
        }
    }

    /// Orphaned resources left by a failed deploy. Written to stderr.
    pub fn render_deploy_failure(&self, err: &DeployError) {
        let orphaned = err.orphaned();
        if !orphaned.is_empty() {
            self.ctx.error("these resources were created and not removed:");
            for resource in orphaned {
                eprintln!("      - {resource}");
            }
        }
        self.ctx
            .error("Contact your infrastructure team if you need help.");
    }

    /// Identifiers of a loaded deployment record.
    pub fn render_record(&self, record: &DeploymentRecord) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.kv("Agent ID:  ", &record.agent_id);
        self.ctx.kv("Alias ID:  ", &record.alias_id);
        self.ctx.kv("Agent Name:", &record.agent_name);
        if let Some(bucket) = &record.s3_bucket {
            self.ctx.kv("Bucket:    ", bucket);
        }
    }

    pub fn render_smoke_test(&self, report: &SmokeTestReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        self.ctx.banner("Testing Complete");
        let total = report.outcomes.len();
        let failed = report.failures();
        if failed == 0 {
            self.ctx.success(&format!("{total} of {total} prompts answered"));
        } else {
            self.ctx
                .warn(&format!("{} of {total} prompts answered", total - failed));
        }
    }

    /// Nothing to test or clean up.
    pub fn render_no_record(&self, path: &Path) {
        self.ctx.info(&format!(
            "No deployment record at {}. Run: agentctl deploy",
            path.display()
        ));
    }

    pub fn render_cleanup_outcome(&self, outcome: &CleanupOutcome) {
        match outcome {
            CleanupOutcome::Cancelled => self.ctx.info("Cleanup cancelled."),
            CleanupOutcome::Completed(report) => self.render_cleanup(report),
        }
    }

    pub fn render_cleanup(&self, report: &CleanupReport) {
        if self.ctx.quiet {
            return;
        }
        println!();
        if report.has_failures() {
            self.ctx.warn("Cleanup finished with errors.");
        } else {
            self.ctx.success("Cleanup complete!");
        }
        if let (Some(bucket), Some(StepOutcome::Deleted)) = (&report.bucket, &report.bucket_outcome)
        {
            self.ctx.kv(
                "Removed:",
                &format!("{bucket} ({} object versions)", report.objects_deleted),
            );
        }
        self.ctx
            .info("Shared infrastructure (image repository, execution role) was not deleted.");
    }

    /// Resolved settings for `config show`.
    pub fn render_settings(&self, settings: &Settings) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.header("Target:");
        self.ctx.kv("  region:            ", &settings.region);
        self.ctx.kv("  account_id:        ", &settings.account_id);
        self.ctx.header("Agent:");
        self.ctx.kv("  preset:            ", &settings.preset);
        self.ctx.kv("  name:              ", &settings.agent.name);
        self.ctx.kv("  description:       ", &settings.agent.description);
        self.ctx.kv("  foundation_model:  ", &settings.agent.foundation_model);
        self.ctx.kv(
            "  idle_session_ttl:  ",
            &format!("{}s", settings.agent.idle_session_ttl),
        );
        self.ctx.kv("  alias_name:        ", &settings.alias_name);
        self.ctx.header("Storage:");
        self.ctx.kv("  mode:              ", settings.storage.mode.as_str());
        self.ctx.kv("  bucket:            ", &settings.storage.bucket_name);
        self.ctx.kv("  prefix:            ", &settings.storage.prefix);
        self.ctx.kv("  folders:           ", &settings.storage.folders.join(", "));
        self.ctx.header("Shared resources:");
        self.ctx.kv("  repository:        ", &settings.repository);
        self.ctx.kv("  execution_role:    ", &settings.execution_role_arn);
        self.ctx.header("Timing:");
        self.ctx.kv("  alias_delay:       ", &format!("{}s", settings.alias_delay_secs));
        self.ctx.kv("  prompt_delay:      ", &format!("{}s", settings.prompt_delay_secs));
        self.ctx.header("Test prompts:");
        for (i, prompt) in settings.test_prompts.iter().enumerate() {
            println!("  {}. {prompt}", i + 1);
        }
    }
}
