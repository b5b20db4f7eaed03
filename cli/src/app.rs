//! Application context: unified state passed to every command handler.
//!
//! `AppContext` replaces the per-command pattern of constructing loose
//! `OutputContext`, `AwsCli`, and `JsonRecordStore` instances. Settings are
//! resolved once here and only ever read afterwards.

use std::path::PathBuf;

use anyhow::Result;

use crate::domain::config::{Overrides, Settings};
use crate::infra::agent_runtime::SdkAgentRuntime;
use crate::infra::aws_cli::AwsCli;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::config::resolve_settings;
use crate::infra::prompt::TerminalPrompt;
use crate::infra::record_store::JsonRecordStore;
use crate::output::{OutputContext, Renderer, SpinnerPause, TerminalReporter};

/// Overrides the `aws` executable, e.g. with a wrapper script.
pub const AWS_PROGRAM_ENV: &str = "AGENTCTL_AWS";

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Answer `yes` to confirmations (also set by `AGENTCTL_YES`).
    pub yes: bool,
}

/// Where settings and the record come from.
pub struct SourceFlags {
    pub config: Option<PathBuf>,
    pub record: PathBuf,
    pub overrides: Overrides,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    pub output: OutputFlags,
    pub behaviour: BehaviourFlags,
    pub sources: SourceFlags,
}

/// Unified application context passed to every command handler.
///
/// Constructed once in `Cli::run()` and passed as `&AppContext` to all
/// command handlers.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode). Quiet in JSON mode.
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Settings resolved from defaults, file, environment and flags.
    pub settings: Settings,
    /// Deployment record location.
    pub record_path: PathBuf,
    /// Confirmations are answered `yes` without asking.
    ///
    /// Set when `--yes` / `-y` is passed or `AGENTCTL_YES` is present.
    pub assume_yes: bool,
    /// No prompt is shown; unanswered confirmations are declined.
    ///
    /// Set by `assume_yes` or when the `CI` environment variable is present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be resolved.
    pub fn new(flags: AppFlags) -> Result<Self> {
        let assume_yes = flags.behaviour.yes || std::env::var_os("AGENTCTL_YES").is_some();
        let non_interactive = assume_yes || std::env::var_os("CI").is_some();

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let settings =
            resolve_settings(flags.sources.config.as_deref(), flags.sources.overrides)?;

        Ok(Self {
            output: OutputContext::new(
                flags.output.no_color,
                flags.output.quiet || flags.output.json,
            ),
            mode,
            settings,
            record_path: flags.sources.record,
            assume_yes,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(&self.output, self.is_json())
    }

    #[must_use]
    pub fn reporter(&self) -> TerminalReporter<'_> {
        TerminalReporter::new(&self.output)
    }

    #[must_use]
    pub fn pause(&self) -> SpinnerPause<'_> {
        SpinnerPause::new(&self.output)
    }

    #[must_use]
    pub fn record_store(&self) -> JsonRecordStore {
        JsonRecordStore::with_path(self.record_path.clone())
    }

    #[must_use]
    pub fn prompt(&self) -> TerminalPrompt {
        TerminalPrompt::new(self.assume_yes, self.non_interactive)
    }

    /// Control-plane adapter bound to `region`.
    #[must_use]
    pub fn cloud(&self, region: &str) -> AwsCli<TokioCommandRunner> {
        let cli = AwsCli::default_runner(region);
        match std::env::var(AWS_PROGRAM_ENV) {
            Ok(program) if !program.trim().is_empty() => cli.with_program(program),
            _ => cli,
        }
    }

    /// Agent runtime client bound to `region`.
    pub async fn runtime(&self, region: &str) -> SdkAgentRuntime {
        SdkAgentRuntime::from_env(region).await
    }
}
