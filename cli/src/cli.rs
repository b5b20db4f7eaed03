//! CLI argument parsing with clap derive

use std::path::PathBuf;

use agentctl_common::StorageMode;
use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags, SourceFlags};
use crate::commands;
use crate::domain::config::Overrides;
use crate::infra::record_store::DEFAULT_RECORD_FILE;
use crate::output::{OutputContext, Renderer};

/// Deploy, exercise and tear down managed AI agents
#[derive(Parser)]
#[command(
    name = "agentctl",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Configuration file (default: ./agentctl.yaml when present)
    #[arg(long, global = true, env = "AGENTCTL_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Deployment record written by `deploy`
    #[arg(
        long,
        global = true,
        env = "AGENTCTL_RECORD",
        value_name = "PATH",
        default_value = DEFAULT_RECORD_FILE
    )]
    pub record: PathBuf,

    /// Region override
    #[arg(long, global = true, value_name = "REGION")]
    pub region: Option<String>,

    /// Storage mode override
    #[arg(long, global = true, value_enum)]
    pub storage: Option<StorageMode>,

    /// Agent preset override
    #[arg(long, global = true, value_name = "NAME")]
    pub preset: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check account permissions before deploying
    Verify,

    /// Create storage, agent and alias, then save the deployment record
    Deploy,

    /// Send test prompts to the deployed agent
    Test(commands::test::TestArgs),

    /// Delete the deployed agent and its dedicated bucket
    Cleanup(commands::cleanup::CleanupArgs),

    /// Inspect configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if settings cannot be resolved or the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            config,
            record,
            region,
            storage,
            preset,
            command,
        } = self;

        let output = OutputFlags {
            no_color,
            quiet,
            json,
        };
        let sources = SourceFlags {
            config,
            record,
            overrides: Overrides {
                region,
                storage_mode: storage,
                preset,
                ..Overrides::default()
            },
        };
        // `version` must work without a usable config file.
        let app = |yes: bool| {
            AppContext::new(AppFlags {
                output,
                behaviour: BehaviourFlags { yes },
                sources,
            })
        };

        match command {
            Command::Version => {
                let ctx = OutputContext::new(no_color, quiet);
                commands::version::run(&Renderer::new(&ctx, json))
            }
            Command::Verify => commands::verify::run(&app(false)?).await,
            Command::Deploy => commands::deploy::run(&app(false)?).await,
            Command::Test(args) => commands::test::run(&app(false)?, args).await,
            Command::Cleanup(args) => commands::cleanup::run(&app(args.yes)?).await,
            Command::Config(cmd) => commands::config::run(&app(false)?, cmd),
        }
    }
}
