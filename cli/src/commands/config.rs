//! `agentctl config`: inspect the resolved configuration.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show the settings every command would use
    Show,
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the JSON output cannot be printed.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => app.renderer().settings(&app.settings),
    }
}
