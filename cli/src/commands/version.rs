//! Version command

use anyhow::Result;

use crate::output::Renderer;

/// Run the version command.
///
/// # Errors
///
/// Returns an error if the JSON object cannot be printed.
pub fn run(renderer: &Renderer<'_>) -> Result<()> {
    renderer.version(env!("CARGO_PKG_VERSION"))
}
