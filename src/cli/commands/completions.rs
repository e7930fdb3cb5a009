//! The `completions` command.

use clap::CommandFactory;
use clap_complete::generate;

use super::CommandResult;
use crate::cli::args::{Cli, CompletionsArgs};
use crate::error::Result;

/// Execute the `completions` command.
pub fn run(args: &CompletionsArgs) -> Result<CommandResult> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(args.shell, &mut cmd, name, &mut std::io::stdout());
    Ok(CommandResult::success())
}
