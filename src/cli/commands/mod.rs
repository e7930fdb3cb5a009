//! Command implementations and dispatch.

pub mod assets;
pub mod completions;
pub mod upgrade;

use crate::cli::args::{Cli, Commands};
use crate::env::Environment;
use crate::error::Result;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// Whether the command succeeded.
    pub success: bool,

    /// Exit code to use (0 for success, non-zero for failure).
    pub exit_code: i32,
}

impl CommandResult {
    /// Create a successful result.
    pub fn success() -> Self {
        Self {
            success: true,
            exit_code: 0,
        }
    }

    /// Create a failure result.
    pub fn failure(exit_code: i32) -> Self {
        Self {
            success: false,
            exit_code,
        }
    }
}

/// Route a parsed CLI invocation to its command implementation.
pub fn dispatch(cli: &Cli, env: &Environment) -> Result<CommandResult> {
    match &cli.command {
        Commands::Upgrade(args) => upgrade::run(args, env),
        Commands::Assets(args) => assets::run(args, env),
        Commands::Completions(args) => completions::run(args),
    }
}
