//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// cairn - workspace companion and upgrade manager for the Trek agent CLI.
#[derive(Debug, Parser)]
#[command(name = "cairn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Upgrade cairn and the trek CLI to the latest release
    Upgrade(UpgradeArgs),

    /// Manage materialized workspace templates
    Assets(AssetsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `upgrade` command.
///
/// Exit codes: 0 on success, declined prompt, or already up to date; 3 when
/// `--check` finds an update available; 1 on hard failure.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct UpgradeArgs {
    /// Check for a newer release without installing
    #[arg(long)]
    pub check: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    pub yes: bool,

    /// Upgrade only the cairn binary
    #[arg(long)]
    pub self_only: bool,

    /// Upgrade only the trek CLI
    #[arg(long)]
    pub cli_only: bool,
}

/// Arguments for the `assets` command.
#[derive(Debug, Clone, clap::Args)]
pub struct AssetsArgs {
    #[command(subcommand)]
    pub action: AssetsAction,
}

/// Template management actions.
#[derive(Debug, Clone, Subcommand)]
pub enum AssetsAction {
    /// Re-materialize embedded templates into the cairn home
    Refresh,
    /// List embedded templates
    List,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}
