//! The `assets` command.

use super::CommandResult;
use crate::assets;
use crate::cli::args::{AssetsAction, AssetsArgs};
use crate::env::Environment;
use crate::error::Result;
use crate::ui;

/// Execute the `assets` command.
pub fn run(args: &AssetsArgs, env: &Environment) -> Result<CommandResult> {
    match args.action {
        AssetsAction::Refresh => {
            let written = assets::refresh(env)?;
            ui::success(&format!(
                "{} template files written to {}",
                written,
                env.templates_dir().display()
            ));
        }
        AssetsAction::List => {
            for name in assets::template_names() {
                ui::info(&name);
            }
        }
    }
    Ok(CommandResult::success())
}
