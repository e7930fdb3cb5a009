//! The `upgrade` command.
//!
//! Orchestrates the self-update pipeline as a fixed sequence of numbered
//! steps: check, download, install, template refresh, settings merge, trek
//! upgrade. The step total is computed from the flags before the pipeline
//! starts and never changes mid-run. Post-install steps are best-effort;
//! their failures are collected and reported as warnings at the end, because
//! the binary itself has already been replaced by then.

use std::fs;
use std::path::{Path, PathBuf};

use super::CommandResult;
use crate::assets;
use crate::cli::args::UpgradeArgs;
use crate::env::Environment;
use crate::error::{CairnError, Result};
use crate::settings;
use crate::trek;
use crate::ui;
use crate::upgrade::{
    archive, checksum, download, find_asset, release, replace, version, ReleaseClient, Stepper,
    BIN_NAME,
};

/// Validated upgrade flags.
#[derive(Debug, Clone, Copy)]
pub struct UpgradeFlags {
    pub check_only: bool,
    pub auto_yes: bool,
    pub self_only: bool,
    pub cli_only: bool,
}

impl UpgradeFlags {
    /// Validate raw CLI flags.
    ///
    /// `--self-only --cli-only` is contradictory and fails here, before any
    /// network call is made.
    pub fn from_args(args: &UpgradeArgs) -> Result<Self> {
        if args.self_only && args.cli_only {
            return Err(CairnError::MutuallyExclusive);
        }
        Ok(Self {
            check_only: args.check,
            auto_yes: args.yes,
            self_only: args.self_only,
            cli_only: args.cli_only,
        })
    }

    /// Total pipeline steps for these flags.
    pub fn total_steps(&self) -> usize {
        if self.cli_only {
            1
        } else if self.self_only {
            5
        } else {
            6
        }
    }
}

/// Execute the `upgrade` command.
pub fn run(args: &UpgradeArgs, env: &Environment) -> Result<CommandResult> {
    let flags = UpgradeFlags::from_args(args)?;
    let mut stepper = Stepper::new(flags.total_steps());
    let mut warnings: Vec<String> = Vec::new();

    if flags.cli_only {
        trek_step(env, &mut stepper, &mut warnings);
        report_warnings(&warnings);
        return Ok(CommandResult::success());
    }

    ui::step(stepper.next(), stepper.total(), "Checking for updates");
    let client = ReleaseClient::new(env)?;
    let latest = client.fetch_latest()?;
    let current = version::VERSION;
    ui::detail(&format!(
        "current {}, latest {} (published {})",
        version::normalize(current),
        version::normalize(&latest.tag_name),
        latest.published_at.format("%Y-%m-%d")
    ));

    let up_to_date = version::is_up_to_date(current, &latest.tag_name);

    if flags.check_only {
        if up_to_date {
            ui::success("already up to date");
            return Ok(CommandResult::success());
        }
        print_changelog(&latest);
        return Err(CairnError::UpdateAvailable {
            current: version::normalize(current),
            latest: version::normalize(&latest.tag_name),
        });
    }

    if up_to_date {
        ui::success("cairn is up to date");
        if flags.self_only {
            return Ok(CommandResult::success());
        }
        trek_step(env, &mut stepper, &mut warnings);
        report_warnings(&warnings);
        return Ok(CommandResult::success());
    }

    if !flags.auto_yes {
        let question = format!(
            "Upgrade cairn {} -> {}?",
            version::normalize(current),
            version::normalize(&latest.tag_name)
        );
        if !ui::confirm(&question)? {
            ui::info("upgrade cancelled");
            return Ok(CommandResult::success());
        }
    }

    ui::step(stepper.next(), stepper.total(), "Downloading release");
    let asset = find_asset(&latest, release::platform_os(), release::platform_arch())?;
    ui::detail(&asset.name);
    let work = WorkDir::create()?;
    let archive_path = work.path().join(&asset.name);
    download::download_asset(asset, &archive_path)?;
    checksum::verify(&client, &latest, &archive_path, &asset.name)?;

    ui::step(stepper.next(), stepper.total(), "Installing new binary");
    let new_binary = archive::extract_binary(&archive_path, work.path(), BIN_NAME)?;
    let install = replace::replace_binary(env, &new_binary)?;
    ui::success(&format!(
        "cairn upgraded {} -> {} at {}",
        version::normalize(current),
        version::normalize(&latest.tag_name),
        install.display()
    ));

    ui::step(stepper.next(), stepper.total(), "Refreshing templates");
    if let Err(e) = assets::refresh(env) {
        warnings.push(format!("template refresh failed: {e}"));
    }

    ui::step(stepper.next(), stepper.total(), "Merging default settings");
    if let Err(e) = settings::merge_defaults(env) {
        warnings.push(format!("settings merge failed: {e}"));
    }

    if !flags.self_only {
        trek_step(env, &mut stepper, &mut warnings);
    }

    report_warnings(&warnings);
    Ok(CommandResult::success())
}

/// Run the trek upgrade as a numbered step; failures become warnings.
fn trek_step(env: &Environment, stepper: &mut Stepper, warnings: &mut Vec<String>) {
    ui::step(stepper.next(), stepper.total(), "Upgrading trek CLI");
    if let Err(e) = trek::upgrade(env) {
        warnings.push(format!(
            "trek upgrade failed: {e}; run `{}` manually",
            trek::MANUAL_HINT
        ));
    }
}

/// Print the changelog body, each non-empty line indented.
fn print_changelog(latest: &release::Release) {
    if latest.body.trim().is_empty() {
        return;
    }
    for line in latest.body.lines().filter(|line| !line.trim().is_empty()) {
        ui::detail(line);
    }
}

fn report_warnings(warnings: &[String]) {
    for warning in warnings {
        ui::warning(warning);
    }
}

/// Per-process scratch directory for the downloaded archive; removed on drop.
struct WorkDir(PathBuf);

impl WorkDir {
    fn create() -> Result<Self> {
        let path = std::env::temp_dir().join(format!("cairn-upgrade-{}", std::process::id()));
        fs::create_dir_all(&path)?;
        Ok(Self(path))
    }

    fn path(&self) -> &Path {
        &self.0
    }
}

impl Drop for WorkDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}
