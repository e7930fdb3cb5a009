//! Upgrading the wrapped trek CLI.
//!
//! This flow is independent of the self-update pipeline and is always
//! best-effort: the caller downgrades any error here to a warning with a
//! manual-upgrade hint, because a stale trek must never fail a cairn upgrade
//! that already succeeded.

pub mod detect;

use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::anyhow;
use tracing::{debug, info};

use crate::env::Environment;
use crate::error::Result;
use crate::ui;
use crate::upgrade::version;
use detect::{detect_install, InstallMethod};

/// Name of the wrapped CLI binary.
pub const TREK_BIN: &str = "trek";

/// Global npm package that shadows the official install when present.
pub const NPM_PACKAGE: &str = "trek-cli";

/// Official install script endpoint.
pub const INSTALL_SCRIPT_URL: &str = "https://trek.dev/install.sh";

/// One-liner shown when the automatic upgrade fails.
pub const MANUAL_HINT: &str = "curl -fsSL https://trek.dev/install.sh | bash";

/// Upgrade the trek CLI along its detected install path.
///
/// Exactly one upgrade command is dispatched: `brew upgrade` for a Homebrew
/// install, the official install script otherwise. A conflicting global npm
/// install is removed first since it shadows the official binary on PATH.
pub fn upgrade(env: &Environment) -> Result<()> {
    let binary = resolve_binary(env);
    let old_version = binary.as_deref().and_then(query_version);

    match &binary {
        Some(path) => {
            let method = detect_install(path);
            info!("trek at {} (install method: {})", path.display(), method.name());

            match method {
                InstallMethod::Homebrew => brew_upgrade()?,
                InstallMethod::Npm => {
                    ui::detail("removing npm-managed trek, it shadows the official install");
                    npm_uninstall()?;
                    run_installer()?;
                }
                InstallMethod::Installer => run_installer()?,
            }
        }
        None => {
            ui::detail("trek not found on PATH, installing fresh");
            run_installer()?;
        }
    }

    match (old_version, resolve_binary(env).as_deref().and_then(query_version)) {
        (Some(old), Some(new)) if old != new => ui::success(&format!("trek {old} -> {new}")),
        (Some(_), Some(new)) => ui::success(&format!("trek {new} is current")),
        (None, Some(new)) => ui::success(&format!("trek {new} installed")),
        _ => {}
    }

    Ok(())
}

/// Locate the trek binary: the injected override, else a PATH lookup.
fn resolve_binary(env: &Environment) -> Option<PathBuf> {
    if let Some(path) = env.trek_override() {
        return Some(path.clone());
    }
    which::which(TREK_BIN).ok()
}

/// Ask a trek binary for its version.
pub(crate) fn query_version(path: &Path) -> Option<String> {
    let output = Command::new(path).arg("--version").output().ok()?;
    if !output.status.success() {
        return None;
    }
    version::extract_semver(&String::from_utf8_lossy(&output.stdout))
}

fn brew_upgrade() -> Result<()> {
    run_checked(
        Command::new("brew").args(["upgrade", TREK_BIN]),
        "brew upgrade",
    )
}

fn npm_uninstall() -> Result<()> {
    run_checked(
        Command::new("npm").args(["uninstall", "-g", NPM_PACKAGE]),
        "npm uninstall",
    )
}

fn run_installer() -> Result<()> {
    run_checked(
        Command::new("sh")
            .arg("-c")
            .arg(format!("curl -fsSL {INSTALL_SCRIPT_URL} | bash")),
        "official install script",
    )
}

fn run_checked(cmd: &mut Command, what: &str) -> Result<()> {
    debug!("running {what}");
    let status = cmd
        .status()
        .map_err(|e| anyhow!("failed to run {what}: {e}"))?;
    if !status.success() {
        return Err(anyhow!("{what} exited with {status}").into());
    }
    Ok(())
}
