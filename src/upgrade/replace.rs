//! Staged, verified, atomic replacement of the running executable.
//!
//! The live binary is never written to directly. The new binary is staged
//! next to the install path (same filesystem, so the final move is a single
//! rename), proven runnable with a `--version` probe, and only then swapped
//! in. On any exit path the staged file is removed, so the only observable
//! states are "old binary" and "fully verified new binary".

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{self, Command};

use anyhow::anyhow;
use tracing::{debug, warn};

use crate::env::Environment;
use crate::error::{CairnError, Result};

/// Replace the installed binary with `new_binary`.
///
/// Returns the install path that was replaced.
pub fn replace_binary(env: &Environment, new_binary: &Path) -> Result<PathBuf> {
    let install = env.install_path()?;
    let file_name = install
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("install path has no file name: {}", install.display()))?;

    // Unique per process; suffix is what post-run cleanup checks key on
    let staged = install.with_file_name(format!("{}.{}.upgrade-tmp", file_name, process::id()));
    fs::copy(new_binary, &staged)?;
    let _cleanup = StagedFile(staged.clone());

    make_executable(&staged)?;
    verify_staged(&staged)?;

    debug!("renaming {} -> {}", staged.display(), install.display());
    if let Err(direct) = fs::rename(&staged, &install) {
        escalated_move(&staged, &install, &direct)?;
    }

    Ok(install)
}

/// Run the staged binary's version probe before it may replace anything.
///
/// A download that unpacked cleanly can still be the wrong architecture, a
/// truncated executable, or otherwise broken; it must prove it runs.
fn verify_staged(staged: &Path) -> Result<()> {
    match Command::new(staged).arg("--version").output() {
        Ok(output) if output.status.success() => Ok(()),
        Ok(output) => Err(CairnError::StagedBinaryRejected {
            message: format!("--version probe exited with {}", output.status),
        }),
        Err(e) => Err(CairnError::StagedBinaryRejected {
            message: e.to_string(),
        }),
    }
}

/// Retry the swap with `sudo mv` when the direct rename is not permitted.
///
/// System-owned install directories (`/usr/local/bin` and friends) commonly
/// reject the rename for unprivileged users.
#[cfg(unix)]
fn escalated_move(staged: &Path, install: &Path, direct: &std::io::Error) -> Result<()> {
    warn!("direct rename failed ({direct}), retrying with sudo");

    match Command::new("sudo").arg("mv").arg(staged).arg(install).status() {
        Ok(status) if status.success() => Ok(()),
        Ok(status) => Err(CairnError::ReplaceFailed {
            direct: direct.to_string(),
            escalated: format!("sudo mv exited with {status}"),
        }),
        Err(e) => Err(CairnError::ReplaceFailed {
            direct: direct.to_string(),
            escalated: e.to_string(),
        }),
    }
}

#[cfg(not(unix))]
fn escalated_move(_staged: &Path, _install: &Path, direct: &std::io::Error) -> Result<()> {
    Err(CairnError::ReplaceFailed {
        direct: direct.to_string(),
        escalated: "no privilege escalation available on this platform".to_string(),
    })
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Removes the staged file on drop; a no-op once the rename has consumed it.
struct StagedFile(PathBuf);

impl Drop for StagedFile {
    fn drop(&mut self) {
        if self.0.exists() {
            let _ = fs::remove_file(&self.0);
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn write_script(path: &Path, body: &str) {
        fs::write(path, body).unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    fn env_with_install(temp: &TempDir, install: &Path) -> Environment {
        Environment::with_home(temp.path().join("home")).with_install_path(install.to_path_buf())
    }

    fn no_staged_leftovers(dir: &Path) -> bool {
        !fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .any(|e| e.file_name().to_string_lossy().ends_with(".upgrade-tmp"))
    }

    #[test]
    fn replaces_install_with_verified_binary() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("cairn");
        write_script(&install, "#!/bin/sh\necho 'cairn 1.4.0'\n");

        let new = temp.path().join("new-cairn");
        write_script(&new, "#!/bin/sh\necho 'cairn 1.5.0'\n");

        let env = env_with_install(&temp, &install);
        let replaced = replace_binary(&env, &new).unwrap();

        assert_eq!(replaced, install);
        let output = Command::new(&install).arg("--version").output().unwrap();
        assert!(String::from_utf8_lossy(&output.stdout).contains("1.5.0"));
        assert!(no_staged_leftovers(temp.path()));
    }

    #[test]
    fn failing_probe_leaves_install_untouched() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("cairn");
        write_script(&install, "#!/bin/sh\necho 'cairn 1.4.0'\n");
        let original = fs::read(&install).unwrap();

        let new = temp.path().join("new-cairn");
        write_script(&new, "#!/bin/sh\nexit 1\n");

        let env = env_with_install(&temp, &install);
        let err = replace_binary(&env, &new).unwrap_err();

        assert!(matches!(err, CairnError::StagedBinaryRejected { .. }));
        assert_eq!(fs::read(&install).unwrap(), original);
        assert!(no_staged_leftovers(temp.path()));
    }

    #[test]
    fn unrunnable_staged_binary_is_rejected() {
        let temp = TempDir::new().unwrap();
        let install = temp.path().join("cairn");
        write_script(&install, "#!/bin/sh\necho 'cairn 1.4.0'\n");

        // Not a valid executable payload
        let new = temp.path().join("new-cairn");
        fs::write(&new, b"\x00\x01garbage").unwrap();

        let env = env_with_install(&temp, &install);
        let err = replace_binary(&env, &new).unwrap_err();

        assert!(matches!(err, CairnError::StagedBinaryRejected { .. }));
        assert!(install.exists());
        assert!(no_staged_leftovers(temp.path()));
    }
}
