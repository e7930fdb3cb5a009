//! Install method detection for the trek CLI.
//!
//! Detection runs an ordered list of strategies against the resolved binary
//! path and stops at the first positive match. Order matters: a Homebrew
//! `opt` shim also lives in a `bin/` directory, so the Homebrew detector must
//! run before the npm shim heuristic gets a chance to ask npm.

use std::path::Path;
use std::process::Command;

use super::NPM_PACKAGE;

/// How trek was installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Managed by Homebrew.
    Homebrew,
    /// Global npm install (shadows the official install and gets removed).
    Npm,
    /// Official install script, or nothing detected.
    Installer,
}

impl InstallMethod {
    /// Human-readable name for logs and messages.
    pub fn name(&self) -> &'static str {
        match self {
            InstallMethod::Homebrew => "homebrew",
            InstallMethod::Npm => "npm",
            InstallMethod::Installer => "installer",
        }
    }
}

/// A detection strategy: `Some(method)` on a positive match.
type Detector = fn(&Path) -> Option<InstallMethod>;

/// Strategies in priority order.
const DETECTORS: &[Detector] = &[homebrew_detector, npm_detector];

/// Detect the install method for a resolved trek binary path.
pub fn detect_install(path: &Path) -> InstallMethod {
    DETECTORS
        .iter()
        .find_map(|detector| detector(path))
        .unwrap_or(InstallMethod::Installer)
}

/// Known Homebrew install roots.
const HOMEBREW_ROOTS: &[&str] = &[
    "/usr/local/Cellar/",          // Intel macOS
    "/opt/homebrew/",              // ARM macOS (Cellar and opt shims)
    "/home/linuxbrew/.linuxbrew/", // Linux
];

fn homebrew_detector(path: &Path) -> Option<InstallMethod> {
    let path = path.to_string_lossy();
    HOMEBREW_ROOTS
        .iter()
        .any(|root| path.starts_with(root))
        .then_some(InstallMethod::Homebrew)
}

/// Tiered npm detector: a direct path match is conclusive on its own; a bare
/// `bin/` shim could belong to anything, so it additionally needs npm itself
/// to confirm the package is installed globally.
fn npm_detector(path: &Path) -> Option<InstallMethod> {
    if npm_path_heuristic(path) {
        return Some(InstallMethod::Npm);
    }
    if npm_shim_heuristic(path) && npm_lists_package() {
        return Some(InstallMethod::Npm);
    }
    None
}

/// Direct heuristic: the binary lives inside a global npm tree.
pub(crate) fn npm_path_heuristic(path: &Path) -> bool {
    let path = path.to_string_lossy();
    path.contains("/node_modules/")
        || path.contains("/.npm-global/")
        || path.contains("/lib/node/")
}

/// Shim heuristic: npm drops bare launcher shims into a `bin/` directory.
pub(crate) fn npm_shim_heuristic(path: &Path) -> bool {
    path.parent().is_some_and(|dir| dir.ends_with("bin"))
}

/// Confirming command for the shim heuristic.
fn npm_lists_package() -> bool {
    Command::new("npm")
        .args(["ls", "-g", "--depth=0", NPM_PACKAGE])
        .output()
        .map(|out| {
            out.status.success() && String::from_utf8_lossy(&out.stdout).contains(NPM_PACKAGE)
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn homebrew_detected_from_cellar_paths() {
        for path in [
            "/usr/local/Cellar/trek/2.3.1/bin/trek",
            "/opt/homebrew/Cellar/trek/2.3.1/bin/trek",
            "/opt/homebrew/opt/trek/bin/trek",
            "/home/linuxbrew/.linuxbrew/bin/trek",
        ] {
            assert_eq!(
                detect_install(&PathBuf::from(path)),
                InstallMethod::Homebrew,
                "expected homebrew for {path}"
            );
        }
    }

    #[test]
    fn npm_detected_from_node_modules_path() {
        let path = PathBuf::from("/usr/local/lib/node_modules/trek-cli/bin/trek");
        assert!(npm_path_heuristic(&path));
        assert_eq!(detect_install(&path), InstallMethod::Npm);
    }

    #[test]
    fn npm_detected_from_npm_global_prefix() {
        let path = PathBuf::from("/home/dev/.npm-global/lib/trek");
        assert!(npm_path_heuristic(&path));
    }

    #[test]
    fn shim_heuristic_requires_bin_parent() {
        assert!(npm_shim_heuristic(&PathBuf::from("/usr/local/bin/trek")));
        assert!(!npm_shim_heuristic(&PathBuf::from("/home/dev/tools/trek")));
    }

    #[test]
    fn plain_path_falls_back_to_installer() {
        // No brew root, no npm tree, parent is not a bin dir
        let path = PathBuf::from("/home/dev/downloads/trek");
        assert_eq!(detect_install(&path), InstallMethod::Installer);
    }

    #[test]
    fn method_names() {
        assert_eq!(InstallMethod::Homebrew.name(), "homebrew");
        assert_eq!(InstallMethod::Npm.name(), "npm");
        assert_eq!(InstallMethod::Installer.name(), "installer");
    }
}
