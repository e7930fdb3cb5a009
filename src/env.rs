//! Run environment resolution.
//!
//! [`Environment`] is constructed once at startup and passed by reference into
//! every component that touches the filesystem or the network. All paths and
//! endpoints live here instead of in process-wide statics, so tests can inject
//! their own.

use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context};

use crate::error::Result;

/// Default release metadata endpoint.
const RELEASES_URL: &str = "https://api.github.com/repos/cairn-dev/cairn/releases/latest";

/// Resolved paths and endpoints for one invocation.
#[derive(Debug, Clone)]
pub struct Environment {
    /// The cairn home directory (default `~/.cairn`).
    home: PathBuf,
    /// Release metadata endpoint.
    releases_url: String,
    /// Test override for the binary install path.
    install_override: Option<PathBuf>,
    /// Test override for the trek binary location.
    trek_override: Option<PathBuf>,
}

impl Environment {
    /// Resolve the environment from the process environment.
    ///
    /// Honored variables: `CAIRN_HOME`, `CAIRN_RELEASES_URL`,
    /// `CAIRN_INSTALL_PATH`, `CAIRN_TREK_BIN`.
    pub fn detect() -> Result<Self> {
        let home = env::var_os("CAIRN_HOME")
            .map(PathBuf::from)
            .or_else(|| dirs::home_dir().map(|h| h.join(".cairn")))
            .ok_or_else(|| anyhow!("could not determine home directory"))?;

        Ok(Self {
            home,
            releases_url: env::var("CAIRN_RELEASES_URL").unwrap_or_else(|_| RELEASES_URL.into()),
            install_override: env::var_os("CAIRN_INSTALL_PATH").map(PathBuf::from),
            trek_override: env::var_os("CAIRN_TREK_BIN").map(PathBuf::from),
        })
    }

    /// Build an environment rooted at an explicit home directory.
    pub fn with_home(home: PathBuf) -> Self {
        Self {
            home,
            releases_url: RELEASES_URL.into(),
            install_override: None,
            trek_override: None,
        }
    }

    /// Point release metadata at a different endpoint.
    pub fn with_releases_url(mut self, url: impl Into<String>) -> Self {
        self.releases_url = url.into();
        self
    }

    /// Inject an explicit binary install path.
    pub fn with_install_path(mut self, path: PathBuf) -> Self {
        self.install_override = Some(path);
        self
    }

    /// Inject an explicit trek binary location.
    pub fn with_trek_bin(mut self, path: PathBuf) -> Self {
        self.trek_override = Some(path);
        self
    }

    /// The cairn home directory.
    pub fn home(&self) -> &PathBuf {
        &self.home
    }

    /// Release metadata endpoint.
    pub fn releases_url(&self) -> &str {
        &self.releases_url
    }

    /// Where materialized templates live.
    pub fn templates_dir(&self) -> PathBuf {
        self.home.join("templates")
    }

    /// The persisted user settings file.
    pub fn settings_path(&self) -> PathBuf {
        self.home.join("settings.json")
    }

    /// Explicit trek binary location, if injected.
    pub fn trek_override(&self) -> Option<&PathBuf> {
        self.trek_override.as_ref()
    }

    /// The path the running binary is installed at, symlinks resolved.
    ///
    /// Replacement must target the real file, not a shim: upgrading through a
    /// symlink would orphan the link target and leave PATH pointing at the old
    /// binary.
    pub fn install_path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.install_override {
            return Ok(path.clone());
        }
        let exe = env::current_exe().context("could not determine current executable")?;
        let resolved = fs::canonicalize(&exe)
            .with_context(|| format!("could not resolve executable path {}", exe.display()))?;
        Ok(resolved)
    }
}
