//! Self-update engine.
//!
//! Discovers the latest release, downloads and verifies the platform archive,
//! and atomically replaces the running executable. The pieces are sequenced by
//! the `upgrade` command; each stage is fail-fast and leaves no partial state:
//!
//! - [`release`] - release metadata fetch and platform asset selection
//! - [`download`] - streaming asset download with size verification
//! - [`checksum`] - SHA-256 verification against the release manifest
//! - [`archive`] - executable extraction from the `.tar.gz` asset
//! - [`replace`] - staged, verified, atomic binary replacement
//! - [`stepper`] - numbered progress steps
//! - [`version`] - version normalization and comparison

pub mod archive;
pub mod checksum;
pub mod download;
pub mod release;
pub mod replace;
pub mod stepper;
pub mod version;

/// Name of the installed executable, as it appears inside release archives.
pub const BIN_NAME: &str = "cairn";

pub use release::{find_asset, Asset, Release, ReleaseClient};
pub use stepper::Stepper;
