//! Error types for cairn operations.
//!
//! This module defines [`CairnError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `CairnError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `CairnError::Other`) for unexpected errors
//! - Checksum and replace failures are always fatal; template refresh,
//!   settings merge, and the trek upgrade degrade to warnings
//! - [`CairnError::UpdateAvailable`] is a sentinel, not a failure: it carries
//!   the `--check` result out to the exit-code mapping in `main`

use thiserror::Error;

/// Exit code returned when `--check` finds a newer release.
///
/// Distinct from 1 (hard failure) and clap's 2 (usage error) so scripts can
/// branch on it.
pub const EXIT_UPDATE_AVAILABLE: u8 = 3;

/// Core error type for cairn operations.
#[derive(Debug, Error)]
pub enum CairnError {
    /// The release API reported request throttling.
    #[error("release API rate limit exceeded, try again later")]
    RateLimited,

    /// The release API returned a non-success status.
    #[error("release API returned HTTP {status}")]
    ServerError { status: u16 },

    /// The release metadata body was not well-formed.
    #[error("failed to parse release metadata: {message}")]
    ReleaseParse { message: String },

    /// No release asset matches this platform's expected archive name.
    #[error("no release asset named '{expected}'; {os}/{arch} may be unsupported")]
    AssetNotFound {
        expected: String,
        os: String,
        arch: String,
    },

    /// Asset download returned a non-success status.
    #[error("download failed with HTTP {status} for {url}")]
    DownloadHttp { status: u16, url: String },

    /// Bytes on disk do not match the asset's declared size.
    #[error("incomplete download: expected {expected} bytes, got {actual}")]
    IncompleteDownload { expected: u64, actual: u64 },

    /// The checksum manifest has no entry for the downloaded asset.
    #[error("no checksum entry for '{asset}' in manifest")]
    ChecksumNotFound { asset: String },

    /// The downloaded file's digest does not match the manifest entry.
    #[error("checksum mismatch for {file}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        file: String,
        expected: String,
        actual: String,
    },

    /// No entry in the release archive matches the executable name.
    #[error("executable '{name}' not found in release archive")]
    BinaryNotFoundInArchive { name: String },

    /// The staged binary failed its pre-swap version check.
    #[error("staged binary failed verification, keeping current install: {message}")]
    StagedBinaryRejected { message: String },

    /// Both the direct rename and the privilege-escalated move failed.
    #[error("failed to replace binary: {direct}; escalated fallback: {escalated}")]
    ReplaceFailed { direct: String, escalated: String },

    /// `--self-only` and `--cli-only` were both requested.
    #[error("--self-only and --cli-only cannot be combined")]
    MutuallyExclusive,

    /// Sentinel for `--check`: a newer release exists.
    #[error("update available: {current} -> {latest}")]
    UpdateAvailable { current: String, latest: String },

    /// Network-level failure talking to the release host.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for cairn operations.
pub type Result<T> = std::result::Result<T, CairnError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_not_found_displays_expected_name() {
        let err = CairnError::AssetNotFound {
            expected: "cairn_1.5.0_linux_amd64.tar.gz".into(),
            os: "linux".into(),
            arch: "amd64".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("cairn_1.5.0_linux_amd64.tar.gz"));
        assert!(msg.contains("linux/amd64"));
    }

    #[test]
    fn checksum_mismatch_names_both_digests() {
        let err = CairnError::ChecksumMismatch {
            file: "cairn.tar.gz".into(),
            expected: "aaaa".into(),
            actual: "bbbb".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("aaaa"));
        assert!(msg.contains("bbbb"));
    }

    #[test]
    fn incomplete_download_displays_sizes() {
        let err = CairnError::IncompleteDownload {
            expected: 100,
            actual: 42,
        };
        let msg = err.to_string();
        assert!(msg.contains("100"));
        assert!(msg.contains("42"));
    }

    #[test]
    fn replace_failed_names_both_attempts() {
        let err = CairnError::ReplaceFailed {
            direct: "permission denied".into(),
            escalated: "sudo exited with status 1".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("permission denied"));
        assert!(msg.contains("sudo exited with status 1"));
    }

    #[test]
    fn mutually_exclusive_names_both_flags() {
        let msg = CairnError::MutuallyExclusive.to_string();
        assert!(msg.contains("--self-only"));
        assert!(msg.contains("--cli-only"));
    }

    #[test]
    fn update_available_displays_versions() {
        let err = CairnError::UpdateAvailable {
            current: "v1.4.0".into(),
            latest: "v1.5.0".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("v1.4.0"));
        assert!(msg.contains("v1.5.0"));
    }

    #[test]
    fn io_error_converts_from_std() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let err: CairnError = io_err.into();
        assert!(matches!(err, CairnError::Io(_)));
    }
}
