//! SHA-256 verification against the release checksum manifest.

use std::fs;
use std::io;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::release::{Release, ReleaseClient};
use crate::error::{CairnError, Result};

/// Fixed name of the checksum manifest asset shared across platforms.
pub const CHECKSUM_ASSET: &str = "checksums.txt";

/// Verify a downloaded asset against the release's checksum manifest.
///
/// A release without a manifest asset is accepted with a warning — older
/// releases predate checksum publishing. A manifest that exists but has no
/// entry for this asset is an error: the publishing pipeline writes one line
/// per asset, so a missing line means the download cannot be trusted.
pub fn verify(
    client: &ReleaseClient,
    release: &Release,
    file_path: &Path,
    asset_name: &str,
) -> Result<()> {
    let manifest_asset = match release.assets.iter().find(|a| a.name == CHECKSUM_ASSET) {
        Some(asset) => asset,
        None => {
            warn!("release has no {CHECKSUM_ASSET} asset, skipping integrity verification");
            return Ok(());
        }
    };

    let manifest = fetch_manifest(client, &manifest_asset.download_url)?;
    let expected =
        find_digest(&manifest, asset_name).ok_or_else(|| CairnError::ChecksumNotFound {
            asset: asset_name.to_string(),
        })?;

    let actual = sha256_file(file_path)?;
    if !actual.eq_ignore_ascii_case(&expected) {
        return Err(CairnError::ChecksumMismatch {
            file: file_path.display().to_string(),
            expected,
            actual,
        });
    }

    debug!("checksum verified for {asset_name}");
    Ok(())
}

/// Download the manifest body using the short-timeout metadata client.
fn fetch_manifest(client: &ReleaseClient, url: &str) -> Result<String> {
    let response = client.http().get(url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(CairnError::DownloadHttp {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    Ok(response.text()?)
}

/// Find the digest for `asset_name` in `<hex-digest>  <filename>` lines.
pub fn find_digest(manifest: &str, asset_name: &str) -> Option<String> {
    for line in manifest.lines() {
        let mut parts = line.split_whitespace();
        if let (Some(digest), Some(name)) = (parts.next(), parts.next()) {
            if name == asset_name {
                return Some(digest.to_string());
            }
        }
    }
    None
}

/// Streaming SHA-256 of a file, hex-encoded.
pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = fs::File::open(path)?;
    let mut hasher = Sha256::new();
    io::copy(&mut file, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}
