//! Release metadata fetch and platform asset selection.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::debug;

use super::BIN_NAME;
use crate::env::Environment;
use crate::error::{CairnError, Result};

/// Timeout for metadata and checksum-manifest requests.
const METADATA_TIMEOUT: Duration = Duration::from_secs(10);

/// A published release, as returned by the releases API.
#[derive(Debug, Clone, Deserialize)]
pub struct Release {
    /// Release tag, e.g. `v1.5.0`.
    pub tag_name: String,
    /// Free-text changelog body.
    #[serde(default)]
    pub body: String,
    /// When the release was published.
    pub published_at: DateTime<Utc>,
    /// Downloadable files attached to the release.
    pub assets: Vec<Asset>,
}

impl Release {
    /// The tag with any leading `v` stripped.
    pub fn version(&self) -> &str {
        self.tag_name.trim_start_matches('v')
    }
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
    pub name: String,
    #[serde(rename = "browser_download_url")]
    pub download_url: String,
    /// Declared size in bytes; 0 when the API omits it.
    #[serde(default)]
    pub size: u64,
}

/// Fetches release metadata with a bounded timeout.
///
/// There are no retries: any failure here aborts the upgrade with a clear
/// message rather than masking a flaky or throttled API.
pub struct ReleaseClient {
    client: Client,
    url: String,
}

impl ReleaseClient {
    /// Build a client against the environment's releases endpoint.
    pub fn new(env: &Environment) -> Result<Self> {
        let client = Client::builder()
            .user_agent("cairn")
            .timeout(METADATA_TIMEOUT)
            .build()?;
        Ok(Self {
            client,
            url: env.releases_url().to_string(),
        })
    }

    /// Fetch the latest release.
    pub fn fetch_latest(&self) -> Result<Release> {
        debug!("fetching release metadata from {}", self.url);

        let response = self.client.get(&self.url).send()?;
        let status = response.status();

        if status == StatusCode::FORBIDDEN || status == StatusCode::TOO_MANY_REQUESTS {
            return Err(CairnError::RateLimited);
        }
        if !status.is_success() {
            return Err(CairnError::ServerError {
                status: status.as_u16(),
            });
        }

        response
            .json::<Release>()
            .map_err(|e| CairnError::ReleaseParse {
                message: e.to_string(),
            })
    }

    /// The shared short-timeout client, reused for the checksum manifest.
    pub(crate) fn http(&self) -> &Client {
        &self.client
    }
}

/// Release archive OS component for the running platform.
pub fn platform_os() -> &'static str {
    match std::env::consts::OS {
        "macos" => "darwin",
        os => os,
    }
}

/// Release archive architecture component for the running platform.
pub fn platform_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        "x86" => "386",
        arch => arch,
    }
}

/// The archive name the release pipeline publishes for (os, arch).
pub fn expected_asset_name(tag: &str, os: &str, arch: &str) -> String {
    format!(
        "{}_{}_{}_{}.tar.gz",
        BIN_NAME,
        tag.trim_start_matches('v'),
        os,
        arch
    )
}

/// Select the platform archive from the release's asset list.
///
/// Selection is an exact match against the computed convention name; an
/// unsupported platform surfaces here as [`CairnError::AssetNotFound`].
pub fn find_asset<'a>(release: &'a Release, os: &str, arch: &str) -> Result<&'a Asset> {
    let expected = expected_asset_name(&release.tag_name, os, arch);
    release
        .assets
        .iter()
        .find(|asset| asset.name == expected)
        .ok_or_else(|| CairnError::AssetNotFound {
            expected,
            os: os.to_string(),
            arch: arch.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn release_with_assets(tag: &str, names: &[&str]) -> Release {
        Release {
            tag_name: tag.to_string(),
            body: String::new(),
            published_at: Utc::now(),
            assets: names
                .iter()
                .map(|name| Asset {
                    name: name.to_string(),
                    download_url: format!("https://example.test/{name}"),
                    size: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn version_strips_leading_v() {
        let release = release_with_assets("v1.5.0", &[]);
        assert_eq!(release.version(), "1.5.0");
    }

    #[test]
    fn version_passes_through_bare_tag() {
        let release = release_with_assets("1.5.0", &[]);
        assert_eq!(release.version(), "1.5.0");
    }

    #[test]
    fn expected_asset_name_follows_convention() {
        assert_eq!(
            expected_asset_name("v1.5.0", "linux", "amd64"),
            "cairn_1.5.0_linux_amd64.tar.gz"
        );
        assert_eq!(
            expected_asset_name("1.5.0", "darwin", "arm64"),
            "cairn_1.5.0_darwin_arm64.tar.gz"
        );
    }

    #[test]
    fn find_asset_matches_exact_name() {
        let release = release_with_assets(
            "v1.5.0",
            &[
                "checksums.txt",
                "cairn_1.5.0_linux_amd64.tar.gz",
                "cairn_1.5.0_darwin_arm64.tar.gz",
            ],
        );

        let asset = find_asset(&release, "linux", "amd64").unwrap();
        assert_eq!(asset.name, "cairn_1.5.0_linux_amd64.tar.gz");
    }

    #[test]
    fn find_asset_rejects_unsupported_platform() {
        let release = release_with_assets("v1.5.0", &["cairn_1.5.0_linux_amd64.tar.gz"]);

        let err = find_asset(&release, "plan9", "mips").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("cairn_1.5.0_plan9_mips.tar.gz"));
        assert!(msg.contains("plan9/mips"));
    }

    #[test]
    fn find_asset_ignores_near_matches() {
        // Similar but not equal names must not be selected
        let release = release_with_assets(
            "v1.5.0",
            &["cairn_1.5.0_linux_amd64.tar.gz.sig", "cairn_1.5.0_linux_amd64.zip"],
        );
        assert!(find_asset(&release, "linux", "amd64").is_err());
    }

    #[test]
    fn platform_components_are_release_style() {
        // Whatever the host, the mapped names must be from the release
        // pipeline's vocabulary, not Rust's
        assert_ne!(platform_os(), "macos");
        assert_ne!(platform_arch(), "x86_64");
        assert_ne!(platform_arch(), "aarch64");
    }

    #[test]
    fn release_deserializes_from_api_json() {
        let json = r###"{
            "tag_name": "v1.5.0",
            "body": "## Changes\n- faster uploads",
            "published_at": "2026-03-01T12:00:00Z",
            "assets": [
                {
                    "name": "cairn_1.5.0_linux_amd64.tar.gz",
                    "browser_download_url": "https://example.test/dl",
                    "size": 1234
                }
            ]
        }"###;

        let release: Release = serde_json::from_str(json).unwrap();
        assert_eq!(release.tag_name, "v1.5.0");
        assert_eq!(release.assets.len(), 1);
        assert_eq!(release.assets[0].size, 1234);
        assert!(release.body.contains("faster uploads"));
    }
}
