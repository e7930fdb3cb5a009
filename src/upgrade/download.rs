//! Streaming asset download with size verification.

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::debug;

use super::release::Asset;
use crate::error::{CairnError, Result};
use crate::ui;

/// Timeout covering the whole binary download.
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Stream an asset to `dest`.
///
/// All-or-nothing: when the byte count on disk does not match the asset's
/// declared size, the partial file is deleted and
/// [`CairnError::IncompleteDownload`] is returned.
pub fn download_asset(asset: &Asset, dest: &Path) -> Result<()> {
    debug!("downloading {} to {}", asset.download_url, dest.display());

    let client = Client::builder()
        .user_agent("cairn")
        .timeout(DOWNLOAD_TIMEOUT)
        .build()?;

    let response = client.get(&asset.download_url).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(CairnError::DownloadHttp {
            status: status.as_u16(),
            url: asset.download_url.clone(),
        });
    }

    let mut file = fs::File::create(dest)?;
    let written = if asset.size > 0 {
        let bar = ui::download_bar(asset.size);
        let mut reader = bar.wrap_read(response);
        let written = io::copy(&mut reader, &mut file)?;
        bar.finish_and_clear();
        written
    } else {
        let mut response = response;
        io::copy(&mut response, &mut file)?
    };
    drop(file);

    if asset.size > 0 && written != asset.size {
        let _ = fs::remove_file(dest);
        return Err(CairnError::IncompleteDownload {
            expected: asset.size,
            actual: written,
        });
    }

    debug!("downloaded {written} bytes");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tempfile::TempDir;

    fn asset(url: String, size: u64) -> Asset {
        Asset {
            name: "cairn_1.5.0_linux_amd64.tar.gz".to_string(),
            download_url: url,
            size,
        }
    }

    #[test]
    fn download_writes_body_to_dest() {
        let server = MockServer::start();
        let body = b"release archive bytes".to_vec();
        server.mock(|when, then| {
            when.method(GET).path("/asset");
            then.status(200).body(&body);
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("asset.tar.gz");
        download_asset(&asset(server.url("/asset"), body.len() as u64), &dest).unwrap();

        assert_eq!(fs::read(&dest).unwrap(), body);
    }

    #[test]
    fn download_rejects_http_error_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/asset");
            then.status(404);
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("asset.tar.gz");
        let err = download_asset(&asset(server.url("/asset"), 10), &dest).unwrap_err();

        assert!(matches!(err, CairnError::DownloadHttp { status: 404, .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn download_deletes_partial_file_on_size_mismatch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/asset");
            then.status(200).body(b"short");
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("asset.tar.gz");
        let err = download_asset(&asset(server.url("/asset"), 9999), &dest).unwrap_err();

        assert!(matches!(
            err,
            CairnError::IncompleteDownload {
                expected: 9999,
                actual: 5
            }
        ));
        assert!(!dest.exists(), "partial download must not remain on disk");
    }

    #[test]
    fn download_accepts_unknown_size() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/asset");
            then.status(200).body(b"whatever");
        });

        let temp = TempDir::new().unwrap();
        let dest = temp.path().join("asset.tar.gz");
        download_asset(&asset(server.url("/asset"), 0), &dest).unwrap();

        assert!(dest.exists());
    }
}
