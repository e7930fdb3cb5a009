//! Executable extraction from release archives.

use std::fs;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::debug;

use crate::error::{CairnError, Result};

/// Extract the executable named `bin_name` from a gzip-compressed tar.
///
/// The entry may sit at the archive root or one directory deep; build
/// pipelines differ on whether they nest a folder. The first matching regular
/// file wins. The extracted file is made executable.
pub fn extract_binary(archive_path: &Path, dest_dir: &Path, bin_name: &str) -> Result<PathBuf> {
    let file = fs::File::open(archive_path)?;
    let mut archive = Archive::new(GzDecoder::new(file));

    for entry in archive.entries()? {
        let mut entry = entry?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let (name_matches, depth) = {
            let path = entry.path()?;
            (
                path.file_name().and_then(|n| n.to_str()) == Some(bin_name),
                path.components().count(),
            )
        };
        if !name_matches || depth > 2 {
            continue;
        }

        let dest = dest_dir.join(bin_name);
        entry.unpack(&dest)?;
        make_executable(&dest)?;
        debug!("extracted {} from {}", dest.display(), archive_path.display());
        return Ok(dest);
    }

    Err(CairnError::BinaryNotFoundInArchive {
        name: bin_name.to_string(),
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
