//! Embedded workspace templates.
//!
//! Template files ship inside the binary (embedded at compile time) and are
//! materialized into the cairn home, where trek workspaces pick them up.
//! Refreshing after an upgrade keeps the on-disk copies in sync with the
//! templates the new binary was built with.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context};
use include_dir::{include_dir, Dir, DirEntry};
use tracing::debug;

use crate::env::Environment;
use crate::error::Result;

static ASSETS: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// Default settings payload shipped with the binary.
pub fn default_settings() -> &'static str {
    ASSETS
        .get_file("settings.json")
        .and_then(|f| f.contents_utf8())
        .unwrap_or("{}")
}

/// Re-materialize all embedded templates into the cairn home.
///
/// Existing template files are overwritten; they are cairn-owned copies, not
/// user documents. Returns the number of files written.
pub fn refresh(env: &Environment) -> Result<usize> {
    let templates = ASSETS
        .get_dir("templates")
        .ok_or_else(|| anyhow!("embedded templates missing from build"))?;

    let dest_root = env.templates_dir();
    fs::create_dir_all(&dest_root)
        .with_context(|| format!("could not create {}", dest_root.display()))?;

    let mut written = 0;
    write_tree(templates, &dest_root, &mut written)?;
    debug!("materialized {written} template files into {}", dest_root.display());
    Ok(written)
}

fn write_tree(dir: &Dir<'_>, dest_root: &Path, written: &mut usize) -> Result<()> {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(subdir) => write_tree(subdir, dest_root, written)?,
            DirEntry::File(file) => {
                let rel = file.path().strip_prefix("templates").unwrap_or(file.path());
                let dest = dest_root.join(rel);
                if let Some(parent) = dest.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&dest, file.contents())?;
                *written += 1;
            }
        }
    }
    Ok(())
}

/// Relative paths of all embedded template files, sorted.
pub fn template_names() -> Vec<String> {
    let mut names = Vec::new();
    if let Some(templates) = ASSETS.get_dir("templates") {
        collect_names(templates, &mut names);
    }
    names.sort();
    names
}

fn collect_names(dir: &Dir<'_>, names: &mut Vec<String>) {
    for entry in dir.entries() {
        match entry {
            DirEntry::Dir(subdir) => collect_names(subdir, names),
            DirEntry::File(file) => {
                let rel = file.path().strip_prefix("templates").unwrap_or(file.path());
                names.push(rel.display().to_string());
            }
        }
    }
}
