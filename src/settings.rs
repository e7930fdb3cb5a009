//! Persisted user settings and the post-upgrade default-merge.
//!
//! Settings live at `~/.cairn/settings.json`. After an upgrade, defaults the
//! new binary ships with are merged in non-destructively: keys the user has
//! set are never overwritten, only missing keys are filled in (recursively
//! for nested objects).

use std::fs;

use anyhow::Context;
use serde_json::{Map, Value};
use tracing::debug;

use crate::assets;
use crate::env::Environment;
use crate::error::Result;

/// Merge shipped defaults into the user's settings file.
///
/// Creates the file from defaults when absent. Returns whether anything
/// changed on disk.
pub fn merge_defaults(env: &Environment) -> Result<bool> {
    let defaults: Value = serde_json::from_str(assets::default_settings())
        .context("embedded default settings are not valid JSON")?;

    let path = env.settings_path();
    let existed = path.exists();
    let mut settings: Value = if existed {
        let raw = fs::read_to_string(&path)?;
        serde_json::from_str(&raw)
            .with_context(|| format!("could not parse settings at {}", path.display()))?
    } else {
        Value::Object(Map::new())
    };

    let changed = merge_missing(&mut settings, &defaults);

    if changed || !existed {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let rendered =
            serde_json::to_string_pretty(&settings).context("could not render settings")?;
        fs::write(&path, rendered)?;
        debug!("settings written to {}", path.display());
    }

    Ok(changed)
}

/// Insert keys from `defaults` that are missing in `target`.
///
/// Recurses into objects present on both sides; any other existing value is
/// left alone regardless of the default's shape.
fn merge_missing(target: &mut Value, defaults: &Value) -> bool {
    let (Value::Object(target_map), Value::Object(default_map)) = (target, defaults) else {
        return false;
    };

    let mut changed = false;
    for (key, default_value) in default_map {
        match target_map.get_mut(key) {
            None => {
                target_map.insert(key.clone(), default_value.clone());
                changed = true;
            }
            Some(existing) => {
                if existing.is_object() && default_value.is_object() {
                    changed |= merge_missing(existing, default_value);
                }
            }
        }
    }
    changed
}
