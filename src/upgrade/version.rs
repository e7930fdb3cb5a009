//! Version normalization and comparison.
//!
//! Release tags and build versions come in with and without a leading `v`;
//! comparison coerces both to the `v` form and checks equality. Equality
//! rather than ordering is deliberate: a development build (any non-numeric
//! version) never equals a release tag, so it always takes the update path.

use regex::Regex;

/// Version of the running binary.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Coerce a version string to the leading-`v` form.
pub fn normalize(version: &str) -> String {
    format!("v{}", version.trim_start_matches('v'))
}

/// Whether `current` already matches the latest release tag.
pub fn is_up_to_date(current: &str, latest: &str) -> bool {
    normalize(current) == normalize(latest)
}

/// Pull the first semver-shaped token out of arbitrary command output.
pub fn extract_semver(text: &str) -> Option<String> {
    let pattern = Regex::new(r"\d+\.\d+\.\d+(?:[-+][0-9A-Za-z.-]+)?").ok()?;
    pattern.find(text).map(|m| m.as_str().to_string())
}
