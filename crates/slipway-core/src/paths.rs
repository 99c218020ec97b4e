use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const CONFIG_FILE: &str = "slipway.yaml";

/// Names release directories are allowed to have: `YYYYMMDD_HHMMSS`.
/// Zero-padded so that lexicographic order is chronological order.
pub const RELEASE_PATTERN: &str = r"^[0-9]{8}_[0-9]{6}$";

pub const RELEASE_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

pub fn config_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE)
}

// ---------------------------------------------------------------------------
// Release names
// ---------------------------------------------------------------------------

static RELEASE_RE: OnceLock<Regex> = OnceLock::new();

fn release_re() -> &'static Regex {
    RELEASE_RE.get_or_init(|| Regex::new(RELEASE_PATTERN).unwrap())
}

pub fn is_release_name(name: &str) -> bool {
    release_re().is_match(name)
}

/// Release directory name for a deployment starting at `now`.
/// Always UTC, so ordering holds across DST transitions.
pub fn release_stamp(now: DateTime<Utc>) -> String {
    now.format(RELEASE_STAMP_FORMAT).to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
