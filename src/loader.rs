//! Result-bundle loader
//!
//! Reads the serialized bundle once per process and memoizes the outcome.
//! Every failure is terminal for the session: fix the artifact and restart.

use crate::bundle::{missing_keys, ResultBundle};
use crate::config::Config;
use indicatif::ProgressBar;
use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

/// Where the external pipeline drops its results.
/// Can be overridden with the TOPICLENS_BUNDLE_PATH env var or the
/// `[bundle] path` config key.
pub const DEFAULT_BUNDLE_PATH: &str = "lda_full_result.json";

/// Fatal load failures. There is no partial rendering and no retry.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Bundle file absent from the resolved path.
    NotFound(PathBuf),
    /// File exists but could not be deserialized into a bundle.
    Parse(String),
    /// File deserialized but lacks required fields, listed in
    /// [`crate::bundle::REQUIRED_KEYS`] order.
    MissingKeys(Vec<&'static str>),
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::NotFound(path) => {
                write!(f, "result bundle not found: {}", path.display())
            }
            LoadError::Parse(msg) => write!(f, "failed to load result bundle: {}", msg),
            LoadError::MissingKeys(keys) => {
                write!(f, "incomplete result bundle, missing: {}", keys.join(", "))
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Resolve the bundle path: env var beats config beats the fixed default.
pub fn bundle_path() -> PathBuf {
    if let Ok(path) = std::env::var("TOPICLENS_BUNDLE_PATH") {
        return PathBuf::from(path);
    }
    if let Some(path) = Config::load().bundle.path {
        return path;
    }
    PathBuf::from(DEFAULT_BUNDLE_PATH)
}

/// Read and validate a bundle from an explicit path.
///
/// Required-key checking runs against the raw JSON first so the error can
/// name the complete missing set, not just the first field serde trips on.
pub fn load_from_path(path: &Path) -> Result<ResultBundle, LoadError> {
    if !path.exists() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }

    let raw = std::fs::read_to_string(path).map_err(|e| LoadError::Parse(e.to_string()))?;
    let value: Value = serde_json::from_str(&raw).map_err(|e| LoadError::Parse(e.to_string()))?;

    let missing = missing_keys(&value);
    if !missing.is_empty() {
        return Err(LoadError::MissingKeys(missing));
    }

    serde_json::from_value(value).map_err(|e| LoadError::Parse(e.to_string()))
}

static BUNDLE: OnceLock<Result<ResultBundle, LoadError>> = OnceLock::new();

/// Load the bundle for this process, memoized. Repeated calls return the
/// identical cached object (or the identical cached failure) without
/// touching the file again.
pub fn load() -> Result<&'static ResultBundle, &'static LoadError> {
    BUNDLE
        .get_or_init(|| {
            let path = bundle_path();
            let spinner = ProgressBar::new_spinner();
            spinner.set_message(format!("Loading {}...", path.display()));
            spinner.enable_steady_tick(Duration::from_millis(80));
            let result = load_from_path(&path);
            spinner.finish_and_clear();
            result
        })
        .as_ref()
}
