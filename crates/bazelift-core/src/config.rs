//! Runtime configuration for the launcher
//!
//! Every external knob is read here, once, and the resulting [`Config`] is
//! passed by reference through the pipeline. No other module reads the
//! environment, which keeps every stage testable with a plain constructed
//! value.

use crate::error::{BazeliftError, Result};
use std::env;
use std::path::PathBuf;

/// Names an explicit Bazel version, highest precedence in selection.
pub const ENV_USE_BAZEL_VERSION: &str = "USE_BAZEL_VERSION";

/// Overrides the cache root directory.
pub const ENV_BAZELIFT_HOME: &str = "BAZELIFT_HOME";

/// Overrides the base URL release artifacts are fetched from.
pub const ENV_BAZELIFT_BASE_URL: &str = "BAZELIFT_BASE_URL";

/// Overrides the endpoint whose redirect names the latest release.
pub const ENV_BAZELIFT_LATEST_URL: &str = "BAZELIFT_LATEST_URL";

/// Official release distribution base.
pub const DEFAULT_BASE_URL: &str = "https://releases.bazel.build";

/// Official latest-release endpoint; the redirect target carries the version.
pub const DEFAULT_LATEST_URL: &str = "https://github.com/bazelbuild/bazel/releases/latest";

/// Directory under the user's home used as the default cache root.
pub const CACHE_DIR_NAME: &str = ".bazelift";

#[derive(Debug, Clone)]
pub struct Config {
    /// Root of the local cache. Holds the `latest_bazel` marker file and the
    /// `bin/` directory with downloaded binaries.
    pub cache_dir: PathBuf,

    /// Base URL for release artifacts, without a trailing slash.
    pub distribution_base_url: String,

    /// URL whose final redirect names the latest release.
    pub latest_release_url: String,

    /// Explicit version requested via the environment, if any.
    pub version_override: Option<String>,
}

impl Config {
    /// Reads the configuration from the environment.
    ///
    /// Unset, empty and whitespace-only variables count as absent. Fails
    /// with `CacheDirUnavailable` when neither `BAZELIFT_HOME` nor a home
    /// directory is available.
    pub fn from_env() -> Result<Config> {
        let cache_dir = match non_empty_var(ENV_BAZELIFT_HOME) {
            Some(home) => PathBuf::from(home),
            None => dirs::home_dir()
                .ok_or(BazeliftError::CacheDirUnavailable)?
                .join(CACHE_DIR_NAME),
        };

        let distribution_base_url = non_empty_var(ENV_BAZELIFT_BASE_URL)
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let latest_release_url =
            non_empty_var(ENV_BAZELIFT_LATEST_URL).unwrap_or_else(|| DEFAULT_LATEST_URL.to_string());

        Ok(Config {
            cache_dir,
            distribution_base_url,
            latest_release_url,
            version_override: non_empty_var(ENV_USE_BAZEL_VERSION),
        })
    }

    /// Configuration with an explicit cache root, default URLs and no
    /// version override. Used by tests and embedding code.
    pub fn with_cache_dir(cache_dir: impl Into<PathBuf>) -> Config {
        Config {
            cache_dir: cache_dir.into(),
            distribution_base_url: DEFAULT_BASE_URL.to_string(),
            latest_release_url: DEFAULT_LATEST_URL.to_string(),
            version_override: None,
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    let value = env::var(name).ok()?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
