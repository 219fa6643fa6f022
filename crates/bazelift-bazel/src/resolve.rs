//! Version resolution: from a descriptor to a concrete release label
//!
//! Explicit descriptors are only validated. `Latest` goes through a one-hour
//! on-disk cache (`latest_bazel` in the cache root) and otherwise asks the
//! release endpoint: a `HEAD` request that follows redirects, where the last
//! path segment of the final URL names the newest release.

use crate::version::VersionDescriptor;
use bazelift_core::{BazeliftError, Config, Result};
use reqwest::blocking::Client;
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

/// Cache file under the cache root holding the last resolved "latest".
pub const LATEST_CACHE_FILE: &str = "latest_bazel";

/// How long a cached "latest" answer stays valid.
pub const LATEST_CACHE_TTL: Duration = Duration::from_secs(3600);

/// A concrete version label, safe to embed in URLs and filenames.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResolvedVersion(String);

impl ResolvedVersion {
    /// Validates a raw version string. Rejects empty strings and anything
    /// that would change path meaning once embedded in a filename or URL.
    pub fn new(version: impl Into<String>) -> Result<ResolvedVersion> {
        let version = version.into();
        let unsafe_label = version.is_empty()
            || version == "."
            || version == ".."
            || version.contains('/')
            || version.contains('\\');
        if unsafe_label {
            return Err(BazeliftError::InvalidVersion(version));
        }
        Ok(ResolvedVersion(version))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResolvedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Turns a descriptor into a concrete version.
///
/// `Latest` performs at most one network request; a fresh cache hit performs
/// none. The resolved answer is persisted for the next hour.
pub fn resolve_version(
    client: &Client,
    descriptor: VersionDescriptor,
    config: &Config,
) -> Result<ResolvedVersion> {
    match descriptor {
        VersionDescriptor::Explicit(version) => ResolvedVersion::new(version),
        VersionDescriptor::Latest => {
            let cache_file = config.cache_dir.join(LATEST_CACHE_FILE);
            if let Some(version) = cached_latest(&cache_file, SystemTime::now()) {
                return ResolvedVersion::new(version);
            }

            let version = fetch_latest(client, &config.latest_release_url)?;
            fs::create_dir_all(&config.cache_dir)?;
            fs::write(&cache_file, version.as_str())?;
            Ok(version)
        }
    }
}

/// Returns the cached "latest" version when the cache file is readable,
/// non-empty and fresh relative to `now`.
///
/// Freshness is the absolute distance between `now` and the file's mtime, so
/// an mtime in the future (clock skew, restored backups) also expires once
/// it is more than the TTL away. Any unreadable or empty cache is a miss,
/// never an error.
pub fn cached_latest(path: &Path, now: SystemTime) -> Option<String> {
    let mtime = fs::metadata(path).ok()?.modified().ok()?;

    let skew = match now.duration_since(mtime) {
        Ok(age) => age,
        Err(future) => future.duration(),
    };
    if skew >= LATEST_CACHE_TTL {
        return None;
    }

    let contents = fs::read_to_string(path).ok()?;
    let version = contents.trim();
    if version.is_empty() {
        None
    } else {
        Some(version.to_string())
    }
}

fn fetch_latest(client: &Client, latest_url: &str) -> Result<ResolvedVersion> {
    let response = client
        .head(latest_url)
        .send()
        .map_err(|e| BazeliftError::NetworkFetch(format!("HEAD {}: {}", latest_url, e)))?;

    let response = response
        .error_for_status()
        .map_err(|e| BazeliftError::NetworkFetch(format!("HEAD {}: {}", latest_url, e)))?;

    // Redirects are already followed at this point; the final URL's last
    // path segment is the release tag.
    let segment = response
        .url()
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");

    ResolvedVersion::new(segment)
}
