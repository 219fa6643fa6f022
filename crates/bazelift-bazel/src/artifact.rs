//! Artifact locating: where a release binary lives
//!
//! Pure computation from (version, platform, config) to the three
//! coordinates of a release artifact. No filesystem, no network, no clock.

use crate::platform::Platform;
use crate::resolve::ResolvedVersion;
use bazelift_core::Config;
use std::path::PathBuf;

/// Subdirectory of the cache root holding downloaded binaries.
pub const BIN_SUBDIR: &str = "bin";

/// A located release artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactRecord {
    pub version: ResolvedVersion,
    /// Canonical release filename, `bazel-<version>-<os>-<arch>` plus `.exe`
    /// on Windows. Embeds both version and platform, so distinct builds can
    /// never collide in the cache.
    pub filename: String,
    /// Download URL under the distribution base.
    pub url: String,
    /// Where the binary lives in the local cache.
    pub local_path: PathBuf,
}

/// Maps a version and platform onto the official release layout:
/// `<base>/<version>/release/bazel-<version>-<os>-<arch>`.
pub fn locate(version: &ResolvedVersion, platform: Platform, config: &Config) -> ArtifactRecord {
    let filename = format!(
        "bazel-{}-{}-{}{}",
        version,
        platform.os.label(),
        platform.arch.label(),
        platform.os.exe_suffix()
    );
    let url = format!(
        "{}/{}/release/{}",
        config.distribution_base_url, version, filename
    );
    let local_path = config.cache_dir.join(BIN_SUBDIR).join(&filename);

    ArtifactRecord {
        version: version.clone(),
        filename,
        url,
        local_path,
    }
}
