//! Version selection: which Bazel does this invocation want?
//!
//! Selection is purely local. The precedence chain is the environment
//! override, then the `.bazelversion` pin at the workspace root above the
//! start directory, then `Latest`. Only resolution (see [`crate::resolve`])
//! may touch the network.

use bazelift_core::{BazeliftError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// File names marking a workspace root.
pub const WORKSPACE_MARKERS: [&str; 2] = ["WORKSPACE", "WORKSPACE.bazel"];

/// Per-project version pin, honored at the workspace root only.
pub const VERSION_PIN_FILE: &str = ".bazelversion";

/// Upper bound on the upward walk. Hitting it behaves like reaching the
/// filesystem root; directory trees deeper than this are pathological
/// (bind-mount cycles and the like).
const MAX_WALK_DEPTH: usize = 64;

/// What the user asked for, before any network is involved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionDescriptor {
    /// A concrete version string, used as-is.
    Explicit(String),
    /// No explicit request; resolve the latest release.
    Latest,
}

/// Decides which version this invocation should use.
///
/// `override_version` is the value of `USE_BAZEL_VERSION`, threaded in via
/// the runtime config. Absence of a workspace root or of the pin file is not
/// an error; a pin that exists but cannot be read is skipped the same way.
pub fn select_version(override_version: Option<&str>, start_dir: &Path) -> VersionDescriptor {
    if let Some(version) = override_version {
        let version = version.trim();
        if !version.is_empty() {
            return VersionDescriptor::Explicit(version.to_string());
        }
    }

    if let Some(root) = find_workspace_root(start_dir) {
        if let Ok(Some(version)) = read_version_pin(&root) {
            return VersionDescriptor::Explicit(version);
        }
    }

    VersionDescriptor::Latest
}

/// Walks up from `start_dir` to the nearest directory containing a
/// `WORKSPACE` or `WORKSPACE.bazel` file, including `start_dir` itself.
pub fn find_workspace_root(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir;
    for _ in 0..MAX_WALK_DEPTH {
        if is_workspace_root(current) {
            return Some(current.to_path_buf());
        }
        current = current.parent()?;
    }
    None
}

fn is_workspace_root(dir: &Path) -> bool {
    WORKSPACE_MARKERS
        .iter()
        .any(|marker| dir.join(marker).is_file())
}

/// Reads the version pin at the workspace root.
///
/// Returns `Ok(None)` when the file is absent or its first line is empty,
/// and `ConfigRead` when it exists but cannot be read. Only the first line
/// counts.
pub fn read_version_pin(root: &Path) -> Result<Option<String>> {
    let path = root.join(VERSION_PIN_FILE);
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(&path).map_err(|e| BazeliftError::ConfigRead {
        path: path.clone(),
        reason: e.to_string(),
    })?;

    let version = contents.lines().next().unwrap_or("").trim();
    if version.is_empty() {
        Ok(None)
    } else {
        Ok(Some(version.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazelift_testkit::temp_dir_in_workspace;

    /// Helper: create a workspace root with an optional version pin.
    fn scaffold_workspace(root: &Path, marker: &str, pin: Option<&str>) {
        fs::create_dir_all(root).unwrap();
        fs::write(root.join(marker), "").unwrap();
        if let Some(pin) = pin {
            fs::write(root.join(VERSION_PIN_FILE), pin).unwrap();
        }
    }

    #[test]
    fn override_beats_pin() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", Some("7.1.0"));

        let descriptor = select_version(Some("6.0.0"), temp.path());
        assert_eq!(descriptor, VersionDescriptor::Explicit("6.0.0".to_string()));
    }

    #[test]
    fn pin_applies_without_override() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", Some("7.1.0"));

        let descriptor = select_version(None, temp.path());
        assert_eq!(descriptor, VersionDescriptor::Explicit("7.1.0".to_string()));
    }

    #[test]
    fn no_override_no_pin_yields_latest() {
        let temp = temp_dir_in_workspace();

        let descriptor = select_version(None, temp.path());
        assert_eq!(descriptor, VersionDescriptor::Latest);
    }

    #[test]
    fn empty_override_falls_through_to_pin() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", Some("7.1.0"));

        let descriptor = select_version(Some("   "), temp.path());
        assert_eq!(descriptor, VersionDescriptor::Explicit("7.1.0".to_string()));
    }

    #[test]
    fn walk_finds_marker_several_levels_up() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", Some("8.0.0"));
        let deep = temp.path().join("src").join("main").join("java");
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_workspace_root(&deep), Some(temp.path().to_path_buf()));
        assert_eq!(
            select_version(None, &deep),
            VersionDescriptor::Explicit("8.0.0".to_string())
        );
    }

    #[test]
    fn walk_accepts_workspace_bazel_marker() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE.bazel", Some("8.1.0"));
        let deep = temp.path().join("pkg");
        fs::create_dir_all(&deep).unwrap();

        assert_eq!(find_workspace_root(&deep), Some(temp.path().to_path_buf()));
    }

    #[test]
    fn walk_without_marker_yields_none() {
        let temp = temp_dir_in_workspace();
        let deep = temp.path().join("a").join("b");
        fs::create_dir_all(&deep).unwrap();

        // The walk escapes the temp dir, so this relies on no ancestor of
        // .tmp/ being a Bazel workspace; true for this repository.
        assert_eq!(find_workspace_root(&deep), None);
        assert_eq!(select_version(None, &deep), VersionDescriptor::Latest);
    }

    #[test]
    fn marker_directory_does_not_count() {
        let temp = temp_dir_in_workspace();
        fs::create_dir_all(temp.path().join("WORKSPACE")).unwrap();

        assert_eq!(find_workspace_root(temp.path()), None);
    }

    #[test]
    fn pin_is_only_honored_at_the_root() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", None);
        let sub = temp.path().join("sub");
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(VERSION_PIN_FILE), "9.9.9").unwrap();

        assert_eq!(select_version(None, &sub), VersionDescriptor::Latest);
    }

    #[test]
    fn pin_takes_first_line_trimmed() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", Some("  7.2.0  \nsecond line\n"));

        let pin = read_version_pin(temp.path()).unwrap();
        assert_eq!(pin.as_deref(), Some("7.2.0"));
    }

    #[test]
    fn empty_pin_falls_through() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", Some("\n7.0.0\n"));

        // First line is empty, so the pin does not apply.
        assert_eq!(read_version_pin(temp.path()).unwrap(), None);
        assert_eq!(select_version(None, temp.path()), VersionDescriptor::Latest);
    }

    #[test]
    fn absent_pin_reads_as_none() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", None);

        assert_eq!(read_version_pin(temp.path()).unwrap(), None);
    }

    #[test]
    fn unreadable_pin_errors_but_selection_recovers() {
        let temp = temp_dir_in_workspace();
        scaffold_workspace(temp.path(), "WORKSPACE", None);
        // A directory with the pin's name exists but cannot be read as a
        // file, which also holds when running as root.
        fs::create_dir_all(temp.path().join(VERSION_PIN_FILE)).unwrap();

        let err = read_version_pin(temp.path()).unwrap_err();
        assert!(
            matches!(err, BazeliftError::ConfigRead { .. }),
            "unexpected error: {}",
            err
        );
        assert_eq!(select_version(None, temp.path()), VersionDescriptor::Latest);
    }
}
