//! Test utilities for bazelift
//!
//! This crate provides shared testing utilities used across the bazelift
//! workspace: workspace-local temp directories, scoped environment variable
//! overrides, and fake executable fixtures that stand in for downloaded
//! Bazel binaries.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;

/// Static mutex to serialize tests that modify environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Creates a temporary directory within `.tmp/` at the project root
///
/// This ensures all test temporary files are centralized in a single location
/// that is gitignored and easy to clean up manually if needed.
///
/// # Returns
///
/// A `TempDir` instance that automatically cleans up on drop.
/// The directory is created at `.tmp/<random-name>` relative to the project root.
///
/// # Panics
///
/// Panics if the current directory cannot be determined or the directory
/// cannot be created.
pub fn temp_dir_in_workspace() -> TempDir {
    let workspace_root = std::env::current_dir().expect("Failed to get current directory");

    let tmp_base = workspace_root.join(".tmp");

    // Ensure .tmp/ exists
    std::fs::create_dir_all(&tmp_base).expect("Failed to create .tmp directory");

    // Create unique subdirectory within .tmp/
    TempDir::new_in(&tmp_base).expect("Failed to create temporary directory in .tmp/")
}

/// Runs a closure with the given environment variables set (or removed),
/// restoring the previous values afterwards
///
/// `Some(value)` sets the variable, `None` removes it. A process-wide mutex
/// serializes callers, since environment mutation is visible to every thread.
///
/// # Examples
///
/// ```
/// use bazelift_testkit::with_env_vars;
///
/// with_env_vars(&[("USE_BAZEL_VERSION", Some("7.1.0"))], || {
///     assert_eq!(std::env::var("USE_BAZEL_VERSION").unwrap(), "7.1.0");
/// });
/// ```
pub fn with_env_vars<F, R>(vars: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = ENV_LOCK.lock().unwrap();

    // Save original values for restoration
    let saved: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(name, _)| (name.to_string(), std::env::var(name).ok()))
        .collect();

    // SAFETY: We hold ENV_LOCK, ensuring no other test is modifying env vars
    // concurrently. Environment variable modification is inherently unsafe in
    // multi-threaded contexts, but the mutex guarantees exclusive access.
    unsafe {
        for (name, value) in vars {
            match value {
                Some(value) => std::env::set_var(name, value),
                None => std::env::remove_var(name),
            }
        }
    }

    let result = f();

    // Restore environment (important for test isolation)
    // SAFETY: We still hold ENV_LOCK, ensuring exclusive access to env vars.
    unsafe {
        for (name, value) in saved {
            match value {
                Some(value) => std::env::set_var(&name, value),
                None => std::env::remove_var(&name),
            }
        }
    }

    result
}

/// Writes a fake executable at `path` that records its arguments and exits
/// with `exit_code`
///
/// The script prints each argument on its own line to stdout and also
/// appends them to `<path>.args`, so tests can verify argument forwarding
/// whether or not the child's stdout was captured.
///
/// # Panics
///
/// Panics if the file cannot be written or made executable.
#[cfg(unix)]
pub fn write_fake_tool(path: &Path, exit_code: i32) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fake tool directory");
    }

    let script = format!(
        "#!/bin/sh\nprintf '%s\\n' \"$@\" | tee \"$0.args\"\nexit {}\n",
        exit_code
    );
    std::fs::write(path, script).expect("Failed to write fake tool script");

    let mut perms = std::fs::metadata(path)
        .expect("Failed to stat fake tool")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(path, perms).expect("Failed to make fake tool executable");

    path.to_path_buf()
}

/// Path of the argument record written by a [`write_fake_tool`] script.
#[cfg(unix)]
pub fn fake_tool_args_file(tool_path: &Path) -> PathBuf {
    let mut name = tool_path.as_os_str().to_os_string();
    name.push(".args");
    PathBuf::from(name)
}
