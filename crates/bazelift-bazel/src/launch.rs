//! Handing control to the fetched binary

use bazelift_core::{BazeliftError, Result};
use std::ffi::OsString;
use std::path::Path;
use std::process::{Command, ExitStatus};

/// Runs the binary with inherited stdio and returns its exit code.
///
/// Arguments are forwarded untouched; flags like `--help` or `--version`
/// belong to the launched tool, not to the launcher. A child killed by a
/// signal maps to `128 + signal`, the usual shell convention.
pub fn launch<I>(binary: &Path, args: I) -> Result<i32>
where
    I: IntoIterator<Item = OsString>,
{
    let status = Command::new(binary)
        .args(args)
        .status()
        .map_err(|e| BazeliftError::LaunchFailed {
            path: binary.to_path_buf(),
            reason: e.to_string(),
        })?;

    Ok(exit_code(status))
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
