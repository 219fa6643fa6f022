use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BazeliftError {
    // Platform errors
    #[error("UNSUPPORTED_ARCH: unsupported machine architecture '{0}', Bazel only releases x86_64 binaries")]
    UnsupportedArch(String),

    #[error("UNSUPPORTED_OS: unsupported operating system '{0}', Bazel releases binaries for Linux, macOS and Windows")]
    UnsupportedOs(String),

    // Configuration errors
    #[error("CACHE_DIR_UNAVAILABLE: could not determine a home directory for the cache, set BAZELIFT_HOME")]
    CacheDirUnavailable,

    #[error("CONFIG_READ_ERROR: failed to read {path}: {reason}")]
    ConfigRead { path: PathBuf, reason: String },

    // Version errors
    #[error("INVALID_VERSION: '{0}' cannot be used as a version label")]
    InvalidVersion(String),

    // Network errors
    #[error("NETWORK_FETCH_FAILED: {0}")]
    NetworkFetch(String),

    #[error("MISSING_CONTENT_LENGTH: no Content-Length header in response from {0}")]
    MissingContentLength(String),

    // Launch errors
    #[error("LAUNCH_FAILED: failed to run {path}: {reason}")]
    LaunchFailed { path: PathBuf, reason: String },

    // IO errors
    #[error("IO_ERROR: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BazeliftError>;
