//! Version-aware fetching and launching of Bazel release binaries.
//!
//! This crate implements the whole launcher pipeline on top of
//! `bazelift-core`'s configuration and error types.
//!
//! # Pipeline
//!
//! ```text
//! Platform::detect()
//!     ↓
//! select_version()          environment override, then the .bazelversion
//!     ↓                     pin at the workspace root, then Latest
//! resolve_version()         Latest goes through a one-hour disk cache,
//!     ↓                     then a HEAD request whose final redirect
//!     ↓                     names the release
//! locate()                  pure mapping to filename / URL / cache path
//!     ↓
//! ensure_downloaded()       cache hit short-circuits; downloads stream to
//!     ↓                     a temp file and are renamed into place
//! launch()                  exec with inherited stdio, exit code forwarded
//! ```
//!
//! Every stage takes its inputs explicitly (the `Config`, an HTTP client, a
//! start directory), so each is testable in isolation.

// Core modules
pub mod artifact;
pub mod client;
pub mod download;
pub mod launch;
pub mod platform;
pub mod resolve;
pub mod version;

// Re-export commonly used types
pub use artifact::{ArtifactRecord, locate};
pub use client::{DEFAULT_TIMEOUT, build_client};
pub use download::{ArtifactMeta, Progress, ensure_downloaded};
pub use launch::launch;
pub use platform::{Arch, Os, Platform};
pub use resolve::{ResolvedVersion, resolve_version};
pub use version::{VersionDescriptor, find_workspace_root, select_version};

// Type alias for convenience
pub type Result<T> = bazelift_core::Result<T>;
