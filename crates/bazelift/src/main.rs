//! bazelift: a version-aware launcher for Bazel.
//!
//! Decides which Bazel version the current project wants, makes sure the
//! matching release binary sits in the local cache, and execs it with every
//! argument forwarded. bazelift's own exit code is the launched tool's exit
//! code; stdout belongs entirely to the tool, status lines go to stderr.

mod progress;

use anyhow::Result;
use bazelift_bazel::{
    DEFAULT_TIMEOUT, Platform, build_client, ensure_downloaded, launch, locate, resolve_version,
    select_version,
};
use bazelift_core::Config;
use std::env;
use std::fs;
use std::process;

fn main() {
    match run() {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    }
}

fn run() -> Result<i32> {
    // Platform first: an unsupported host must abort before any directory
    // is created or request issued.
    let platform = Platform::detect()?;
    let config = Config::from_env()?;
    fs::create_dir_all(&config.cache_dir)?;

    let resolve_client = build_client(Some(DEFAULT_TIMEOUT))?;
    // The download client carries no overall deadline: large binaries on
    // slow links must not be cut off by a fixed cap.
    let download_client = build_client(None)?;

    let descriptor = select_version(config.version_override.as_deref(), &env::current_dir()?);
    let version = resolve_version(&resolve_client, descriptor, &config)?;
    eprintln!("Using Bazel {}...", version);

    let record = locate(&version, platform, &config);
    let binary = ensure_downloaded(&download_client, &record, Some(progress::report))?;

    // Everything after the program name goes to Bazel verbatim, including
    // flags like --help and the bare -- separator.
    Ok(launch(&binary, env::args_os().skip(1))?)
}
