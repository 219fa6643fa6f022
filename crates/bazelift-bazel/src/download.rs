//! Cache-aware download of release binaries
//!
//! Downloads stream in 8 KiB chunks to a temporary file inside the
//! destination directory and are renamed into place, so a failed or
//! interrupted download never leaves a partial binary at the final path.
//! Next to each binary sits a small JSON sidecar recording what was fetched;
//! later runs compare the recorded size against the file on disk and replace
//! corrupt entries. Binaries without a sidecar stay trusted, which keeps the
//! common cache hit free of any network or hashing work.

use crate::artifact::ArtifactRecord;
use bazelift_core::{BazeliftError, Result};
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Optional progress observer: (bytes downloaded so far, total expected).
pub type Progress = fn(u64, u64);

/// Suffix appended to a binary's filename for its sidecar.
pub const META_SUFFIX: &str = ".meta.json";

const CHUNK_SIZE: usize = 8192;

/// Sidecar recorded next to a downloaded binary.
#[derive(Debug, Serialize, Deserialize)]
pub struct ArtifactMeta {
    /// Content-Length the server declared for the download.
    pub size: u64,
    /// Hex SHA-256 of the streamed body.
    pub sha256: String,
    /// When the download completed.
    pub fetched_at: DateTime<Utc>,
}

/// Makes sure the artifact exists locally and is executable, downloading it
/// when missing.
///
/// An existing binary whose sidecar disagrees with the file on disk is
/// replaced by a fresh download; one without a sidecar is returned as-is,
/// with no network access and no re-validation.
pub fn ensure_downloaded(
    client: &Client,
    record: &ArtifactRecord,
    progress: Option<Progress>,
) -> Result<PathBuf> {
    if record.local_path.exists() {
        if cached_entry_usable(&record.local_path) {
            return Ok(record.local_path.clone());
        }
        eprintln!(
            "Cached {} does not match its recorded size, downloading again",
            record.filename
        );
    }

    download_artifact(client, record, progress)?;
    Ok(record.local_path.clone())
}

/// A cached binary is usable when it has no sidecar (pre-sidecar entries and
/// manually seeded binaries stay trusted) or when the sidecar's recorded
/// size matches the file on disk. An unreadable sidecar counts as a
/// mismatch.
fn cached_entry_usable(path: &Path) -> bool {
    let meta_path = meta_path(path);
    if !meta_path.exists() {
        return true;
    }

    let meta: ArtifactMeta = match fs::read_to_string(&meta_path)
        .ok()
        .and_then(|contents| serde_json::from_str(&contents).ok())
    {
        Some(meta) => meta,
        None => return false,
    };

    fs::metadata(path)
        .map(|m| m.len() == meta.size)
        .unwrap_or(false)
}

fn download_artifact(
    client: &Client,
    record: &ArtifactRecord,
    progress: Option<Progress>,
) -> Result<()> {
    let dest_dir = record.local_path.parent().ok_or_else(|| {
        BazeliftError::IoError(io::Error::other(format!(
            "no parent directory for {}",
            record.local_path.display()
        )))
    })?;
    fs::create_dir_all(dest_dir)?;

    eprintln!("Downloading {}...", record.url);

    let mut response = client
        .get(&record.url)
        .send()
        .map_err(|e| BazeliftError::NetworkFetch(format!("GET {}: {}", record.url, e)))?;

    if let Err(e) = response.error_for_status_ref() {
        return Err(BazeliftError::NetworkFetch(format!(
            "GET {}: {}",
            record.url,
            e.without_url()
        )));
    }

    let expected_size = declared_content_length(&response)
        .ok_or_else(|| BazeliftError::MissingContentLength(record.url.clone()))?;

    // Stream into a temp file in the destination directory, so the final
    // rename stays on one filesystem and is atomic.
    let mut temp_file = tempfile::NamedTempFile::new_in(dest_dir)?;
    let mut hasher = Sha256::new();
    let mut downloaded: u64 = 0;
    let mut buffer = [0u8; CHUNK_SIZE];

    loop {
        let bytes_read = response.read(&mut buffer).map_err(|e| {
            BazeliftError::NetworkFetch(format!("read from {}: {}", record.url, e))
        })?;

        if bytes_read == 0 {
            break;
        }

        temp_file.write_all(&buffer[..bytes_read])?;
        hasher.update(&buffer[..bytes_read]);
        downloaded += bytes_read as u64;

        if let Some(callback) = progress {
            callback(downloaded, expected_size);
        }
    }

    if downloaded != expected_size {
        return Err(BazeliftError::NetworkFetch(format!(
            "GET {}: expected {} bytes, received {}",
            record.url, expected_size, downloaded
        )));
    }

    temp_file.as_file().sync_all()?;
    temp_file
        .persist(&record.local_path)
        .map_err(|e| BazeliftError::IoError(e.error))?;

    #[cfg(unix)]
    set_executable_permissions(&record.local_path)?;

    write_meta(&record.local_path, expected_size, hasher)?;

    Ok(())
}

/// Reads the declared Content-Length straight from the header map. The
/// header itself is mandatory here, so `reqwest`'s length accessor (which
/// can be synthesized from other signals) is deliberately not used.
fn declared_content_length(response: &Response) -> Option<u64> {
    response
        .headers()
        .get(reqwest::header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// Sets the conventional 0755 mode after a fresh download.
#[cfg(unix)]
fn set_executable_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

fn write_meta(binary_path: &Path, size: u64, hasher: Sha256) -> Result<()> {
    let meta = ArtifactMeta {
        size,
        sha256: hex::encode(hasher.finalize()),
        fetched_at: Utc::now(),
    };
    let contents =
        serde_json::to_string_pretty(&meta).map_err(|e| BazeliftError::IoError(io::Error::other(e)))?;
    fs::write(meta_path(binary_path), contents)?;
    Ok(())
}

fn meta_path(binary_path: &Path) -> PathBuf {
    let mut name = binary_path.as_os_str().to_os_string();
    name.push(META_SUFFIX);
    PathBuf::from(name)
}
