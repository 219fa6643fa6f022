//! HTTP client construction for release endpoints

use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for version resolution requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// User agent for bazelift requests
pub const USER_AGENT: &str = "bazelift";

/// Builds the blocking HTTP client.
///
/// `None` leaves the request without an overall deadline; the artifact
/// download relies on that so large binaries on slow links are not cut off.
/// Redirect following stays at the library default, which the latest-version
/// resolution depends on.
///
/// # Errors
///
/// Returns error if client construction fails
pub fn build_client(timeout: Option<Duration>) -> Result<Client, reqwest::Error> {
    Client::builder().user_agent(USER_AGENT).timeout(timeout).build()
}
