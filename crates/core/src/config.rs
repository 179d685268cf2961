//! Settings for talking to the video platform.

use std::time::Duration;

/// Watch page used to discover caption tracks.
pub const DEFAULT_WATCH_URL: &str = "https://www.youtube.com/watch";

/// Desktop browser user agent; the watch page is trimmed for unknown clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Language requested for the page chrome and track display names.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US";

/// Default per-request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP settings shared by both requests of a transcript lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchConfig {
    /// Base of the watch page URL; the video id is appended as `?v=<id>`.
    pub watch_url: String,
    pub user_agent: String,
    pub accept_language: String,
    pub timeout_secs: u64,
}

impl FetchConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            watch_url: DEFAULT_WATCH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}
