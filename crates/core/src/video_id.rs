//! Video id resolution from URLs, URL fragments or bare ids.

use crate::error::{Result, TranscriptError};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;
use tracing::trace;

/// Characters that may never appear in a resolved id.
const RESERVED: &[char] = &['?', '&', '/', '<', '%', '='];

/// Characters that make an input look like a URL rather than a bare id.
const URL_HINTS: &[char] = &['"', '?', '&', '/', '<', '%', '='];

/// Shortest id accepted after extraction.
pub const MIN_ID_LEN: usize = 10;

/// Extraction patterns, most specific first. The first one that matches wins.
static ID_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"(?:v|embed|shorts|watch\?v)(?:=|/)([^"&?/=%]{11})"#,
        r#"(?:=|/)([^"&?/=%]{11})"#,
        r#"([^"&?/=%]{11})"#,
    ]
    .iter()
    .map(|p| Regex::new(p).expect("video id pattern compiles"))
    .collect()
});

/// A validated video id: at least [`MIN_ID_LEN`] bytes, no reserved characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VideoId(String);

impl VideoId {
    /// Resolve a video id from a watch URL, short link, embed URL or bare id.
    pub fn parse(input: &str) -> Result<Self> {
        trace!("VideoId::parse(input={input})");
        let candidate = if looks_like_url(input) {
            extract(input).unwrap_or(input)
        } else {
            input
        };
        if candidate.contains(RESERVED) {
            return Err(TranscriptError::InvalidCharacters(candidate.to_string()));
        }
        if candidate.len() < MIN_ID_LEN {
            return Err(TranscriptError::IdTooShort(candidate.to_string()));
        }
        Ok(VideoId(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for VideoId {
    type Err = TranscriptError;

    fn from_str(s: &str) -> Result<Self> {
        VideoId::parse(s)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for VideoId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn looks_like_url(input: &str) -> bool {
    input.contains("youtu") || input.contains(URL_HINTS)
}

/// Run the patterns in order and return the first captured token.
fn extract(input: &str) -> Option<&str> {
    ID_PATTERNS
        .iter()
        .find_map(|re| re.captures(input))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}
