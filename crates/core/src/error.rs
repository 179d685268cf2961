//! Error kinds raised along the transcript pipeline.
//! Each stage fails fast with its own variant so callers can decide on retries
//! or fallbacks themselves.

use crate::video_id::VideoId;
use thiserror::Error;

/// Convenience alias used by every stage of the pipeline.
pub type Result<T> = std::result::Result<T, TranscriptError>;

/// Everything that can go wrong between a raw video string and decoded entries.
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// The candidate id still contains URL-reserved characters after extraction.
    #[error("invalid characters in video id: {0}")]
    InvalidCharacters(String),

    /// The candidate id is shorter than the minimum id length.
    #[error("the video id must be at least 10 characters long: {0}")]
    IdTooShort(String),

    /// The watch page carries no captions metadata at all.
    #[error("transcripts disabled or video unavailable: {0}")]
    TranscriptsUnavailable(VideoId),

    /// The captions JSON fragment embedded in the watch page failed to parse.
    #[error("malformed captions payload for {video_id}: {source}")]
    MalformedPayload {
        video_id: VideoId,
        #[source]
        source: serde_json::Error,
    },

    /// Captions metadata is present but has no track list renderer.
    #[error("transcripts disabled: {0}")]
    TranscriptsDisabled(VideoId),

    /// The track list exists but `captionTracks` is missing or not an array.
    #[error("invalid captions tracks format: {0}")]
    InvalidFormat(VideoId),

    /// None of the requested language codes matched a track.
    #[error("no transcript found for {video_id} in languages {language_codes:?}")]
    NoTranscriptFound {
        video_id: VideoId,
        language_codes: Vec<String>,
    },

    /// The timed-text document could not be decoded.
    #[error("malformed transcript xml: {0}")]
    MalformedTranscriptXml(String),

    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The server answered with a non-success status.
    #[error("request to {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The HTTP client could not be built from the given configuration.
    #[error("invalid fetch configuration: {0}")]
    InvalidConfig(String),
}

impl TranscriptError {
    /// Wrap a transport-level failure for `url`.
    pub fn transport<E>(url: &str, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        TranscriptError::Transport {
            url: url.to_string(),
            source: Box::new(source),
        }
    }
}
