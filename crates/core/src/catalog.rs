//! Catalog of caption tracks discovered for one video.

use crate::error::{Result, TranscriptError};
use crate::fetch::PageFetcher;
use crate::timedtext::{self, TranscriptEntry};
use crate::video_id::VideoId;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, info, trace, warn};

/// Kind marker the platform uses for speech-recognition tracks.
pub const GENERATED_KIND: &str = "asr";

/// One caption track of a video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub video_id: VideoId,
    /// Timed-text URL for this track.
    pub url: String,
    /// Display name, e.g. "English (auto-generated)".
    pub language: String,
    pub language_code: String,
    pub is_generated: bool,
}

impl Transcript {
    /// Download this track and decode it into entries.
    pub async fn fetch<F>(&self, fetcher: &F) -> Result<Vec<TranscriptEntry>>
    where
        F: PageFetcher + ?Sized,
    {
        trace!(
            "Transcript::fetch(video_id={}, language_code={})",
            self.video_id,
            self.language_code
        );
        let xml = fetcher.fetch(&self.url).await?;
        let entries = timedtext::parse_transcript(&xml)?;
        info!(
            "decoded {} entries for {} [{}]",
            entries.len(),
            self.video_id,
            self.language_code
        );
        Ok(entries)
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (\"{}\")", self.language_code, self.language)
    }
}

/// Tracks for one video, split by authorship and keyed by language code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptList {
    pub video_id: VideoId,
    pub manually_created: BTreeMap<String, Transcript>,
    pub generated: BTreeMap<String, Transcript>,
}

impl TranscriptList {
    /// Build the catalog from the `playerCaptionsTracklistRenderer` object.
    /// A track with missing or mistyped fields never affects its siblings.
    pub fn build(video_id: VideoId, renderer: &Map<String, Value>) -> Result<Self> {
        trace!("TranscriptList::build(video_id={video_id})");
        let tracks = renderer
            .get("captionTracks")
            .and_then(Value::as_array)
            .ok_or_else(|| TranscriptError::InvalidFormat(video_id.clone()))?;

        let mut manually_created = BTreeMap::new();
        let mut generated = BTreeMap::new();
        for (i, track) in tracks.iter().enumerate() {
            let transcript = read_track(&video_id, track);
            if transcript.url.is_empty() {
                warn!(
                    "skipping caption track {i} ({}) of {video_id}: no baseUrl",
                    transcript.language_code
                );
                continue;
            }
            let target = if transcript.is_generated {
                &mut generated
            } else {
                &mut manually_created
            };
            target.insert(transcript.language_code.clone(), transcript);
        }
        debug!(
            "catalog for {video_id}: {} manual, {} generated",
            manually_created.len(),
            generated.len()
        );
        Ok(Self {
            video_id,
            manually_created,
            generated,
        })
    }

    /// First track matching `language_codes` in order, preferring a manually
    /// created track over a generated one for the same code.
    pub fn find_transcript<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<&Transcript> {
        self.find_in(language_codes, &[&self.manually_created, &self.generated])
    }

    /// Like [`find_transcript`](Self::find_transcript) but only manual tracks.
    pub fn find_manually_created<S: AsRef<str>>(
        &self,
        language_codes: &[S],
    ) -> Result<&Transcript> {
        self.find_in(language_codes, &[&self.manually_created])
    }

    /// Like [`find_transcript`](Self::find_transcript) but only generated tracks.
    pub fn find_generated<S: AsRef<str>>(&self, language_codes: &[S]) -> Result<&Transcript> {
        self.find_in(language_codes, &[&self.generated])
    }

    /// Lowest language code among manual tracks, else among generated ones.
    pub fn first_available(&self) -> Option<&Transcript> {
        self.manually_created
            .values()
            .next()
            .or_else(|| self.generated.values().next())
    }

    /// Manual tracks followed by generated tracks, each ordered by code.
    pub fn transcripts(&self) -> impl Iterator<Item = &Transcript> {
        self.manually_created.values().chain(self.generated.values())
    }

    pub fn is_empty(&self) -> bool {
        self.manually_created.is_empty() && self.generated.is_empty()
    }

    fn find_in<'a, S: AsRef<str>>(
        &'a self,
        language_codes: &[S],
        maps: &[&'a BTreeMap<String, Transcript>],
    ) -> Result<&'a Transcript> {
        for code in language_codes {
            for map in maps {
                if let Some(transcript) = map.get(code.as_ref()) {
                    debug!("selected {transcript} for {}", self.video_id);
                    return Ok(transcript);
                }
            }
        }
        Err(TranscriptError::NoTranscriptFound {
            video_id: self.video_id.clone(),
            language_codes: language_codes
                .iter()
                .map(|c| c.as_ref().to_string())
                .collect(),
        })
    }
}

impl fmt::Display for TranscriptList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Available transcripts for {}:", self.video_id)?;
        for (title, map) in [
            ("MANUALLY CREATED", &self.manually_created),
            ("GENERATED", &self.generated),
        ] {
            writeln!(f)?;
            writeln!(f, "({title})")?;
            if map.is_empty() {
                writeln!(f, " - None")?;
            }
            for transcript in map.values() {
                writeln!(f, " - {transcript}")?;
            }
        }
        Ok(())
    }
}

/// Read one `captionTracks` entry; absent or mistyped fields become "".
fn read_track(video_id: &VideoId, track: &Value) -> Transcript {
    let field = |key: &str| track.get(key).and_then(Value::as_str).unwrap_or_default();
    let language = track
        .get("name")
        .and_then(|name| name.get("simpleText"))
        .and_then(Value::as_str)
        .unwrap_or_default();
    Transcript {
        video_id: video_id.clone(),
        url: field("baseUrl").to_string(),
        language: language.to_string(),
        language_code: field("languageCode").to_string(),
        is_generated: field("kind") == GENERATED_KIND,
    }
}
