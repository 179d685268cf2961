//! Caption configuration embedded in the watch page.
//! The page inlines the player response as a script literal; the captions
//! object sits between two known keys, so we cut it out by those boundaries
//! instead of parsing the HTML.

use crate::error::{Result, TranscriptError};
use crate::video_id::VideoId;
use serde_json::{Map, Value};
use tracing::{debug, trace};

/// Key that opens the captions object inside the player response.
pub const CAPTIONS_MARKER: &str = "\"captions\":";

/// Key that follows the captions object inside the player response.
pub const VIDEO_DETAILS_MARKER: &str = ",\"videoDetails\"";

const TRACKLIST_RENDERER: &str = "playerCaptionsTracklistRenderer";

/// Locate the captions payload in `html` and return its track list renderer.
pub fn extract_captions_json(html: &str, video_id: &VideoId) -> Result<Map<String, Value>> {
    trace!(
        "extract_captions_json(video_id={video_id}): scanning {} bytes",
        html.len()
    );
    let payload = captions_fragment(html)
        .ok_or_else(|| TranscriptError::TranscriptsUnavailable(video_id.clone()))?;
    // String values may carry raw newlines which strict JSON rejects.
    let payload = payload.replace('\n', "");
    let mut captions: Map<String, Value> =
        serde_json::from_str(&payload).map_err(|source| TranscriptError::MalformedPayload {
            video_id: video_id.clone(),
            source,
        })?;
    match captions.remove(TRACKLIST_RENDERER) {
        Some(Value::Object(renderer)) => {
            debug!("found {TRACKLIST_RENDERER} with {} keys", renderer.len());
            Ok(renderer)
        }
        _ => Err(TranscriptError::TranscriptsDisabled(video_id.clone())),
    }
}

/// Text between the first captions marker and the videoDetails marker.
fn captions_fragment(html: &str) -> Option<&str> {
    let after = html.split(CAPTIONS_MARKER).nth(1)?;
    after.split(VIDEO_DETAILS_MARKER).next()
}
