//! Decoder for timed-text XML documents.
//!
//! A track document looks like
//! `<transcript><text start="0.21" dur="2.34">Hello</text>...</transcript>`.
//! Each `<text>` element becomes one [`TranscriptEntry`]. Inline markup is
//! removed from the text, but entities are kept exactly as they appear in the
//! document; see [`crate::render::decode_entities`] for the display side.

use crate::error::{Result, TranscriptError};
use quick_xml::escape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use tracing::trace;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("<[^>]*>").expect("tag pattern compiles"));

const TEXT_ELEMENT: &[u8] = b"text";

/// One caption line with its timing in seconds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptEntry {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl TranscriptEntry {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// Decode a timed-text document. Only `<text>` children of the root element
/// become entries. Any malformed element, undefined entity or unclosed
/// element fails the whole document; entries keep document order.
pub fn parse_transcript(xml: &str) -> Result<Vec<TranscriptEntry>> {
    trace!("parse_transcript: {} bytes", xml.len());
    let mut reader = Reader::from_str(xml);
    let mut entries = Vec::new();
    let mut saw_root = false;
    // Number of currently open elements; the root's children sit at depth 1.
    let mut depth = 0usize;
    loop {
        match reader.read_event().map_err(malformed)? {
            Event::Start(e) => {
                saw_root = true;
                if depth == 1 && e.name().as_ref() == TEXT_ELEMENT {
                    let (start, duration) = read_timing(&e)?;
                    let end = e.to_end().into_owned();
                    // Consumes the matching end tag, so depth is unchanged.
                    let raw = reader.read_text(end.name()).map_err(malformed)?;
                    escape::unescape(&raw).map_err(malformed)?;
                    entries.push(TranscriptEntry {
                        text: strip_tags(&raw),
                        start,
                        duration,
                    });
                } else {
                    depth += 1;
                }
            }
            Event::End(_) => {
                depth = depth.checked_sub(1).ok_or_else(|| {
                    TranscriptError::MalformedTranscriptXml("unexpected end tag".into())
                })?;
            }
            Event::Empty(e) => {
                saw_root = true;
                if depth == 1 && e.name().as_ref() == TEXT_ELEMENT {
                    let (start, duration) = read_timing(&e)?;
                    entries.push(TranscriptEntry {
                        text: String::new(),
                        start,
                        duration,
                    });
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    if !saw_root {
        return Err(TranscriptError::MalformedTranscriptXml(
            "document has no root element".into(),
        ));
    }
    if depth != 0 {
        return Err(TranscriptError::MalformedTranscriptXml(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }
    Ok(entries)
}

/// Remove anything that looks like a markup tag. Idempotent.
pub fn strip_tags(text: &str) -> String {
    TAG_RE.replace_all(text, "").into_owned()
}

/// Read the required `start` and `dur` attributes of a `<text>` element.
fn read_timing(element: &BytesStart<'_>) -> Result<(f64, f64)> {
    let mut start = None;
    let mut duration = None;
    for attr in element.attributes() {
        let attr = attr.map_err(malformed)?;
        let slot = match attr.key.as_ref() {
            b"start" => &mut start,
            b"dur" => &mut duration,
            _ => continue,
        };
        let value = attr.unescape_value().map_err(malformed)?;
        let seconds = value.trim().parse::<f64>().map_err(|e| {
            TranscriptError::MalformedTranscriptXml(format!("bad offset {value:?}: {e}"))
        })?;
        *slot = Some(seconds);
    }
    match (start, duration) {
        (Some(start), Some(duration)) => Ok((start, duration)),
        _ => Err(TranscriptError::MalformedTranscriptXml(
            "text element without start and dur attributes".into(),
        )),
    }
}

fn malformed<E: std::fmt::Display>(err: E) -> TranscriptError {
    TranscriptError::MalformedTranscriptXml(err.to_string())
}
