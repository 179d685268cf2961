//! Presentation of decoded transcripts.
//! Entries come out of the decoder with entities untouched; everything that
//! turns them into readable text happens here.

use crate::timedtext::TranscriptEntry;

pub mod srt;

/// Output layouts supported by [`render`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One line per entry, optionally prefixed with `start:end` seconds.
    #[default]
    Text,
    Srt,
    Json,
}

/// Decode HTML entities in caption text.
/// Track documents escape entities twice (`&amp;#39;`), so two passes are
/// needed to get back to plain text.
pub fn decode_entities(text: &str) -> String {
    let once = html_escape::decode_html_entities(text);
    html_escape::decode_html_entities(&once).into_owned()
}

/// Render `entries` in `format`. `timestamps` only affects [`OutputFormat::Text`].
pub fn render(
    entries: &[TranscriptEntry],
    format: OutputFormat,
    timestamps: bool,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(entries, timestamps)),
        OutputFormat::Srt => Ok(srt::format(&srt::SrtBlock::from_entries(entries))),
        OutputFormat::Json => {
            let decoded: Vec<TranscriptEntry> = entries
                .iter()
                .map(|e| TranscriptEntry {
                    text: decode_entities(&e.text),
                    ..e.clone()
                })
                .collect();
            serde_json::to_string_pretty(&decoded)
        }
    }
}

fn render_text(entries: &[TranscriptEntry], timestamps: bool) -> String {
    let mut out = String::new();
    for entry in entries {
        if timestamps {
            out.push_str(&format!("{:.2}:{:.2}\t", entry.start, entry.end()));
        }
        out.push_str(&decode_entities(&entry.text));
        out.push('\n');
    }
    out
}
