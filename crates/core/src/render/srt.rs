//! SRT output for decoded transcripts.

use super::decode_entities;
use crate::timedtext::TranscriptEntry;

/// Represents a single SRT block (index, time range, text lines).
#[derive(Debug, Clone, PartialEq)]
pub struct SrtBlock {
    pub index: u32,
    pub start_ms: u64,
    pub end_ms: u64,
    pub text: Vec<String>,
}

impl SrtBlock {
    /// Number and convert entries, decoding entities in their text.
    pub fn from_entries(entries: &[TranscriptEntry]) -> Vec<SrtBlock> {
        entries
            .iter()
            .zip(1..)
            .map(|(entry, index)| SrtBlock {
                index,
                start_ms: to_millis(entry.start),
                end_ms: to_millis(entry.end()),
                text: decode_entities(&entry.text)
                    .lines()
                    .map(|s| s.to_string())
                    .collect(),
            })
            .collect()
    }
}

/// Serialize blocks as an SRT document; every block ends with an empty line.
pub fn format(blocks: &[SrtBlock]) -> String {
    blocks
        .iter()
        .map(|block| {
            format!(
                "{}\n{} --> {}\n{}\n\n",
                block.index,
                format_time(block.start_ms),
                format_time(block.end_ms),
                block.text.join("\n")
            )
        })
        .collect()
}

/// Offsets are seconds; negative or NaN values clamp to zero.
fn to_millis(seconds: f64) -> u64 {
    (seconds * 1000.0).round().max(0.0) as u64
}

/// SRT cue time, `HH:MM:SS,mmm`. Hours are not wrapped.
fn format_time(total_ms: u64) -> String {
    let (secs, millis) = (total_ms / 1000, total_ms % 1000);
    let (mins, secs) = (secs / 60, secs % 60);
    let (hours, mins) = (mins / 60, mins % 60);
    format!("{hours:02}:{mins:02}:{secs:02},{millis:03}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_numbered_blocks() {
        let entries = vec![
            TranscriptEntry {
                text: "it&amp;#39;s".into(),
                start: 0.21,
                duration: 2.34,
            },
            TranscriptEntry {
                text: "two\nlines".into(),
                start: 3725.5,
                duration: 1.0,
            },
        ];
        let out = format(&SrtBlock::from_entries(&entries));
        assert_eq!(
            out,
            "1\n00:00:00,210 --> 00:00:02,550\nit's\n\n2\n01:02:05,500 --> 01:02:06,500\ntwo\nlines\n\n"
        );
    }

    #[test]
    fn formats_time_components() {
        assert_eq!(format_time(0), "00:00:00,000");
        assert_eq!(format_time(3_723_004), "01:02:03,004");
        assert_eq!(to_millis(-1.0), 0);
    }
}
