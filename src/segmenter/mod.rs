//! Transcript segmentation.
//!
//! Raw transcripts arrive as a dense sequence of timestamped micro-entries
//! (a few words each). The segmenter buffers consecutive entries into
//! bounded-duration segments so each one embeds as a coherent passage.

use serde::{Deserialize, Serialize};

/// A single timestamped line from a raw transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MicroEntry {
    /// Start offset in seconds.
    pub start: f64,
    /// Text content.
    pub text: String,
}

impl MicroEntry {
    pub fn new(start: f64, text: impl Into<String>) -> Self {
        Self {
            start,
            text: text.into(),
        }
    }
}

/// A bounded-duration chunk of transcript, ready for embedding.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Source (episode) this segment belongs to.
    pub source_id: String,
    /// Start offset of the segment's first micro-entry, in seconds.
    pub start_offset: f64,
    /// Space-joined text of the constituent micro-entries.
    pub text: String,
}

/// Splits a transcript into segments no longer than `max_duration` seconds.
#[derive(Debug, Clone)]
pub struct Segmenter {
    max_duration: f64,
}

impl Segmenter {
    /// Default maximum segment duration in seconds.
    pub const DEFAULT_MAX_DURATION: f64 = 60.0;

    pub fn new(max_duration: f64) -> Self {
        Self { max_duration }
    }

    /// Segment one source's micro-entries.
    ///
    /// A segment accumulates consecutive entries until the next entry's
    /// offset minus the segment's start exceeds the maximum duration; the
    /// triggering entry then opens the next segment. The final segment is
    /// always flushed, and a triggering entry that is also the last entry
    /// overall is folded into it rather than emitted alone.
    pub fn segment(&self, source_id: &str, entries: &[MicroEntry]) -> Vec<TranscriptSegment> {
        let entries: Vec<&MicroEntry> = entries
            .iter()
            .filter(|e| !e.text.trim().is_empty())
            .collect();

        let mut segments = Vec::new();
        let Some(first) = entries.first() else {
            return segments;
        };

        let mut current_start = first.start;
        let mut buffered: Vec<&str> = Vec::new();

        for (i, entry) in entries.iter().enumerate() {
            let is_last = i == entries.len() - 1;

            if entry.start - current_start > self.max_duration || is_last {
                if is_last {
                    buffered.push(&entry.text);
                }
                segments.push(TranscriptSegment {
                    source_id: source_id.to_string(),
                    start_offset: current_start,
                    text: buffered.join(" "),
                });
                buffered = vec![&entry.text];
                current_start = entry.start;
            } else {
                buffered.push(&entry.text);
            }
        }

        segments
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_DURATION)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(lines: &[(f64, &str)]) -> Vec<MicroEntry> {
        lines.iter().map(|(s, t)| MicroEntry::new(*s, *t)).collect()
    }

    #[test]
    fn test_segment_boundaries() {
        let segmenter = Segmenter::new(60.0);
        let input = entries(&[(0.0, "a"), (30.0, "b"), (61.0, "c"), (90.0, "d")]);

        let segments = segmenter.segment("ep1", &input);

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].start_offset, 0.0);
        assert_eq!(segments[0].text, "a b");
        assert_eq!(segments[1].start_offset, 61.0);
        assert_eq!(segments[1].text, "c d");
        assert!(segments.iter().all(|s| s.source_id == "ep1"));
    }

    #[test]
    fn test_empty_input_yields_no_segments() {
        let segmenter = Segmenter::default();
        assert!(segmenter.segment("ep1", &[]).is_empty());
    }

    #[test]
    fn test_single_entry_flushes() {
        let segmenter = Segmenter::new(60.0);
        let segments = segmenter.segment("ep1", &entries(&[(12.5, "hello world")]));

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_offset, 12.5);
        assert_eq!(segments[0].text, "hello world");
    }

    #[test]
    fn test_last_entry_past_boundary_is_force_included() {
        let segmenter = Segmenter::new(60.0);
        let segments = segmenter.segment("ep1", &entries(&[(0.0, "a"), (200.0, "b")]));

        // The closing entry is also the last one overall, so it folds into
        // the final segment instead of opening a new one.
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].start_offset, 0.0);
        assert_eq!(segments[0].text, "a b");
    }

    #[test]
    fn test_under_duration_tail_is_flushed() {
        let segmenter = Segmenter::new(60.0);
        let segments = segmenter.segment(
            "ep1",
            &entries(&[(0.0, "a"), (70.0, "b"), (75.0, "c")]),
        );

        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].text, "a");
        assert_eq!(segments[1].start_offset, 70.0);
        assert_eq!(segments[1].text, "b c");
    }

    #[test]
    fn test_blank_entries_are_dropped() {
        let segmenter = Segmenter::new(60.0);
        let segments = segmenter.segment(
            "ep1",
            &entries(&[(0.0, "a"), (10.0, "  "), (20.0, "b")]),
        );

        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].text, "a b");
    }
}
