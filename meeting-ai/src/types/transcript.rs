//! Types for per-segment transcription results.

use serde::{Deserialize, Serialize};

/// Placeholder text substituted for a segment whose transcription attempts
/// were all exhausted. Allows the pipeline to continue with partial results.
pub const TRANSCRIPTION_FAILED_SENTINEL: &str = "[Transcription failed for this segment]";

/// The text result (or failure sentinel) for one audio segment.
///
/// Fragments are ordered by segment index and concatenated with whitespace
/// separators into the full transcript.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub index: usize,
    pub text: String,
}

impl TranscriptFragment {
    /// Create a fragment carrying real transcript text.
    pub fn text(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
        }
    }

    /// Create a fragment carrying the failure sentinel.
    pub fn failed(index: usize) -> Self {
        Self {
            index,
            text: TRANSCRIPTION_FAILED_SENTINEL.to_string(),
        }
    }

    /// Whether this fragment is the failure sentinel rather than real text.
    pub fn is_failed(&self) -> bool {
        self.text == TRANSCRIPTION_FAILED_SENTINEL
    }
}
