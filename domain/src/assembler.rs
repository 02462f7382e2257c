//! Transcript assembly from per-segment fragments.

use log::*;
use meeting_ai::TranscriptFragment;

use crate::error::{pipeline_error, Error, PipelineErrorKind};

/// Concatenate fragments in segment order into one logical transcript.
///
/// Fragments are joined by a single space with surrounding whitespace
/// trimmed. When every fragment degraded to the failure sentinel (or no
/// fragments exist at all) the transcript would be semantically
/// meaningless, so this signals `TotalTranscriptionFailure` instead of
/// handing unusable text to the costly LLM call.
pub fn assemble(fragments: &[TranscriptFragment]) -> Result<String, Error> {
    if fragments.iter().all(TranscriptFragment::is_failed) {
        error!(
            "All {} segment(s) failed transcription; aborting before extraction",
            fragments.len()
        );
        return Err(pipeline_error(
            PipelineErrorKind::TotalTranscriptionFailure,
            "every segment degraded to the failure sentinel",
        ));
    }

    let transcript = fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();

    debug!("Assembled transcript of {} chars", transcript.len());
    Ok(transcript)
}
