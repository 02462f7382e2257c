//! Per-segment transcription with bounded retry and graceful degradation.
//!
//! Each segment gets a fixed budget of attempts with a fixed delay between
//! them. Exhausting the budget substitutes the failure sentinel for that
//! segment instead of failing the pipeline: one bad segment must not block
//! scheduling for a meeting whose other segments transcribed successfully.

use std::sync::Arc;
use std::time::Duration;

use log::*;
use meeting_ai::traits::transcription;
use meeting_ai::TranscriptFragment;

use crate::chunker::Segment;

/// Bounded retry budget with a fixed inter-attempt delay.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delay: Duration::from_secs(5),
        }
    }
}

/// Client that drives a transcription provider across all segments in order.
pub struct TranscriptionClient {
    provider: Arc<dyn transcription::Provider>,
    policy: RetryPolicy,
}

impl TranscriptionClient {
    pub fn new(provider: Arc<dyn transcription::Provider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Transcribe all segments in strict sequence order.
    ///
    /// Consumes the segments so each temporary artifact is deleted as soon
    /// as its transcription attempt completes or is exhausted.
    pub async fn transcribe_segments(&self, segments: Vec<Segment>) -> Vec<TranscriptFragment> {
        let mut fragments = Vec::with_capacity(segments.len());

        for segment in segments {
            let fragment = self.transcribe_one(&segment).await;
            fragments.push(fragment);
            // `segment` drops here, removing its temporary file.
        }

        fragments
    }

    async fn transcribe_one(&self, segment: &Segment) -> TranscriptFragment {
        for attempt in 1..=self.policy.max_attempts {
            match self.provider.transcribe(segment.path()).await {
                Ok(text) => {
                    debug!(
                        "Segment {} transcribed on attempt {}/{}",
                        segment.index(),
                        attempt,
                        self.policy.max_attempts
                    );
                    return TranscriptFragment::text(segment.index(), text);
                }
                Err(e) if e.is_transient() => {
                    warn!(
                        "Transient transcription error on segment {} (attempt {}/{}): {}",
                        segment.index(),
                        attempt,
                        self.policy.max_attempts,
                        e
                    );
                }
                Err(e) => {
                    warn!(
                        "Transcription error on segment {} (attempt {}/{}): {}",
                        segment.index(),
                        attempt,
                        self.policy.max_attempts,
                        e
                    );
                }
            }

            if attempt < self.policy.max_attempts {
                tokio::time::sleep(self.policy.delay).await;
            }
        }

        error!(
            "Segment {} exhausted {} transcription attempts; degrading to sentinel",
            segment.index(),
            self.policy.max_attempts
        );
        TranscriptFragment::failed(segment.index())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunker::{AudioSource, Chunker};
    use async_trait::async_trait;
    use meeting_ai::Error;
    use std::path::Path;
    use std::sync::atomic::{AtomicU32, Ordering};
    use tempfile::tempdir;

    struct FlakyProvider {
        calls: AtomicU32,
        succeed_after: u32,
    }

    #[async_trait]
    impl transcription::Provider for FlakyProvider {
        async fn transcribe(&self, audio_path: &Path) -> Result<String, Error> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call > self.succeed_after {
                Ok(format!(
                    "transcript of {}",
                    audio_path.file_name().unwrap().to_string_lossy()
                ))
            } else {
                Err(Error::Network("connection reset".to_string()))
            }
        }

        fn provider_id(&self) -> &str {
            "flaky"
        }
    }

    fn zero_delay_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            delay: Duration::ZERO,
        }
    }

    fn make_segments(count: usize) -> (tempfile::TempDir, Vec<Segment>) {
        let dir = tempdir().unwrap();
        // Build real segments through the chunker so ownership semantics hold.
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 8000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let source_path = dir.path().join("meeting.wav");
        let mut writer = hound::WavWriter::create(&source_path, spec).unwrap();
        for i in 0..(8000 * count) {
            writer.write_sample((i % 64) as i16).unwrap();
        }
        writer.finalize().unwrap();

        let source = AudioSource::open(&source_path).unwrap();
        let chunker = Chunker::new(1, 1, dir.path().to_path_buf());
        let segments = chunker.split(&source).unwrap();
        assert_eq!(segments.len(), count);
        (dir, segments)
    }

    #[tokio::test]
    async fn test_exhausted_retries_degrade_to_sentinel() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicU32::new(0),
            succeed_after: u32::MAX,
        });
        let client = TranscriptionClient::new(provider.clone(), zero_delay_policy());

        let (_dir, segments) = make_segments(1);
        let fragments = client.transcribe_segments(segments).await;

        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].is_failed());
        // Exactly the configured budget, no more.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_success_on_second_attempt_stops_retrying() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicU32::new(0),
            succeed_after: 1,
        });
        let client = TranscriptionClient::new(provider.clone(), zero_delay_policy());

        let (_dir, segments) = make_segments(1);
        let fragments = client.transcribe_segments(segments).await;

        assert!(!fragments[0].is_failed());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_fragments_preserve_segment_order() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicU32::new(0),
            succeed_after: 0,
        });
        let client = TranscriptionClient::new(provider, zero_delay_policy());

        let (_dir, segments) = make_segments(3);
        let fragments = client.transcribe_segments(segments).await;

        assert_eq!(fragments.len(), 3);
        for (i, fragment) in fragments.iter().enumerate() {
            assert_eq!(fragment.index, i);
            assert!(fragment
                .text
                .contains(&format!("meeting_part{:03}.wav", i)));
        }
    }

    #[tokio::test]
    async fn test_segment_files_are_deleted_after_processing() {
        let provider = Arc::new(FlakyProvider {
            calls: AtomicU32::new(0),
            succeed_after: u32::MAX,
        });
        let client = TranscriptionClient::new(provider, zero_delay_policy());

        let (_dir, segments) = make_segments(2);
        let paths: Vec<_> = segments.iter().map(|s| s.path().to_path_buf()).collect();

        let _fragments = client.transcribe_segments(segments).await;
        for path in paths {
            assert!(!path.exists(), "segment artifact should be consumed");
        }
    }
}
