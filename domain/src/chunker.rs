//! Audio source chunking.
//!
//! Splits a WAV source into bounded-duration segments when the source
//! exceeds a size threshold. Segment files are temporary artifacts owned by
//! this stage: each one is deleted as soon as its transcription attempt
//! completes or is exhausted, including on failure paths (cleanup runs in
//! `Segment`'s `Drop`).

use std::fs;
use std::path::{Path, PathBuf};

use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::*;

use crate::error::{internal_error, pipeline_error, Error, InternalErrorKind, PipelineErrorKind};

/// A recorded audio file awaiting processing.
///
/// The duration is lazily known: it is only computed when the source is
/// actually decoded for splitting.
#[derive(Debug, Clone)]
pub struct AudioSource {
    path: PathBuf,
    size_bytes: u64,
}

impl AudioSource {
    /// Open an audio source, capturing its on-disk size.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let metadata = fs::metadata(&path).map_err(|e| {
            error!("Failed to stat audio source {}: {}", path.display(), e);
            pipeline_error(PipelineErrorKind::AudioDecode, &e.to_string())
        })?;

        Ok(Self {
            size_bytes: metadata.len(),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    fn stem(&self) -> String {
        self.path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "audio".to_string())
    }
}

/// A bounded-duration slice of an [`AudioSource`].
///
/// Owned segments point at temporary chunk files and delete them on drop.
/// The single implicit segment of a small source borrows the original file
/// and never deletes it.
#[derive(Debug)]
pub struct Segment {
    index: usize,
    path: PathBuf,
    duration_secs: Option<f64>,
    owned: bool,
}

impl Segment {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Duration in seconds, `None` for the implicit whole-source segment
    /// (which is never decoded).
    pub fn duration_secs(&self) -> Option<f64> {
        self.duration_secs
    }
}

impl Drop for Segment {
    fn drop(&mut self) {
        if self.owned {
            if let Err(e) = fs::remove_file(&self.path) {
                warn!(
                    "Failed to remove segment file {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Splits audio sources into transcription-sized segments.
pub struct Chunker {
    max_chunk_secs: u64,
    split_threshold_bytes: u64,
    scratch_dir: PathBuf,
}

impl Chunker {
    pub fn new(max_chunk_secs: u64, split_threshold_bytes: u64, scratch_dir: PathBuf) -> Self {
        Self {
            max_chunk_secs,
            split_threshold_bytes,
            scratch_dir,
        }
    }

    /// Produce the ordered segments of `source`.
    ///
    /// Sources below the size threshold yield a single implicit segment
    /// with no physical split. Larger sources are decoded and re-encoded
    /// into chunks of at most `max_chunk_secs`, whose durations sum to the
    /// source duration.
    pub fn split(&self, source: &AudioSource) -> Result<Vec<Segment>, Error> {
        if self.max_chunk_secs == 0 {
            return Err(internal_error(
                InternalErrorKind::Config,
                "max_chunk_secs must be positive",
            ));
        }

        if source.size_bytes() < self.split_threshold_bytes {
            debug!(
                "Source {} is below the split threshold; sending whole",
                source.path().display()
            );
            return Ok(vec![Segment {
                index: 0,
                path: source.path().to_path_buf(),
                duration_secs: None,
                owned: false,
            }]);
        }

        let mut reader = WavReader::open(source.path())?;
        let spec = reader.spec();

        match spec.sample_format {
            SampleFormat::Float => {
                let samples: Vec<f32> = reader.samples::<f32>().collect::<hound::Result<_>>()?;
                self.write_chunks(&samples, spec, source)
            }
            SampleFormat::Int => {
                let samples: Vec<i32> = reader.samples::<i32>().collect::<hound::Result<_>>()?;
                self.write_chunks(&samples, spec, source)
            }
        }
    }

    fn write_chunks<S: hound::Sample + Copy>(
        &self,
        samples: &[S],
        spec: WavSpec,
        source: &AudioSource,
    ) -> Result<Vec<Segment>, Error> {
        let channels = spec.channels as usize;
        let sample_rate = spec.sample_rate as f64;
        let samples_per_chunk = (self.max_chunk_secs * spec.sample_rate as u64) as usize * channels;

        let stem = source.stem();
        let mut segments = Vec::new();

        for (index, chunk) in samples.chunks(samples_per_chunk).enumerate() {
            let path = self
                .scratch_dir
                .join(format!("{}_part{:03}.wav", stem, index));

            let mut writer = WavWriter::create(&path, spec)?;
            for sample in chunk {
                writer.write_sample(*sample)?;
            }
            writer.finalize()?;

            let duration_secs = (chunk.len() / channels) as f64 / sample_rate;
            debug!(
                "Wrote segment {} ({:.1}s) to {}",
                index,
                duration_secs,
                path.display()
            );

            segments.push(Segment {
                index,
                path,
                duration_secs: Some(duration_secs),
                owned: true,
            });
        }

        info!(
            "Split {} into {} segment(s)",
            source.path().display(),
            segments.len()
        );
        Ok(segments)
    }
}
