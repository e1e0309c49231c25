//! WAV export
//!
//! Synthesizes audio independently of live playback and writes it as a
//! timestamped WAV file. Export always goes through the neural engine,
//! whichever backend live playback uses.

use std::io::Write;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::engine::{truncate_chars, EngineLoader, SynthesisOptions, MAX_SYNTHESIS_CHARS};
use crate::{Result, T2sError};
use log::{debug, info};

/// Exporter with a single-export-at-a-time guard
pub struct Exporter {
    /// Set for the duration of one export; a request arriving while set is
    /// ignored. Cleared on success and failure alike.
    in_flight: bool,

    /// Where exported files land
    out_dir: PathBuf,
}

impl Exporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            in_flight: false,
            out_dir,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Synthesize `text` and save it as `tts-<epoch-millis>.wav`.
    ///
    /// Returns `Ok(None)` without doing anything when the input is empty or
    /// an export is already in flight. Loads the engine on demand.
    pub fn download_audio(
        &mut self,
        loader: &mut EngineLoader,
        text: &str,
        voice: &str,
        rate: f32,
    ) -> Result<Option<PathBuf>> {
        let text = text.trim();
        if text.is_empty() || self.in_flight {
            debug!("Export skipped (empty input or already in flight)");
            return Ok(None);
        }

        self.in_flight = true;
        let result = self.synthesize_and_save(loader, text, voice, rate);
        self.in_flight = false;

        result.map(Some)
    }

    fn synthesize_and_save(
        &self,
        loader: &mut EngineLoader,
        text: &str,
        voice: &str,
        rate: f32,
    ) -> Result<PathBuf> {
        loader.ensure_ready()?;
        let engine = loader
            .engine_mut()
            .ok_or_else(|| T2sError::Export("Engine not available".to_string()))?;

        let options = SynthesisOptions {
            voice: voice.to_string(),
            speed: rate,
        };
        let clip = engine.generate(truncate_chars(text, MAX_SYNTHESIS_CHARS), &options)?;

        let path = self.out_dir.join(format!("tts-{}.wav", epoch_millis()));

        // Write to a temp file in the target directory, then promote it, so
        // a failed export never leaves a partial WAV behind
        let mut tmp = tempfile::NamedTempFile::new_in(&self.out_dir)
            .map_err(|e| T2sError::Export(format!("Failed to create temp file: {}", e)))?;
        tmp.write_all(clip.wav_bytes())
            .map_err(|e| T2sError::Export(format!("Failed to write WAV: {}", e)))?;
        tmp.persist(&path)
            .map_err(|e| T2sError::Export(format!("Failed to save {}: {}", path.display(), e)))?;

        info!("Exported {} bytes to {}", clip.wav_bytes().len(), path.display());
        Ok(path)
    }

    #[cfg(test)]
    pub(crate) fn mark_in_flight(&mut self) {
        self.in_flight = true;
    }
}

fn epoch_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}
