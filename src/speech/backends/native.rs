//! Native TTS backend using the tts crate
//!
//! The `tts` crate provides a unified interface to:
//! - Speech Dispatcher on Linux (via native bindings)
//! - AVFoundation on macOS/iOS (via native bindings)
//! - SAPI/WinRT on Windows
//!
//! Capabilities vary by platform; anything unsupported is logged and skipped
//! rather than treated as fatal.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::speech::{NativeSpeech, Utterance, Voice};
use crate::{Result, T2sError};
use log::{debug, error, warn};
use tts::Tts as TtsCrate;

/// Native speech backend over the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Set on utterance begin, cleared on end/stop (when the platform
    /// delivers utterance callbacks)
    active: Arc<AtomicBool>,

    /// Whether utterance callbacks were successfully registered
    has_callbacks: bool,
}

impl NativeSynth {
    /// Create a new native speech backend
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| T2sError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        let features = tts.supported_features();
        let active = Arc::new(AtomicBool::new(false));
        let mut has_callbacks = false;

        if features.utterance_callbacks {
            let begin = Arc::clone(&active);
            let end = Arc::clone(&active);
            let stop = Arc::clone(&active);
            let wired = tts
                .on_utterance_begin(Some(Box::new(move |_| begin.store(true, Ordering::SeqCst))))
                .and_then(|_| {
                    tts.on_utterance_end(Some(Box::new(move |_| {
                        end.store(false, Ordering::SeqCst)
                    })))
                })
                .and_then(|_| {
                    tts.on_utterance_stop(Some(Box::new(move |_| {
                        stop.store(false, Ordering::SeqCst)
                    })))
                });
            match wired {
                Ok(_) => has_callbacks = true,
                Err(e) => warn!("Failed to register utterance callbacks: {}", e),
            }
        }

        if !has_callbacks && !features.is_speaking {
            warn!("Platform reports neither utterance callbacks nor speaking state; playback end will not be detected");
        }

        debug!(
            "Native TTS backend created (callbacks: {}, is_speaking: {})",
            has_callbacks, features.is_speaking
        );

        Ok(Self {
            tts,
            active,
            has_callbacks,
        })
    }

    /// Convert a rate multiplier (0.5-2.0, 1.0 = normal) to the platform's
    /// own rate range
    fn convert_rate(&self, factor: f32) -> f32 {
        let rate = self.tts.normal_rate() * factor;
        rate.clamp(self.tts.min_rate(), self.tts.max_rate())
    }

    /// Select a voice by id, if the platform knows it
    fn apply_voice(&mut self, id: &str) -> Result<()> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| T2sError::Speech(format!("Failed to get voices: {}", e)))?;

        if let Some(voice) = voices.iter().find(|v| v.id() == id) {
            debug!("Selecting voice: {}", id);
            self.tts
                .set_voice(voice)
                .map_err(|e| T2sError::Speech(format!("Failed to set voice: {}", e)))?;
        } else {
            warn!("Voice {} not in platform list, using current voice", id);
        }

        Ok(())
    }
}

impl NativeSpeech for NativeSynth {
    fn voices(&mut self) -> Result<Vec<Voice>> {
        let voices = self
            .tts
            .voices()
            .map_err(|e| T2sError::Speech(format!("Failed to enumerate voices: {}", e)))?;

        Ok(voices
            .into_iter()
            .map(|v| Voice {
                id: v.id(),
                name: v.name(),
                language: v.language().to_string(),
            })
            .filter(|v| !v.language.is_empty())
            .collect())
    }

    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        if utterance.text.is_empty() {
            return Ok(());
        }

        // Cancel anything queued first; one utterance audible at a time
        if let Err(e) = self.tts.stop() {
            debug!("Pre-speak stop failed (nothing queued?): {}", e);
        }

        let features = self.tts.supported_features();

        if features.rate {
            let rate = self.convert_rate(utterance.rate);
            debug!("Setting platform rate to {}", rate);
            self.tts
                .set_rate(rate)
                .map_err(|e| T2sError::Speech(format!("Failed to set rate: {}", e)))?;
        } else {
            warn!("Rate control not supported on this platform");
        }

        if let Some(id) = utterance.voice.as_deref() {
            if features.voice {
                self.apply_voice(id)?;
            } else {
                warn!("Voice selection not supported on this platform");
            }
        }

        debug!("Speaking: {}", utterance.text);
        self.active.store(true, Ordering::SeqCst);
        self.tts.speak(utterance.text, false).map_err(|e| {
            self.active.store(false, Ordering::SeqCst);
            error!("Failed to speak: {}", e);
            T2sError::Speech(format!("Speak failed: {}", e))
        })?;

        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        // The tts crate exposes no platform pause call; the audio would
        // keep playing, so the caller gets an error instead of a pause.
        warn!("Pause not supported by this backend");
        Err(T2sError::Speech(
            "Pause not supported by the platform speech service".to_string(),
        ))
    }

    fn resume(&mut self) -> Result<()> {
        // Nothing can be paused, so there is nothing to resume
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        debug!("Canceling speech");
        self.active.store(false, Ordering::SeqCst);
        self.tts.stop().map_err(|e| {
            error!("Failed to cancel speech: {}", e);
            T2sError::Speech(format!("Cancel failed: {}", e))
        })?;

        Ok(())
    }

    fn is_speaking(&mut self) -> bool {
        if self.has_callbacks && self.active.load(Ordering::SeqCst) {
            return true;
        }
        self.tts.is_speaking().unwrap_or(false)
    }

    fn is_paused(&mut self) -> bool {
        false
    }
}
