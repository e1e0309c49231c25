//! Playback controller
//!
//! One state machine (`idle -> speaking -> {paused <-> speaking} -> idle`)
//! over two mutually exclusive audio sources: a native platform utterance,
//! or a buffer-backed clip of fallback-synthesized audio. At most one
//! source is ever active; starting new playback tears down the previous
//! handle first.

use crate::audio::{AudioOutput, ClipHandle};
use crate::engine::{truncate_chars, SynthesisOptions, TtsEngine, MAX_SYNTHESIS_CHARS};
use crate::speech::{NativeSpeech, Utterance};
use crate::Result;
use log::{debug, warn};

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Speaking,
    Paused,
}

/// Which backend playback goes through.
///
/// Fallback is entered once, when voice discovery times out with no voices,
/// and is never left for the rest of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackMode {
    Native,
    Fallback,
}

/// The one live audio source, if any
enum ActiveAudio {
    None,
    /// Native utterance submitted to the platform queue
    Utterance {
        /// Set once the platform has been observed speaking; end-of-speech
        /// is only believed after that, so a just-queued utterance is not
        /// mistaken for a finished one.
        observed: bool,
    },
    /// Decoded-buffer playback node
    Clip(Box<dyn ClipHandle>),
}

/// Unified play/pause/resume/stop control over both backends
pub struct PlaybackController {
    speech: Box<dyn NativeSpeech>,
    output: Box<dyn AudioOutput>,
    mode: PlaybackMode,
    phase: Phase,
    active: ActiveAudio,
}

impl PlaybackController {
    pub fn new(speech: Box<dyn NativeSpeech>, output: Box<dyn AudioOutput>) -> Self {
        Self {
            speech,
            output,
            mode: PlaybackMode::Native,
            phase: Phase::Idle,
            active: ActiveAudio::None,
        }
    }

    /// Switch to the fallback backend. One-way for the session.
    pub fn enter_fallback(&mut self) {
        debug!("Playback switched to fallback backend");
        self.mode = PlaybackMode::Fallback;
    }

    pub fn mode(&self) -> PlaybackMode {
        self.mode
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn has_active_audio(&self) -> bool {
        !matches!(self.active, ActiveAudio::None)
    }

    /// The directory polls voices through the same platform service the
    /// controller speaks through.
    pub fn speech_mut(&mut self) -> &mut dyn NativeSpeech {
        self.speech.as_mut()
    }

    /// Start playback of `text`. Empty or whitespace-only input is ignored.
    ///
    /// In fallback mode `engine` carries the loaded neural engine; when it
    /// is absent (still loading, or load failed) the request is ignored.
    pub fn speak(
        &mut self,
        text: &str,
        voice: Option<&str>,
        fallback_voice: &str,
        rate: f32,
        engine: Option<&mut (dyn TtsEngine + 'static)>,
    ) -> Result<()> {
        let text = text.trim();
        if text.is_empty() {
            return Ok(());
        }

        match self.mode {
            PlaybackMode::Native => self.speak_native(text, voice, rate),
            PlaybackMode::Fallback => {
                self.speak_fallback(text, fallback_voice, rate, engine);
                Ok(())
            }
        }
    }

    fn speak_native(&mut self, text: &str, voice: Option<&str>, rate: f32) -> Result<()> {
        // The platform cancels queued speech before the new utterance
        self.speech.speak(Utterance {
            text: text.to_string(),
            voice: voice.map(str::to_string),
            rate,
        })?;

        self.active = ActiveAudio::Utterance { observed: false };
        self.phase = Phase::Speaking;
        Ok(())
    }

    fn speak_fallback(
        &mut self,
        text: &str,
        voice: &str,
        rate: f32,
        engine: Option<&mut (dyn TtsEngine + 'static)>,
    ) {
        let Some(engine) = engine else {
            debug!("Fallback engine not ready, ignoring speak request");
            return;
        };

        self.discard_clip();

        // Optimistic: synthesis is under way
        self.phase = Phase::Speaking;
        self.active = ActiveAudio::None;

        let payload = truncate_chars(text, MAX_SYNTHESIS_CHARS);
        let options = SynthesisOptions {
            voice: voice.to_string(),
            speed: rate,
        };

        let played = engine
            .generate(payload, &options)
            .and_then(|clip| self.output.play_wav(clip.into_wav_bytes()));

        match played {
            Ok(handle) => {
                self.active = ActiveAudio::Clip(handle);
            }
            Err(e) => {
                // Contained here: the caller sees an idle controller, not an error
                warn!("Fallback synthesis failed: {}", e);
                self.phase = Phase::Idle;
            }
        }
    }

    /// Pause playback.
    ///
    /// Native speech pauses in place where the platform supports it; a
    /// backend that cannot pause returns an error and the phase stays
    /// Speaking. A fallback clip node has no pause semantics, so it is
    /// stopped and discarded and the phase returns to idle.
    pub fn pause(&mut self) -> Result<()> {
        match self.mode {
            PlaybackMode::Native => {
                if self.speech.is_speaking() {
                    self.speech.pause()?;
                    self.phase = Phase::Paused;
                }
            }
            PlaybackMode::Fallback => {
                if matches!(self.active, ActiveAudio::Clip(_)) {
                    self.discard_clip();
                    self.phase = Phase::Idle;
                }
            }
        }
        Ok(())
    }

    /// Resume paused native speech. No-op in fallback mode, where pause
    /// already discarded the clip.
    pub fn resume(&mut self) -> Result<()> {
        if self.mode == PlaybackMode::Native && self.speech.is_paused() {
            self.speech.resume()?;
            self.phase = Phase::Speaking;
        }
        Ok(())
    }

    /// Stop playback from any phase: tear down the active handle, cancel
    /// platform speech unconditionally, return to idle. Idempotent.
    pub fn stop(&mut self) {
        self.discard_clip();
        self.active = ActiveAudio::None;
        if let Err(e) = self.speech.cancel() {
            debug!("Cancel with nothing speaking: {}", e);
        }
        self.phase = Phase::Idle;
    }

    /// Observe completion of the active source and fold it into the phase.
    /// Driven by the application tick.
    pub fn poll(&mut self) {
        match &mut self.active {
            ActiveAudio::None => {}
            ActiveAudio::Clip(handle) => {
                if handle.is_finished() {
                    debug!("Clip playback finished");
                    self.active = ActiveAudio::None;
                    self.phase = Phase::Idle;
                }
            }
            ActiveAudio::Utterance { observed } => {
                let speaking = self.speech.is_speaking();
                if speaking {
                    *observed = true;
                } else if *observed && self.phase != Phase::Paused {
                    debug!("Utterance finished");
                    self.active = ActiveAudio::None;
                    self.phase = Phase::Idle;
                }
            }
        }
    }

    fn discard_clip(&mut self) {
        if let ActiveAudio::Clip(handle) = &mut self.active {
            handle.stop();
            self.active = ActiveAudio::None;
        }
    }
}

impl Drop for PlaybackController {
    fn drop(&mut self) {
        // Teardown cancels any in-flight native speech
        self.stop();
    }
}
