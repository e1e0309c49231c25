//! Fallback neural TTS engine
//!
//! The Kokoro model is consumed as an opaque service: it is loaded on demand
//! with an execution backend preference and asked to synthesize WAV audio
//! for a text/voice/speed triple. No inference happens in this crate.

pub mod kokoro;
pub mod loader;

pub use loader::{EngineLoader, LoaderPhase};

use crate::Result;

/// Kokoro model identifier passed to the engine at load time
pub const MODEL_ID: &str = "onnx-community/Kokoro-82M-v1.0-ONNX";

/// Voices shipped with the Kokoro model
pub const KOKORO_VOICES: [&str; 10] = [
    "af_heart",
    "af_bella",
    "af_nicole",
    "af_sarah",
    "af_sky",
    "am_adam",
    "am_michael",
    "am_puck",
    "bf_emma",
    "bm_george",
];

/// Voice used when none is selected (and for export in native mode)
pub const DEFAULT_FALLBACK_VOICE: &str = "af_heart";

/// Maximum input length for one synthesis request, in characters.
/// Applies to both live playback and export.
pub const MAX_SYNTHESIS_CHARS: usize = 300;

/// Execution backend preference for engine instantiation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionBackend {
    /// Hardware-accelerated inference; may be unavailable
    Accelerated,
    /// CPU inference; always available wherever the engine runs at all
    Universal,
}

/// Delivery parameters for one synthesis request
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisOptions {
    /// Kokoro voice name, e.g. "af_bella"
    pub voice: String,
    /// Rate multiplier, 1.0 = normal
    pub speed: f32,
}

/// Synthesized audio as WAV container bytes
#[derive(Debug, Clone)]
pub struct AudioClip {
    wav: Vec<u8>,
}

impl AudioClip {
    pub fn new(wav: Vec<u8>) -> Self {
        Self { wav }
    }

    pub fn wav_bytes(&self) -> &[u8] {
        &self.wav
    }

    pub fn into_wav_bytes(self) -> Vec<u8> {
        self.wav
    }
}

/// Neural TTS engine
pub trait TtsEngine: Send {
    /// Synthesize `text` into WAV audio
    fn generate(&mut self, text: &str, options: &SynthesisOptions) -> Result<AudioClip>;
}

/// Truncate to at most `max` characters, on a character boundary
pub fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}
