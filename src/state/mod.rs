//! Session state
//!
//! One mutable record owned by the view; every change goes through a setter
//! so invariants (rate bounds, quantization) hold everywhere it is read.

pub mod config;

pub use config::Config;

use crate::engine::DEFAULT_FALLBACK_VOICE;

/// Lowest accepted rate multiplier
pub const RATE_MIN: f32 = 0.5;
/// Highest accepted rate multiplier
pub const RATE_MAX: f32 = 2.0;
/// Rate adjustment granularity
pub const RATE_STEP: f32 = 0.1;

/// Per-session input and selections
pub struct Session {
    /// Text to speak
    pub text: String,

    /// Selected native voice id, if the directory has settled on one
    pub native_voice: Option<String>,

    /// Selected Kokoro voice for the fallback path and export
    pub fallback_voice: String,

    /// Rate multiplier, clamped to [RATE_MIN, RATE_MAX] in RATE_STEP steps
    rate: f32,
}

impl Session {
    pub fn new() -> Self {
        Self {
            text: String::new(),
            native_voice: None,
            fallback_voice: DEFAULT_FALLBACK_VOICE.to_string(),
            rate: 1.0,
        }
    }

    /// Build a session from persisted configuration
    pub fn from_config(config: &Config) -> Self {
        let mut session = Self::new();
        session.fallback_voice = config.fallback_voice();
        session.set_rate(config.rate());
        session
    }

    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Set the rate, clamped to the accepted range and snapped to the step
    pub fn set_rate(&mut self, rate: f32) {
        let clamped = rate.clamp(RATE_MIN, RATE_MAX);
        let snapped = (clamped / RATE_STEP).round() * RATE_STEP;
        // Snapping in f32 can land a hair outside the range
        self.rate = snapped.clamp(RATE_MIN, RATE_MAX);
    }

    /// Trimmed input, or None when there is nothing to speak
    pub fn trimmed_text(&self) -> Option<&str> {
        let text = self.text.trim();
        (!text.is_empty()).then_some(text)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
