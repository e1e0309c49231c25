//! Platform speech service abstraction
//!
//! The host platform's built-in speech synthesis is consumed as an opaque
//! service: voice enumeration, utterance submission, and speak/pause/resume/
//! cancel control. Backends implement this trait; the playback controller
//! and voice directory only ever see the trait.

use crate::Result;
use log::info;

/// A synthesis voice provided by the platform speech service
///
/// Immutable once listed; the directory replaces the whole set on refresh.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Stable identifier used for selection
    pub id: String,
    /// Human-readable display name
    pub name: String,
    /// Language tag, e.g. "en-US"
    pub language: String,
}

/// A single native speech request: text plus delivery parameters
#[derive(Debug, Clone)]
pub struct Utterance {
    /// Text to speak (already trimmed by the caller)
    pub text: String,
    /// Voice id to use; platform default when `None`
    pub voice: Option<String>,
    /// Rate multiplier, 1.0 = normal
    pub rate: f32,
}

/// Platform speech service
///
/// All native backends implement this. Completion is observed by polling
/// `is_speaking` rather than by caller-registered callbacks; backends that
/// receive utterance lifecycle events fold them into the answer.
pub trait NativeSpeech: Send {
    /// Enumerate the currently available voices
    ///
    /// Entries without a language tag are filtered out.
    fn voices(&mut self) -> Result<Vec<Voice>>;

    /// Cancel any queued speech and submit a new utterance
    fn speak(&mut self, utterance: Utterance) -> Result<()>;

    /// Pause active speech.
    ///
    /// Backends without a platform pause return an error and leave the
    /// audio playing; they never report a pause they cannot deliver.
    fn pause(&mut self) -> Result<()>;

    /// Resume paused speech
    fn resume(&mut self) -> Result<()>;

    /// Cancel/silence current speech
    fn cancel(&mut self) -> Result<()>;

    /// Is the platform currently speaking (or has speech queued)?
    fn is_speaking(&mut self) -> bool;

    /// Is the platform paused mid-utterance?
    fn is_paused(&mut self) -> bool;
}

/// Create the platform speech service
///
/// Uses the `tts` crate, which binds to:
/// - Speech Dispatcher on Linux
/// - AVFoundation on macOS
/// - SAPI/WinRT on Windows
///
/// Initialization failure is reported to the caller; the application still
/// runs, relying on the fallback engine for audio.
pub fn create_speech() -> Result<Box<dyn NativeSpeech>> {
    let platform = std::env::consts::OS;
    info!("Creating platform speech service for: {}", platform);

    use super::backends::native::NativeSynth;
    let synth = NativeSynth::new()?;
    info!("Platform speech service initialized");
    Ok(Box::new(synth))
}
