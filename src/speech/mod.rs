//! Platform speech synthesis

pub mod backends;
pub mod directory;
pub mod synth;

pub use directory::{VoiceDirectory, POLL_INTERVAL, VOICE_TIMEOUT};
pub use synth::{create_speech, NativeSpeech, Utterance, Voice};
