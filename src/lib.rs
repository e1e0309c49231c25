//! t2s - text to speech reader
//!
//! An interactive command-line text-to-speech tool. Speaks typed text through
//! the platform's built-in speech synthesis, or through a locally-run Kokoro
//! neural voice when no native voices are available. Synthesized audio can
//! also be exported as a WAV file.

pub mod app;
pub mod audio;
pub mod engine;
pub mod error;
pub mod export;
pub mod playback;
pub mod speech;
pub mod state;

pub use error::{Result, T2sError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "t2s";
