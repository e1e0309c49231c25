//! Audio output for fallback playback
//!
//! Decodes engine-produced WAV bytes into a buffer-backed playback node.
//! The output context is created once on first use and reused for the rest
//! of the session.

pub mod output;

pub use output::RodioOutput;

use crate::Result;

/// Audio output subsystem
pub trait AudioOutput {
    /// Decode WAV bytes and start playing them, returning the live node
    fn play_wav(&mut self, wav: Vec<u8>) -> Result<Box<dyn ClipHandle>>;
}

/// A buffer-backed playback node
///
/// Not resumable: the only controls are stop and a drained query.
pub trait ClipHandle: Send {
    /// Stop playback and discard queued audio. Safe to call when already
    /// stopped.
    fn stop(&mut self);

    /// Has the node drained (playback finished naturally)?
    fn is_finished(&self) -> bool;
}
