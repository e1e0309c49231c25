//! rodio-backed audio output
//!
//! One `OutputStream` is acquired lazily and kept for the lifetime of the
//! process; each clip gets its own `Sink`, which is the playback node the
//! controller holds on to.

use std::io::Cursor;

use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};

use super::{AudioOutput, ClipHandle};
use crate::{Result, T2sError};
use log::debug;

/// Audio output over the default device
pub struct RodioOutput {
    /// Stream plus its handle; `None` until first playback.
    /// The stream must be kept alive for sinks to produce sound.
    context: Option<(OutputStream, OutputStreamHandle)>,
}

impl RodioOutput {
    pub fn new() -> Self {
        Self { context: None }
    }

    /// Acquire (or reuse) the output stream
    fn handle(&mut self) -> Result<&OutputStreamHandle> {
        if self.context.is_none() {
            let (stream, handle) = OutputStream::try_default()
                .map_err(|e| T2sError::Audio(format!("No output device: {}", e)))?;
            debug!("Audio output stream opened on default device");
            self.context = Some((stream, handle));
        }
        Ok(&self.context.as_ref().expect("context just set").1)
    }
}

impl Default for RodioOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioOutput for RodioOutput {
    fn play_wav(&mut self, wav: Vec<u8>) -> Result<Box<dyn ClipHandle>> {
        let handle = self.handle()?;

        let sink = Sink::try_new(handle)
            .map_err(|e| T2sError::Audio(format!("Failed to create sink: {}", e)))?;

        let source = Decoder::new_wav(Cursor::new(wav))
            .map_err(|e| T2sError::Audio(format!("WAV decode failed: {}", e)))?;

        sink.append(source);
        debug!("Clip playback started");

        Ok(Box::new(RodioClip { sink }))
    }
}

/// Playback node wrapping a rodio sink
struct RodioClip {
    sink: Sink,
}

impl ClipHandle for RodioClip {
    fn stop(&mut self) {
        self.sink.stop();
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }
}
