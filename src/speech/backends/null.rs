//! Stub backend used when no platform speech service can be initialized
//!
//! Reports an empty voice list forever, so voice discovery times out and
//! the application switches to the fallback engine.

use crate::speech::{NativeSpeech, Utterance, Voice};
use crate::{Result, T2sError};

pub struct NullSynth;

impl NativeSpeech for NullSynth {
    fn voices(&mut self) -> Result<Vec<Voice>> {
        Ok(Vec::new())
    }

    fn speak(&mut self, _utterance: Utterance) -> Result<()> {
        Err(T2sError::Speech(
            "No platform speech service available".to_string(),
        ))
    }

    fn pause(&mut self) -> Result<()> {
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_speaking(&mut self) -> bool {
        false
    }

    fn is_paused(&mut self) -> bool {
        false
    }
}
