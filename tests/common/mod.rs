//! Shared mocks for integration tests
//!
//! Deterministic stand-ins for the three external services: the platform
//! speech service, the audio output subsystem, and the neural engine.

use std::sync::{Arc, Mutex};

use t2s::audio::{AudioOutput, ClipHandle};
use t2s::engine::{AudioClip, SynthesisOptions, TtsEngine};
use t2s::speech::{NativeSpeech, Utterance, Voice};
use t2s::Result;
use t2s::T2sError;

pub fn voice(id: &str, lang: &str) -> Voice {
    Voice {
        id: id.to_string(),
        name: id.to_string(),
        language: lang.to_string(),
    }
}

// --- platform speech ---

#[derive(Default)]
pub struct SpeechLog {
    pub voices: Vec<Voice>,
    pub utterances: Vec<Utterance>,
    pub cancels: usize,
    pub pauses: usize,
    pub resumes: usize,
    pub speaking: bool,
    pub paused: bool,
    /// When set, pause errors like a backend without platform pause
    pub pause_unsupported: bool,
}

/// Mock platform speech service; state shared with the test through the log
pub struct MockSpeech {
    pub log: Arc<Mutex<SpeechLog>>,
}

impl MockSpeech {
    pub fn new() -> (Self, Arc<Mutex<SpeechLog>>) {
        let log = Arc::new(Mutex::new(SpeechLog::default()));
        (Self { log: Arc::clone(&log) }, log)
    }
}

impl NativeSpeech for MockSpeech {
    fn voices(&mut self) -> Result<Vec<Voice>> {
        Ok(self.log.lock().unwrap().voices.clone())
    }

    fn speak(&mut self, utterance: Utterance) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        // The backend contract: queued speech is cancelled before the new
        // utterance is submitted
        log.cancels += 1;
        log.utterances.push(utterance);
        log.speaking = true;
        log.paused = false;
        Ok(())
    }

    fn pause(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        if log.pause_unsupported {
            return Err(T2sError::Speech("pause not supported".to_string()));
        }
        log.pauses += 1;
        log.paused = true;
        Ok(())
    }

    fn resume(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.resumes += 1;
        log.paused = false;
        Ok(())
    }

    fn cancel(&mut self) -> Result<()> {
        let mut log = self.log.lock().unwrap();
        log.cancels += 1;
        log.speaking = false;
        log.paused = false;
        Ok(())
    }

    fn is_speaking(&mut self) -> bool {
        self.log.lock().unwrap().speaking
    }

    fn is_paused(&mut self) -> bool {
        self.log.lock().unwrap().paused
    }
}

// --- audio output ---

#[derive(Default)]
pub struct ClipState {
    pub stopped: bool,
    pub finished: bool,
}

pub struct MockClip {
    pub state: Arc<Mutex<ClipState>>,
}

impl ClipHandle for MockClip {
    fn stop(&mut self) {
        self.state.lock().unwrap().stopped = true;
    }

    fn is_finished(&self) -> bool {
        let state = self.state.lock().unwrap();
        state.finished || state.stopped
    }
}

#[derive(Default)]
pub struct OutputLog {
    /// One entry per started clip, shared with the handle given out
    pub clips: Vec<Arc<Mutex<ClipState>>>,
    pub fail: bool,
}

/// Mock audio output; clip states shared with the test through the log
pub struct MockOutput {
    pub log: Arc<Mutex<OutputLog>>,
}

impl MockOutput {
    pub fn new() -> (Self, Arc<Mutex<OutputLog>>) {
        let log = Arc::new(Mutex::new(OutputLog::default()));
        (Self { log: Arc::clone(&log) }, log)
    }
}

impl AudioOutput for MockOutput {
    fn play_wav(&mut self, _wav: Vec<u8>) -> Result<Box<dyn ClipHandle>> {
        let mut log = self.log.lock().unwrap();
        if log.fail {
            return Err(T2sError::Audio("decode failed".to_string()));
        }
        let state = Arc::new(Mutex::new(ClipState::default()));
        log.clips.push(Arc::clone(&state));
        Ok(Box::new(MockClip { state }))
    }
}

// --- neural engine ---

#[derive(Default)]
pub struct MockEngine {
    pub calls: Vec<(String, SynthesisOptions)>,
    pub fail: bool,
}

impl TtsEngine for MockEngine {
    fn generate(&mut self, text: &str, options: &SynthesisOptions) -> Result<AudioClip> {
        self.calls.push((text.to_string(), options.clone()));
        if self.fail {
            return Err(T2sError::Engine("synthesis failed".to_string()));
        }
        Ok(AudioClip::new(b"RIFF\0\0\0\0WAVEdata".to_vec()))
    }
}
