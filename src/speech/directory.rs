//! Voice directory
//!
//! Tracks the platform's available native voices. Some platforms populate
//! the list asynchronously after startup, so the directory re-requests it on
//! a short interval until a non-empty list arrives. If nothing arrives
//! within the timeout it settles as "timed out with no voices", which is the
//! trigger for fallback mode for the rest of the session.
//!
//! Time is passed in by the caller, so the poll/timeout race is a pure state
//! machine: a single deadline plus a one-shot settled latch.

use std::time::{Duration, Instant};

use crate::speech::{NativeSpeech, Voice};
use log::{debug, info};

/// How long to wait for a non-empty voice list before giving up
pub const VOICE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Interval between voice list requests while waiting
pub const POLL_INTERVAL: Duration = Duration::from_millis(300);

/// Directory of native platform voices
pub struct VoiceDirectory {
    /// Current voice list; replaced wholesale on each refresh
    voices: Vec<Voice>,

    /// Selected voice id, if any
    selected: Option<String>,

    /// One-shot latch: set when a list arrives or the timeout fires.
    /// Once settled the directory never re-polls.
    settled: bool,

    /// The timeout fired before any voice arrived
    timed_out: bool,

    /// Language prefix used for default voice selection, e.g. "en"
    preferred_locale: String,

    /// When discovery started (timeout deadline base)
    started: Instant,

    /// Last time the platform list was requested
    last_poll: Option<Instant>,
}

impl VoiceDirectory {
    pub fn new(preferred_locale: &str, now: Instant) -> Self {
        Self {
            voices: Vec::new(),
            selected: None,
            settled: false,
            timed_out: false,
            preferred_locale: preferred_locale.to_string(),
            started: now,
            last_poll: None,
        }
    }

    /// Drive discovery: re-request the list when the interval has elapsed,
    /// and fire the timeout when the window closes.
    ///
    /// Returns true if the directory settled during this call.
    pub fn poll(&mut self, speech: &mut dyn NativeSpeech, now: Instant) -> bool {
        if self.settled {
            return false;
        }

        let due = match self.last_poll {
            None => true,
            Some(last) => now.duration_since(last) >= POLL_INTERVAL,
        };
        if due {
            self.last_poll = Some(now);
            self.refresh(speech);
            if self.settled {
                return true;
            }
        }

        if now.duration_since(self.started) >= VOICE_TIMEOUT {
            info!("No native voices after {:?}, entering fallback mode", VOICE_TIMEOUT);
            self.settled = true;
            self.timed_out = true;
            return true;
        }

        false
    }

    /// Request the voice list from the platform and store it if non-empty.
    ///
    /// Also serves as the availability-changed notification entry point.
    pub fn refresh(&mut self, speech: &mut dyn NativeSpeech) {
        let list = match speech.voices() {
            Ok(list) => list,
            Err(e) => {
                debug!("Voice enumeration failed: {}", e);
                return;
            }
        };

        if list.is_empty() {
            debug!("Voice list still empty");
            return;
        }

        info!("Voice list arrived: {} voices", list.len());
        self.settled = true;
        self.voices = list;
        self.selected = self.pick_default();
    }

    /// Keep a still-valid previous selection; otherwise the first voice in
    /// the preferred locale; otherwise the first voice.
    fn pick_default(&self) -> Option<String> {
        if let Some(prev) = &self.selected {
            if self.voices.iter().any(|v| &v.id == prev) {
                return Some(prev.clone());
            }
        }
        self.voices
            .iter()
            .find(|v| v.language.starts_with(&self.preferred_locale))
            .or_else(|| self.voices.first())
            .map(|v| v.id.clone())
    }

    /// Fallback mode is entered when discovery timed out with zero voices.
    /// This is a one-way switch for the session.
    pub fn fallback_mode(&self) -> bool {
        self.timed_out && self.voices.is_empty()
    }

    /// Has discovery concluded (list arrived or timed out)?
    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn timed_out(&self) -> bool {
        self.timed_out
    }

    pub fn voices(&self) -> &[Voice] {
        &self.voices
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a voice by id; rejected if the id is not in the current list
    pub fn select(&mut self, id: &str) -> bool {
        if self.voices.iter().any(|v| v.id == id) {
            self.selected = Some(id.to_string());
            true
        } else {
            false
        }
    }
}
