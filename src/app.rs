//! Application wiring and command surface
//!
//! Owns the session, voice directory, engine loader, playback controller,
//! and exporter, and renders their state as terminal output. Commands are
//! colon-prefixed; any other input line becomes the text to speak.

use std::time::Instant;

use crate::audio::{AudioOutput, RodioOutput};
use crate::engine::kokoro::KokoroProcess;
use crate::engine::{EngineLoader, LoaderPhase, TtsEngine, KOKORO_VOICES};
use crate::export::Exporter;
use crate::playback::{Phase, PlaybackController, PlaybackMode};
use crate::speech::backends::null::NullSynth;
use crate::speech::{create_speech, NativeSpeech, VoiceDirectory};
use crate::state::{Config, Session, RATE_MAX, RATE_MIN};
use crate::Result;
use log::{info, warn};

/// What the event loop should do after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// Top-level application state
pub struct App {
    pub config: Config,
    session: Session,
    directory: VoiceDirectory,
    loader: EngineLoader,
    controller: PlaybackController,
    exporter: Exporter,

    /// The automatic engine load fires once, when fallback mode is entered
    engine_load_attempted: bool,
}

impl App {
    pub fn new(now: Instant) -> Result<Self> {
        let config = Config::load()?;

        let speech = match create_speech() {
            Ok(speech) => speech,
            Err(e) => {
                // Discovery will time out and fallback mode takes over
                warn!("Platform speech unavailable: {}", e);
                Box::new(NullSynth)
            }
        };

        let program = config.engine_program();
        let model = config.model();
        let loader = EngineLoader::new(Box::new(move |backend| {
            KokoroProcess::load(program.as_deref(), &model, backend)
                .map(|engine| Box::new(engine) as Box<dyn TtsEngine>)
        }));

        Ok(Self::from_parts(
            config,
            speech,
            Box::new(RodioOutput::new()),
            loader,
            now,
        ))
    }

    /// Assemble the application from explicit backends. `new` wires the
    /// production ones; tests supply mocks.
    pub fn from_parts(
        config: Config,
        speech: Box<dyn NativeSpeech>,
        output: Box<dyn AudioOutput>,
        loader: EngineLoader,
        now: Instant,
    ) -> Self {
        let directory = VoiceDirectory::new(&config.preferred_locale(), now);
        let controller = PlaybackController::new(speech, output);
        let exporter = Exporter::new(config.export_dir());
        let session = Session::from_config(&config);

        Self {
            config,
            session,
            directory,
            loader,
            controller,
            exporter,
            engine_load_attempted: false,
        }
    }

    /// Cooperative tick: drive voice discovery, the one-shot fallback
    /// switch, and playback completion.
    pub fn tick(&mut self, now: Instant) {
        if self.directory.poll(self.controller.speech_mut(), now) {
            if self.directory.fallback_mode() {
                self.controller.enter_fallback();
                println!("No native voices found - using Kokoro TTS (runs locally)");
            } else {
                self.session.native_voice = self.directory.selected().map(str::to_string);
                let name = self
                    .directory
                    .selected()
                    .and_then(|id| self.directory.voices().iter().find(|v| v.id == id))
                    .map(|v| format!("{} ({})", v.name, v.language))
                    .unwrap_or_default();
                println!(
                    "{} native voices available, default: {}",
                    self.directory.voices().len(),
                    name
                );
            }
        }

        if self.directory.fallback_mode() && !self.engine_load_attempted {
            self.engine_load_attempted = true;
            println!("Loading Kokoro engine...");
            match self.loader.ensure_ready() {
                Ok(()) => println!("Kokoro engine ready"),
                Err(e) => println!("Kokoro engine failed to load: {} (speak disabled)", e),
            }
        }

        let was_speaking = self.controller.phase() == Phase::Speaking;
        self.controller.poll();
        if was_speaking && self.controller.phase() == Phase::Idle {
            println!("Done.");
        }
    }

    /// Handle one input line
    pub fn handle_line(&mut self, line: &str) -> Action {
        let line = line.trim();
        if line.is_empty() {
            return Action::Continue;
        }

        if !line.starts_with(':') {
            self.session.text = line.to_string();
            println!("Text set ({} chars)", line.chars().count());
            return Action::Continue;
        }

        let (command, arg) = match line.split_once(char::is_whitespace) {
            Some((cmd, rest)) => (cmd, rest.trim()),
            None => (line, ""),
        };

        match command {
            ":help" => self.print_help(),
            ":status" => self.print_status(),
            ":voices" => self.print_voices(),
            ":voice" => self.select_voice(arg),
            ":rate" => self.set_rate(arg),
            ":speak" | ":play" => self.speak(),
            ":pause" => {
                if let Err(e) = self.controller.pause() {
                    println!("Pause failed: {}", e);
                }
            }
            ":resume" => {
                if let Err(e) = self.controller.resume() {
                    println!("Resume failed: {}", e);
                }
            }
            ":stop" => self.controller.stop(),
            ":save" => self.export(),
            ":quit" | ":q" | ":exit" => {
                self.shutdown();
                return Action::Quit;
            }
            other => println!("Unknown command {} (try :help)", other),
        }

        Action::Continue
    }

    fn speak(&mut self) {
        let Some(text) = self.session.trimmed_text() else {
            return;
        };

        if self.controller.mode() == PlaybackMode::Fallback && !self.loader.is_ready() {
            match self.loader.phase() {
                LoaderPhase::Loading => println!("Kokoro engine still loading..."),
                _ => println!("Kokoro engine not available"),
            }
            return;
        }

        let text = text.to_string();
        let voice = self.session.native_voice.clone();
        let fallback_voice = self.session.fallback_voice.clone();
        let rate = self.session.rate();

        let result = self.controller.speak(
            &text,
            voice.as_deref(),
            &fallback_voice,
            rate,
            self.loader.engine_mut(),
        );

        match result {
            Ok(()) if self.controller.phase() == Phase::Speaking => println!("Speaking..."),
            Ok(()) => {}
            Err(e) => println!("Speak failed: {}", e),
        }
    }

    fn export(&mut self) {
        let Some(text) = self.session.trimmed_text().map(str::to_string) else {
            println!("Nothing to export");
            return;
        };

        // Export uses the fallback voice selection only when the session
        // actually runs on the fallback backend
        let voice = if self.controller.mode() == PlaybackMode::Fallback {
            self.session.fallback_voice.clone()
        } else {
            crate::engine::DEFAULT_FALLBACK_VOICE.to_string()
        };

        println!("Exporting...");
        match self
            .exporter
            .download_audio(&mut self.loader, &text, &voice, self.session.rate())
        {
            Ok(Some(path)) => println!("Saved {}", path.display()),
            Ok(None) => println!("Export already in progress"),
            Err(e) => println!("Export failed: {}", e),
        }
    }

    fn select_voice(&mut self, arg: &str) {
        if arg.is_empty() {
            println!("Usage: :voice <id>");
            return;
        }

        if self.controller.mode() == PlaybackMode::Fallback {
            if KOKORO_VOICES.contains(&arg) {
                self.session.fallback_voice = arg.to_string();
                println!("Voice set to {}", arg);
            } else {
                println!("Unknown Kokoro voice {} (see :voices)", arg);
            }
            return;
        }

        if self.directory.select(arg) {
            self.session.native_voice = Some(arg.to_string());
            println!("Voice set to {}", arg);
        } else {
            println!("Unknown voice {} (see :voices)", arg);
        }
    }

    fn set_rate(&mut self, arg: &str) {
        match arg.parse::<f32>() {
            Ok(rate) => {
                self.session.set_rate(rate);
                println!("Speed: {:.1}x", self.session.rate());
            }
            Err(_) => println!("Usage: :rate <{:.1}-{:.1}>", RATE_MIN, RATE_MAX),
        }
    }

    fn print_voices(&self) {
        if self.controller.mode() == PlaybackMode::Fallback {
            println!("Kokoro voices:");
            for voice in KOKORO_VOICES {
                let marker = if voice == self.session.fallback_voice {
                    "*"
                } else {
                    " "
                };
                println!("  {} {}", marker, voice);
            }
            return;
        }

        if self.directory.voices().is_empty() {
            if self.directory.timed_out() {
                println!("Default voice only");
            } else {
                println!("Loading voices...");
            }
            return;
        }

        println!("Native voices:");
        for voice in self.directory.voices() {
            let marker = if Some(voice.id.as_str()) == self.directory.selected() {
                "*"
            } else {
                " "
            };
            println!("  {} {} - {} ({})", marker, voice.id, voice.name, voice.language);
        }
    }

    fn print_status(&self) {
        let mode = match self.controller.mode() {
            PlaybackMode::Native => "native",
            PlaybackMode::Fallback => "kokoro",
        };
        let phase = match self.controller.phase() {
            Phase::Idle => "idle",
            Phase::Speaking => "speaking",
            Phase::Paused => "paused",
        };
        println!("Backend: {}  Phase: {}  Speed: {:.1}x", mode, phase, self.session.rate());
        match self.session.trimmed_text() {
            Some(text) => println!("Text: {}", text),
            None => println!("Text: (none)"),
        }
    }

    fn print_help(&self) {
        println!("Enter text to set what is spoken, then:");
        println!("  :speak            play the text");
        println!("  :pause / :resume  pause and resume playback");
        println!("  :stop             stop playback");
        println!("  :save             export the text as a WAV file");
        println!("  :voices           list available voices");
        println!("  :voice <id>       select a voice");
        println!("  :rate <x>         set speed ({:.1}-{:.1})", RATE_MIN, RATE_MAX);
        println!("  :status           show current state");
        println!("  :quit             exit");
    }

    /// Persist settings and silence any in-flight speech
    fn shutdown(&mut self) {
        self.controller.stop();

        let rate = format!("{:.1}", self.session.rate());
        self.config.set("speech", "rate", &rate);
        let fallback_voice = self.session.fallback_voice.clone();
        self.config.set("speech", "fallback_voice", &fallback_voice);
        if let Err(e) = self.config.save() {
            warn!("Failed to save config: {}", e);
        } else {
            info!("Settings saved to {:?}", self.config.path());
        }
    }
}
