//! Kokoro engine bridge
//!
//! Runs a locally installed Kokoro CLI as a subprocess and captures the WAV
//! it produces. The accelerated backend maps to the CLI's GPU mode, which is
//! probed at load time so that loading fails cleanly (and the loader retries
//! with the universal backend) on machines without GPU support.
//!
//! Dependencies:
//! - a Kokoro CLI on PATH (`kokoro-tts` or `koko`), pointed at the
//!   Kokoro-82M ONNX model

use std::process::{Command, Stdio};

use super::{AudioClip, ExecutionBackend, SynthesisOptions, TtsEngine};
use crate::{Result, T2sError};
use log::{debug, error, info};

/// Candidate binary names probed in order
const PROGRAM_CANDIDATES: &[&str] = &["kokoro-tts", "koko"];

/// Kokoro engine backed by a local CLI
pub struct KokoroProcess {
    /// Resolved path/name of the Kokoro CLI
    program: String,

    /// Model identifier passed through to the CLI
    model: String,

    /// Execution backend the engine was loaded with
    backend: ExecutionBackend,
}

impl KokoroProcess {
    /// Load the engine: resolve the CLI, verify it runs, and (for the
    /// accelerated backend) verify GPU mode is available.
    pub fn load(
        program_override: Option<&str>,
        model: &str,
        backend: ExecutionBackend,
    ) -> Result<Self> {
        let program = match program_override {
            Some(program) => {
                Self::verify_program(program)?;
                program.to_string()
            }
            None => Self::find_program()?,
        };
        debug!("Found Kokoro CLI at: {}", program);

        if backend == ExecutionBackend::Accelerated {
            Self::probe_gpu(&program)?;
        }

        info!("Kokoro engine loaded ({:?} backend, model {})", backend, model);

        Ok(Self {
            program,
            model: model.to_string(),
            backend,
        })
    }

    /// Find a Kokoro CLI on the PATH
    fn find_program() -> Result<String> {
        for candidate in PROGRAM_CANDIDATES {
            if Self::verify_program(candidate).is_ok() {
                return Ok(candidate.to_string());
            }
        }

        Err(T2sError::Engine(
            "Kokoro CLI not found. Install kokoro-tts and make sure it is on PATH.".to_string(),
        ))
    }

    /// Check that the program exists and answers --version
    fn verify_program(program: &str) -> Result<()> {
        let status = Command::new(program)
            .arg("--version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|e| T2sError::Engine(format!("{} not runnable: {}", program, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(T2sError::Engine(format!(
                "{} --version exited with {}",
                program, status
            )))
        }
    }

    /// Check that the CLI advertises GPU mode
    fn probe_gpu(program: &str) -> Result<()> {
        let output = Command::new(program)
            .arg("--help")
            .stderr(Stdio::null())
            .output()
            .map_err(|e| T2sError::Engine(format!("{} --help failed: {}", program, e)))?;

        let help = String::from_utf8_lossy(&output.stdout);
        if help.contains("--gpu") {
            Ok(())
        } else {
            Err(T2sError::Engine(format!(
                "{} has no GPU mode; accelerated backend unavailable",
                program
            )))
        }
    }

    /// Kokoro CLIs take the rate as a plain multiplier
    fn speed_arg(speed: f32) -> String {
        format!("{:.1}", speed)
    }
}

impl TtsEngine for KokoroProcess {
    fn generate(&mut self, text: &str, options: &SynthesisOptions) -> Result<AudioClip> {
        if text.is_empty() {
            return Err(T2sError::Engine("Nothing to synthesize".to_string()));
        }

        let out = tempfile::Builder::new()
            .prefix("t2s-gen-")
            .suffix(".wav")
            .tempfile()
            .map_err(|e| T2sError::Engine(format!("Failed to create temp WAV: {}", e)))?;

        let mut cmd = Command::new(&self.program);
        cmd.arg("--model").arg(&self.model);
        cmd.arg("--voice").arg(&options.voice);
        cmd.arg("--speed").arg(Self::speed_arg(options.speed));
        cmd.arg("--output").arg(out.path());
        if self.backend == ExecutionBackend::Accelerated {
            cmd.arg("--gpu");
        }
        cmd.arg("--text").arg(text);
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::null());

        debug!(
            "Synthesizing {} chars with voice {} at speed {}",
            text.chars().count(),
            options.voice,
            options.speed
        );

        let status = cmd
            .status()
            .map_err(|e| T2sError::Engine(format!("Failed to run {}: {}", self.program, e)))?;

        if !status.success() {
            error!("{} exited with {}", self.program, status);
            return Err(T2sError::Engine(format!(
                "Synthesis failed: {} exited with {}",
                self.program, status
            )));
        }

        let wav = std::fs::read(out.path())
            .map_err(|e| T2sError::Engine(format!("Failed to read synthesized WAV: {}", e)))?;

        validate_wav(&wav)?;
        debug!("Synthesized {} bytes", wav.len());
        Ok(AudioClip::new(wav))
    }
}

/// Reject empty or non-WAV output before it reaches the decoder
fn validate_wav(bytes: &[u8]) -> Result<()> {
    if bytes.len() < 12 || !bytes.starts_with(b"RIFF") || !bytes[8..12].starts_with(b"WAVE") {
        return Err(T2sError::Engine(
            "Engine produced no usable WAV output".to_string(),
        ));
    }
    Ok(())
}
