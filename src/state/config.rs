//! Configuration management

use crate::{Result, T2sError};
use ini::Ini;
use log::{debug, info};
use std::path::PathBuf;

/// Application configuration
///
/// Persists speech settings (rate, locale, fallback voice) and the engine /
/// export overrides between sessions.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.t2s.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from disk or create default
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from an explicit path (tests use a temp dir)
    pub fn load_from(path: PathBuf) -> Result<Self> {
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| T2sError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| T2sError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| T2sError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.t2s.cfg)
    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".t2s.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("rate", "1.0")
            .set("preferred_locale", "en")
            .set("fallback_voice", crate::engine::DEFAULT_FALLBACK_VOICE);

        ini.with_section(Some("engine"))
            .set("model", crate::engine::MODEL_ID);

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get a float value from config
    pub fn get_float(&self, section: &str, key: &str, default: f32) -> f32 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    // Typed getters

    /// Rate multiplier (1.0 = normal); clamping happens in the session
    pub fn rate(&self) -> f32 {
        self.get_float("speech", "rate", 1.0)
    }

    /// Language prefix preferred when picking a default native voice
    pub fn preferred_locale(&self) -> String {
        self.get_string("speech", "preferred_locale", "en")
    }

    /// Kokoro voice for fallback playback and export
    pub fn fallback_voice(&self) -> String {
        self.get_string("speech", "fallback_voice", crate::engine::DEFAULT_FALLBACK_VOICE)
    }

    /// Override for the Kokoro CLI binary
    pub fn engine_program(&self) -> Option<String> {
        self.ini
            .get_from(Some("engine"), "program")
            .map(str::to_string)
    }

    /// Model identifier handed to the engine
    pub fn model(&self) -> String {
        self.get_string("engine", "model", crate::engine::MODEL_ID)
    }

    /// Where exported WAV files go: config override, else the platform
    /// downloads directory, else the working directory
    pub fn export_dir(&self) -> PathBuf {
        if let Some(dir) = self.ini.get_from(Some("export"), "directory") {
            return PathBuf::from(dir);
        }
        dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
    }
}
