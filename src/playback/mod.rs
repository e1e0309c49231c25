//! Playback control

pub mod controller;

pub use controller::{Phase, PlaybackController, PlaybackMode};
