//! Playback controller integration tests
//!
//! Exercises the full control surface over mock backends: phase
//! transitions, single-active-handle teardown, fallback semantics, and the
//! directory-driven backend switch.

mod common;

use std::time::{Duration, Instant};

use common::{voice, MockEngine, MockOutput, MockSpeech};
use t2s::playback::{Phase, PlaybackController, PlaybackMode};
use t2s::speech::{VoiceDirectory, VOICE_TIMEOUT};

fn controller() -> (
    PlaybackController,
    std::sync::Arc<std::sync::Mutex<common::SpeechLog>>,
    std::sync::Arc<std::sync::Mutex<common::OutputLog>>,
) {
    let (speech, speech_log) = MockSpeech::new();
    let (output, output_log) = MockOutput::new();
    let controller = PlaybackController::new(Box::new(speech), Box::new(output));
    (controller, speech_log, output_log)
}

#[test]
fn test_speak_empty_text_is_noop() {
    let (mut controller, speech_log, _) = controller();

    controller.speak("", None, "af_heart", 1.0, None).unwrap();
    controller.speak("   \t\n ", None, "af_heart", 1.0, None).unwrap();

    assert_eq!(controller.phase(), Phase::Idle);
    assert!(!controller.has_active_audio());
    assert!(speech_log.lock().unwrap().utterances.is_empty());
}

#[test]
fn test_native_speak_submits_trimmed_utterance() {
    let (mut controller, speech_log, _) = controller();

    controller
        .speak("  Hello world  ", Some("alice"), "af_heart", 1.5, None)
        .unwrap();

    assert_eq!(controller.phase(), Phase::Speaking);
    let log = speech_log.lock().unwrap();
    assert_eq!(log.utterances.len(), 1);
    let utterance = &log.utterances[0];
    assert_eq!(utterance.text, "Hello world");
    assert_eq!(utterance.voice.as_deref(), Some("alice"));
    assert_eq!(utterance.rate, 1.5);
}

#[test]
fn test_native_speak_pause_stop_sequence() {
    let (mut controller, speech_log, _) = controller();

    assert_eq!(controller.phase(), Phase::Idle);

    controller.speak("Hello", Some("alice"), "af_heart", 1.0, None).unwrap();
    assert_eq!(controller.phase(), Phase::Speaking);

    controller.pause().unwrap();
    assert_eq!(controller.phase(), Phase::Paused);
    // Pausing keeps the utterance: no cancel beyond the pre-speak one
    assert_eq!(speech_log.lock().unwrap().cancels, 1);
    assert_eq!(speech_log.lock().unwrap().pauses, 1);

    controller.stop();
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(!controller.has_active_audio());
    // The final stop cancels platform speech unconditionally
    assert_eq!(speech_log.lock().unwrap().cancels, 2);
}

#[test]
fn test_native_pause_resume_roundtrip() {
    let (mut controller, speech_log, _) = controller();

    controller.speak("Hello", None, "af_heart", 1.0, None).unwrap();
    controller.pause().unwrap();
    assert_eq!(controller.phase(), Phase::Paused);

    controller.resume().unwrap();
    assert_eq!(controller.phase(), Phase::Speaking);
    assert_eq!(speech_log.lock().unwrap().resumes, 1);
}

#[test]
fn test_unsupported_pause_keeps_speaking_phase() {
    let (mut controller, speech_log, _) = controller();
    speech_log.lock().unwrap().pause_unsupported = true;

    controller.speak("Hello", None, "af_heart", 1.0, None).unwrap();
    assert_eq!(controller.phase(), Phase::Speaking);

    // The backend cannot pause: the error surfaces and the phase never
    // claims a pause the platform did not deliver
    assert!(controller.pause().is_err());
    assert_eq!(controller.phase(), Phase::Speaking);
    assert!(controller.has_active_audio());

    controller.resume().unwrap();
    assert_eq!(controller.phase(), Phase::Speaking);
}

#[test]
fn test_native_pause_without_speech_is_noop() {
    let (mut controller, speech_log, _) = controller();

    controller.pause().unwrap();
    assert_eq!(controller.phase(), Phase::Idle);
    assert_eq!(speech_log.lock().unwrap().pauses, 0);
}

#[test]
fn test_native_completion_observed_via_poll() {
    let (mut controller, speech_log, _) = controller();

    controller.speak("Hello", None, "af_heart", 1.0, None).unwrap();

    // Platform still speaking: nothing changes
    controller.poll();
    assert_eq!(controller.phase(), Phase::Speaking);

    // Utterance ends
    speech_log.lock().unwrap().speaking = false;
    controller.poll();
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(!controller.has_active_audio());
}

#[test]
fn test_fallback_speak_invokes_engine_with_options() {
    let (mut controller, _, output_log) = controller();
    controller.enter_fallback();

    let mut engine = MockEngine::default();
    controller
        .speak("Hello world", None, "af_bella", 1.5, Some(&mut engine))
        .unwrap();

    assert_eq!(engine.calls.len(), 1);
    let (text, options) = &engine.calls[0];
    assert_eq!(text, "Hello world");
    assert_eq!(options.voice, "af_bella");
    assert_eq!(options.speed, 1.5);

    assert_eq!(controller.phase(), Phase::Speaking);
    assert!(controller.has_active_audio());
    assert_eq!(output_log.lock().unwrap().clips.len(), 1);
}

#[test]
fn test_fallback_speak_truncates_input() {
    let (mut controller, _, _) = controller();
    controller.enter_fallback();

    let mut engine = MockEngine::default();
    let long = "a".repeat(1000);
    controller
        .speak(&long, None, "af_heart", 1.0, Some(&mut engine))
        .unwrap();

    assert_eq!(engine.calls[0].0.chars().count(), 300);
}

#[test]
fn test_fallback_speak_without_engine_is_ignored() {
    let (mut controller, _, output_log) = controller();
    controller.enter_fallback();

    controller.speak("Hello", None, "af_heart", 1.0, None).unwrap();

    assert_eq!(controller.phase(), Phase::Idle);
    assert!(output_log.lock().unwrap().clips.is_empty());
}

#[test]
fn test_new_speak_stops_previous_clip() {
    let (mut controller, _, output_log) = controller();
    controller.enter_fallback();

    let mut engine = MockEngine::default();
    controller.speak("first", None, "af_heart", 1.0, Some(&mut engine)).unwrap();
    controller.speak("second", None, "af_heart", 1.0, Some(&mut engine)).unwrap();

    let log = output_log.lock().unwrap();
    assert_eq!(log.clips.len(), 2);
    // At most one audible source: the first node was stopped before the
    // second started
    assert!(log.clips[0].lock().unwrap().stopped);
    assert!(!log.clips[1].lock().unwrap().stopped);
}

#[test]
fn test_fallback_pause_discards_clip() {
    let (mut controller, _, output_log) = controller();
    controller.enter_fallback();

    let mut engine = MockEngine::default();
    controller.speak("Hello", None, "af_heart", 1.0, Some(&mut engine)).unwrap();
    assert_eq!(controller.phase(), Phase::Speaking);

    controller.pause().unwrap();
    // A buffer node is not resumable: pause discards it entirely
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(!controller.has_active_audio());
    assert!(output_log.lock().unwrap().clips[0].lock().unwrap().stopped);

    // resume after the discard stays idle
    controller.resume().unwrap();
    assert_eq!(controller.phase(), Phase::Idle);
}

#[test]
fn test_fallback_synthesis_failure_resets_to_idle() {
    let (mut controller, _, _) = controller();
    controller.enter_fallback();

    let mut engine = MockEngine { fail: true, ..Default::default() };
    let result = controller.speak("Hello", None, "af_heart", 1.0, Some(&mut engine));

    // Contained: no error escapes, state resets
    assert!(result.is_ok());
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(!controller.has_active_audio());
}

#[test]
fn test_fallback_decode_failure_resets_to_idle() {
    let (mut controller, _, output_log) = controller();
    controller.enter_fallback();
    output_log.lock().unwrap().fail = true;

    let mut engine = MockEngine::default();
    let result = controller.speak("Hello", None, "af_heart", 1.0, Some(&mut engine));

    assert!(result.is_ok());
    assert_eq!(controller.phase(), Phase::Idle);
}

#[test]
fn test_clip_completion_observed_via_poll() {
    let (mut controller, _, output_log) = controller();
    controller.enter_fallback();

    let mut engine = MockEngine::default();
    controller.speak("Hello", None, "af_heart", 1.0, Some(&mut engine)).unwrap();

    controller.poll();
    assert_eq!(controller.phase(), Phase::Speaking);

    output_log.lock().unwrap().clips[0].lock().unwrap().finished = true;
    controller.poll();
    assert_eq!(controller.phase(), Phase::Idle);
    assert!(!controller.has_active_audio());
}

#[test]
fn test_stop_is_idempotent() {
    let (mut controller, _, _) = controller();

    controller.stop();
    controller.stop();
    assert_eq!(controller.phase(), Phase::Idle);
}

#[test]
fn test_directory_timeout_drives_one_way_fallback_switch() {
    let (mut controller, speech_log, _) = controller();
    let t0 = Instant::now();
    let mut directory = VoiceDirectory::new("en", t0);

    directory.poll(controller.speech_mut(), t0);
    assert!(!directory.fallback_mode());

    assert!(directory.poll(controller.speech_mut(), t0 + VOICE_TIMEOUT));
    assert!(directory.fallback_mode());
    controller.enter_fallback();
    assert_eq!(controller.mode(), PlaybackMode::Fallback);

    // Voices appearing later do not flip the switch back
    speech_log.lock().unwrap().voices = vec![voice("late", "en-US")];
    directory.poll(
        controller.speech_mut(),
        t0 + VOICE_TIMEOUT + Duration::from_secs(2),
    );
    assert!(directory.fallback_mode());
    assert_eq!(controller.mode(), PlaybackMode::Fallback);
}

#[test]
fn test_fast_voice_list_keeps_native_mode() {
    let (mut controller, speech_log, _) = controller();
    let t0 = Instant::now();
    let mut directory = VoiceDirectory::new("en", t0);

    speech_log.lock().unwrap().voices = vec![voice("Alice", "en-US")];
    assert!(directory.poll(controller.speech_mut(), t0 + Duration::from_millis(200)));

    assert_eq!(directory.selected(), Some("Alice"));
    assert!(!directory.fallback_mode());
    assert_eq!(controller.mode(), PlaybackMode::Native);
}
