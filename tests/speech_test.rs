//! Integration tests for the platform speech service
//!
//! These probe the real backend and therefore tolerate environments
//! without a speech service (CI, containers).

use t2s::speech::{create_speech, Utterance};

#[test]
fn test_create_platform_speech() {
    match create_speech() {
        Ok(speech) => {
            println!("platform speech service initialized");
            drop(speech);
        }
        Err(e) => {
            // Acceptable in headless environments
            println!("speech initialization failed (may be expected): {}", e);
        }
    }
}

#[test]
fn test_voice_enumeration_has_language_tags() {
    if let Ok(mut speech) = create_speech() {
        match speech.voices() {
            Ok(voices) => {
                for voice in &voices {
                    assert!(!voice.language.is_empty(), "voice {} has no language", voice.id);
                }
                println!("{} voices enumerated", voices.len());
            }
            Err(e) => println!("voice enumeration failed (may be expected): {}", e),
        }
    } else {
        println!("skipping enumeration test (speech not available)");
    }
}

#[test]
fn test_speak_and_cancel() {
    if let Ok(mut speech) = create_speech() {
        let result = speech.speak(Utterance {
            text: "Integration test".to_string(),
            voice: None,
            rate: 1.0,
        });
        println!("speak result: {:?}", result.is_ok());

        assert!(speech.cancel().is_ok(), "cancel should not error");
        // Cancel with nothing queued is a tolerated no-op
        assert!(speech.cancel().is_ok(), "repeat cancel should not error");
    } else {
        println!("skipping speak test (speech not available)");
    }
}

#[test]
fn test_rate_extremes_accepted() {
    if let Ok(mut speech) = create_speech() {
        for rate in [0.5, 1.0, 2.0] {
            let result = speech.speak(Utterance {
                text: "rate test".to_string(),
                voice: None,
                rate,
            });
            println!("rate {} result: {:?}", rate, result.is_ok());
        }
        let _ = speech.cancel();
    } else {
        println!("skipping rate test (speech not available)");
    }
}
