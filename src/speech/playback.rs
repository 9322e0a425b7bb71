use once_cell::sync::Lazy;
use regex::Regex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::speech::engine::{PlaybackEvent, SynthesisEngine};

/// Voice names preferred for narration, checked case-insensitively
static PREFERRED_VOICE: Lazy<Regex> =
    Lazy::new(|| Regex::new("(?i)male|daniel|en-us|google uk english male").expect("valid regex"));

/// Picks the narration voice from an engine's catalog
///
/// First voice matching the preference pattern wins, else the first voice in
/// the catalog, else none (the engine default is used for playback).
pub fn select_voice(voices: &[String]) -> Option<String> {
    voices
        .iter()
        .find(|v| PREFERRED_VOICE.is_match(v))
        .or_else(|| voices.first())
        .cloned()
}

/// Speech playback adapter over an optional synthesis engine
///
/// At most one utterance is audible at a time: speaking again cancels the
/// in-flight utterance first. Playback failures are logged and swallowed,
/// they never reach the caller.
pub struct SpeechPlayback {
    engine: Option<Arc<dyn SynthesisEngine>>,
    speaking: Arc<AtomicBool>,
    // Utterances whose finish event is still outstanding; the speaking flag
    // holds true while any remain, so superseding never shows a false gap
    active: Arc<AtomicUsize>,
    voice: Option<String>,
}

impl SpeechPlayback {
    /// Creates a new SpeechPlayback, resolving the voice once
    pub fn new(engine: Option<Arc<dyn SynthesisEngine>>) -> Self {
        let voice = engine.as_ref().and_then(|e| select_voice(&e.voices()));
        if let Some(ref voice) = voice {
            log::info!("Narration voice: {}", voice);
        }
        Self {
            engine,
            speaking: Arc::new(AtomicBool::new(false)),
            active: Arc::new(AtomicUsize::new(0)),
            voice,
        }
    }

    /// Whether a synthesis engine is available
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Narrates `text`, superseding any utterance still playing
    ///
    /// No-op when no engine is available.
    pub fn speak(&self, text: &str) {
        let Some(engine) = &self.engine else {
            return;
        };

        engine.cancel();

        let (tx, mut rx) = mpsc::channel(8);
        if let Err(e) = engine.speak(text, self.voice.as_deref(), tx) {
            log::error!("Speech playback failed: {}", e);
            return;
        }

        let speaking = self.speaking.clone();
        let active = self.active.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    PlaybackEvent::Started => {
                        active.fetch_add(1, Ordering::Relaxed);
                        speaking.store(true, Ordering::Relaxed);
                    }
                    PlaybackEvent::Finished => {
                        if active.fetch_sub(1, Ordering::Relaxed) == 1 {
                            speaking.store(false, Ordering::Relaxed);
                        }
                    }
                }
            }
        });
    }

    pub fn is_speaking(&self) -> bool {
        self.speaking.load(Ordering::Relaxed)
    }

    /// Get the speaking flag reference
    pub fn get_speaking(&self) -> Arc<AtomicBool> {
        self.speaking.clone()
    }
}

impl Drop for SpeechPlayback {
    fn drop(&mut self) {
        if let Some(engine) = &self.engine {
            engine.cancel();
        }
    }
}
