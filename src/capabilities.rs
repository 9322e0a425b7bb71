use std::process::{Command, Stdio};
use std::sync::Arc;

use crate::config::AppConfig;
use crate::speech::{CommandRecognizer, CommandSynthesizer, RecognitionEngine, SynthesisEngine};

/// Static hint shown in the UI when speech support is limited
pub const CAPABILITY_HINT: &str =
    "Note: voice features are limited on this system. Text and quick actions still work.";

/// Speech capabilities resolved once at startup
///
/// Probing happens here and nowhere else; the adapters receive the probed
/// engines by injection and never inspect the environment themselves.
pub struct Capabilities {
    pub recognition: Option<Arc<dyn RecognitionEngine>>,
    pub synthesis: Option<Arc<dyn SynthesisEngine>>,
}

impl Capabilities {
    pub fn stt_ready(&self) -> bool {
        self.recognition.is_some()
    }

    pub fn tts_ready(&self) -> bool {
        self.synthesis.is_some()
    }

    /// UI hint line, present when either capability is missing
    pub fn hint(&self) -> Option<&'static str> {
        if self.stt_ready() && self.tts_ready() {
            None
        } else {
            Some(CAPABILITY_HINT)
        }
    }
}

/// Probes the configured speech commands and builds the available engines
pub fn probe(config: &AppConfig) -> Capabilities {
    let recognition: Option<Arc<dyn RecognitionEngine>> =
        if command_available(&config.recognizer.command) {
            Some(Arc::new(CommandRecognizer::new(config.recognizer.clone())))
        } else {
            log::warn!(
                "Recognizer command '{}' not found, speech input disabled",
                config.recognizer.command
            );
            None
        };

    let synthesis: Option<Arc<dyn SynthesisEngine>> =
        if command_available(&config.synthesizer.command) {
            Some(Arc::new(CommandSynthesizer::new(
                config.synthesizer.clone(),
            )))
        } else {
            log::warn!(
                "Synthesizer command '{}' not found, narration disabled",
                config.synthesizer.command
            );
            None
        };

    Capabilities {
        recognition,
        synthesis,
    }
}

/// Whether `command` can be spawned at all
///
/// The exit status is irrelevant, only that the executable resolves.
pub fn command_available(command: &str) -> bool {
    Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{RecognizerConfig, SynthesizerConfig};

    #[test]
    fn missing_command_is_not_available() {
        assert!(!command_available("atelier-test-no-such-command"));
    }

    #[test]
    fn shell_is_available() {
        assert!(command_available("sh"));
    }

    #[test]
    fn probe_degrades_to_no_engines() {
        let mut config = AppConfig::default();
        config.recognizer = RecognizerConfig {
            command: "atelier-test-no-such-command".to_string(),
            args: vec![],
        };
        config.synthesizer = SynthesizerConfig {
            command: "atelier-test-no-such-command".to_string(),
            ..SynthesizerConfig::default()
        };

        let caps = probe(&config);
        assert!(!caps.stt_ready());
        assert!(!caps.tts_ready());
        assert_eq!(caps.hint(), Some(CAPABILITY_HINT));
    }
}
