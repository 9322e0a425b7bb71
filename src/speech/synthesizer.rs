use anyhow::Context;
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::process::Command;
use tokio::sync::{mpsc, oneshot};

use crate::config::SynthesizerConfig;
use crate::speech::engine::{PlaybackEvent, SynthesisEngine};

/// Speech synthesis backed by an external command (espeak-ng style)
///
/// One child process per utterance; cancellation kills the child. The voice
/// catalog is read once at construction from the command's voice listing.
pub struct CommandSynthesizer {
    config: SynthesizerConfig,
    voices: Vec<String>,
    cancel_tx: Mutex<Option<oneshot::Sender<()>>>,
}

impl CommandSynthesizer {
    /// Creates a new CommandSynthesizer, probing the voice catalog
    ///
    /// A failed voice listing is not fatal: the engine still speaks with its
    /// default voice when the catalog is empty.
    pub fn new(config: SynthesizerConfig) -> Self {
        let voices = match std::process::Command::new(&config.command)
            .args(&config.list_voices_args)
            .stdin(Stdio::null())
            .stderr(Stdio::null())
            .output()
        {
            Ok(output) => parse_voice_catalog(&String::from_utf8_lossy(&output.stdout)),
            Err(e) => {
                log::warn!(
                    "Failed to list voices for '{}': {}. Using engine default.",
                    config.command,
                    e
                );
                Vec::new()
            }
        };

        Self {
            config,
            voices,
            cancel_tx: Mutex::new(None),
        }
    }
}

impl SynthesisEngine for CommandSynthesizer {
    fn voices(&self) -> Vec<String> {
        self.voices.clone()
    }

    fn speak(
        &self,
        text: &str,
        voice: Option<&str>,
        events: mpsc::Sender<PlaybackEvent>,
    ) -> anyhow::Result<()> {
        // New utterances supersede old ones, never queue
        self.cancel();

        let mut cmd = Command::new(&self.config.command);
        cmd.args(&self.config.extra_args);
        if let Some(voice) = voice {
            cmd.arg(&self.config.voice_flag).arg(voice);
        }
        cmd.arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let mut child = cmd.spawn().with_context(|| {
            format!(
                "Failed to spawn synthesizer command '{}'",
                self.config.command
            )
        })?;

        let (cancel_tx, cancel_rx) = oneshot::channel();
        *self.cancel_tx.lock() = Some(cancel_tx);

        tokio::spawn(async move {
            let _ = events.send(PlaybackEvent::Started).await;
            tokio::select! {
                _ = child.wait() => {}
                _ = cancel_rx => {
                    if let Err(e) = child.start_kill() {
                        log::warn!("Failed to cancel utterance: {}", e);
                    }
                    let _ = child.wait().await;
                }
            }
            let _ = events.send(PlaybackEvent::Finished).await;
        });

        Ok(())
    }

    fn cancel(&self) {
        if let Some(tx) = self.cancel_tx.lock().take() {
            // Receiver may already be gone if the utterance finished
            let _ = tx.send(());
        }
    }
}

impl Drop for CommandSynthesizer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Extracts voice names from an espeak-ng style `--voices` listing
///
/// The first line is a column header; the voice name is the fourth column of
/// each subsequent line.
fn parse_voice_catalog(listing: &str) -> Vec<String> {
    listing
        .lines()
        .skip(1)
        .filter_map(|line| line.split_whitespace().nth(3))
        .map(|name| name.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_espeak_voice_listing() {
        let listing = "Pty Language       Age/Gender VoiceName          File\n\
                       5  en-gb           --/M      english            gmw/en\n\
                       5  en-us           --/M      english-us         gmw/en-US\n";
        let voices = parse_voice_catalog(listing);
        assert_eq!(voices, vec!["english", "english-us"]);
    }

    #[test]
    fn empty_listing_yields_no_voices() {
        assert!(parse_voice_catalog("").is_empty());
        assert!(parse_voice_catalog("Pty Language Age/Gender VoiceName File\n").is_empty());
    }
}
