use anyhow::Context;
use parking_lot::Mutex;
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use crate::config::RecognizerConfig;
use crate::speech::engine::{RecognitionEngine, RecognitionEvent};

/// Speech recognition backed by an external command
///
/// One child process per listening session. The command prints its current
/// transcript hypothesis to stdout, one line per update, and exits on
/// end-of-speech; killing the process ends the session early.
pub struct CommandRecognizer {
    config: RecognizerConfig,
    child: Mutex<Option<Child>>,
}

impl CommandRecognizer {
    pub fn new(config: RecognizerConfig) -> Self {
        Self {
            config,
            child: Mutex::new(None),
        }
    }
}

impl RecognitionEngine for CommandRecognizer {
    fn start_session(&self, events: mpsc::Sender<RecognitionEvent>) -> anyhow::Result<()> {
        // Supersede any session still running
        self.stop_session();

        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .with_context(|| {
                format!("Failed to spawn recognizer command '{}'", self.config.command)
            })?;

        let stdout = child
            .stdout
            .take()
            .context("Recognizer child has no stdout handle")?;

        *self.child.lock() = Some(child);

        tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        if events
                            .send(RecognitionEvent::Hypothesis(line))
                            .await
                            .is_err()
                        {
                            break;
                        }
                    }
                    Ok(None) => break,
                    Err(e) => {
                        let _ = events.send(RecognitionEvent::Error(e.to_string())).await;
                        break;
                    }
                }
            }
            let _ = events.send(RecognitionEvent::Ended).await;
        });

        Ok(())
    }

    fn stop_session(&self) {
        if let Some(mut child) = self.child.lock().take() {
            if let Err(e) = child.start_kill() {
                log::warn!("Failed to stop recognizer session: {}", e);
            }
        }
    }
}

impl Drop for CommandRecognizer {
    fn drop(&mut self) {
        self.stop_session();
    }
}
