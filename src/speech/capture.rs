use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::speech::engine::{RecognitionEngine, RecognitionEvent};

/// Speech capture adapter over an optional recognition engine
///
/// Owns the transcript for the current listening session and the listening
/// flag. Without an engine every operation degrades to a silent no-op, so the
/// rest of the application never has to special-case missing speech support.
pub struct SpeechCapture {
    engine: Option<Arc<dyn RecognitionEngine>>,
    listening: Arc<AtomicBool>,
    transcript: Arc<RwLock<String>>,
    // Guards stale event pumps from superseded sessions
    session: Arc<AtomicU64>,
}

impl SpeechCapture {
    pub fn new(engine: Option<Arc<dyn RecognitionEngine>>) -> Self {
        Self {
            engine,
            listening: Arc::new(AtomicBool::new(false)),
            transcript: Arc::new(RwLock::new(String::new())),
            session: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Whether a recognition engine is available
    pub fn is_ready(&self) -> bool {
        self.engine.is_some()
    }

    /// Clears the transcript and begins a listening session
    ///
    /// Silent no-op when no engine is available. Each engine hypothesis
    /// overwrites the transcript with its trimmed value; end-of-speech or an
    /// engine error clears the listening flag.
    pub fn start(&self) {
        let Some(engine) = &self.engine else {
            return;
        };

        self.transcript.write().clear();

        let (tx, mut rx) = mpsc::channel(32);
        if let Err(e) = engine.start_session(tx) {
            log::warn!("Failed to start listening session: {}", e);
            return;
        }

        let session_id = self.session.fetch_add(1, Ordering::Relaxed) + 1;
        self.listening.store(true, Ordering::Relaxed);

        let listening = self.listening.clone();
        let transcript = self.transcript.clone();
        let session = self.session.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                if session.load(Ordering::Relaxed) != session_id {
                    // Superseded by a newer session
                    return;
                }
                match event {
                    RecognitionEvent::Hypothesis(text) => {
                        *transcript.write() = text.trim().to_string();
                    }
                    RecognitionEvent::Ended => break,
                    RecognitionEvent::Error(e) => {
                        log::warn!("Recognition session error: {}", e);
                        break;
                    }
                }
            }
            if session.load(Ordering::Relaxed) == session_id {
                listening.store(false, Ordering::Relaxed);
            }
        });
    }

    /// Ends the active listening session
    ///
    /// Safe no-op when not listening. The flag clears immediately; the engine
    /// confirms teardown asynchronously via its end-of-session event.
    pub fn stop(&self) {
        if let Some(engine) = &self.engine {
            engine.stop_session();
        }
        self.listening.store(false, Ordering::Relaxed);
    }

    /// Returns the transcript of the current session
    pub fn transcript(&self) -> String {
        self.transcript.read().clone()
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::Relaxed)
    }

    /// Get the listening flag reference
    pub fn get_listening(&self) -> Arc<AtomicBool> {
        self.listening.clone()
    }

    /// Get the transcript reference
    pub fn get_transcript(&self) -> Arc<RwLock<String>> {
        self.transcript.clone()
    }
}

impl Drop for SpeechCapture {
    fn drop(&mut self) {
        // Recognition resources must not outlive the adapter
        if let Some(engine) = &self.engine {
            engine.stop_session();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::time::Duration;

    struct MockEngine {
        sessions: Mutex<Vec<mpsc::Sender<RecognitionEvent>>>,
        stops: std::sync::atomic::AtomicUsize,
    }

    impl MockEngine {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                sessions: Mutex::new(Vec::new()),
                stops: std::sync::atomic::AtomicUsize::new(0),
            })
        }

        fn current(&self) -> mpsc::Sender<RecognitionEvent> {
            self.sessions.lock().last().unwrap().clone()
        }
    }

    impl RecognitionEngine for MockEngine {
        fn start_session(&self, events: mpsc::Sender<RecognitionEvent>) -> anyhow::Result<()> {
            self.sessions.lock().push(events);
            Ok(())
        }

        fn stop_session(&self) {
            self.stops.fetch_add(1, Ordering::Relaxed);
            self.sessions.lock().clear();
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    #[tokio::test]
    async fn hypotheses_overwrite_the_transcript() {
        let engine = MockEngine::new();
        let capture = SpeechCapture::new(Some(engine.clone()));

        capture.start();
        assert!(capture.is_listening());

        let tx = engine.current();
        tx.send(RecognitionEvent::Hypothesis("  hello ".into()))
            .await
            .unwrap();
        settle().await;
        assert_eq!(capture.transcript(), "hello");

        tx.send(RecognitionEvent::Hypothesis("hello world".into()))
            .await
            .unwrap();
        settle().await;
        assert_eq!(capture.transcript(), "hello world");

        tx.send(RecognitionEvent::Ended).await.unwrap();
        settle().await;
        assert!(!capture.is_listening());
        assert_eq!(capture.transcript(), "hello world");
    }

    #[tokio::test]
    async fn restarting_clears_the_transcript() {
        let engine = MockEngine::new();
        let capture = SpeechCapture::new(Some(engine.clone()));

        capture.start();
        engine
            .current()
            .send(RecognitionEvent::Hypothesis("first".into()))
            .await
            .unwrap();
        settle().await;
        assert_eq!(capture.transcript(), "first");

        capture.start();
        settle().await;
        assert_eq!(capture.transcript(), "");
        assert!(capture.is_listening());
    }

    #[tokio::test]
    async fn engine_error_clears_listening() {
        let engine = MockEngine::new();
        let capture = SpeechCapture::new(Some(engine.clone()));

        capture.start();
        engine
            .current()
            .send(RecognitionEvent::Error("mic lost".into()))
            .await
            .unwrap();
        settle().await;
        assert!(!capture.is_listening());
    }

    #[tokio::test]
    async fn stop_while_idle_is_a_noop() {
        let engine = MockEngine::new();
        let capture = SpeechCapture::new(Some(engine.clone()));

        capture.stop();
        assert!(!capture.is_listening());
        assert_eq!(engine.stops.load(Ordering::Relaxed), 1);
    }

    #[tokio::test]
    async fn start_without_engine_is_a_noop() {
        let capture = SpeechCapture::new(None);
        capture.start();
        assert!(!capture.is_listening());
        assert!(!capture.is_ready());
        capture.stop();
    }
}
