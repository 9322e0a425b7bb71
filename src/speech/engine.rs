use tokio::sync::mpsc;

/// Events emitted by a recognition session
///
/// A `Hypothesis` carries the engine's current cumulative transcript for the
/// session, not a delta; consumers are expected to replace their displayed
/// value with each update.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognitionEvent {
    Hypothesis(String),
    Ended,
    Error(String),
}

/// Events emitted around a single synthesized utterance
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    Started,
    Finished,
}

/// A speech recognition capability
///
/// Implementations own the actual engine (an external process, a remote
/// service, a test double). At most one session is active at a time; starting
/// a new session supersedes the previous one.
pub trait RecognitionEngine: Send + Sync {
    /// Begin a listening session, delivering events on `events`
    fn start_session(&self, events: mpsc::Sender<RecognitionEvent>) -> anyhow::Result<()>;

    /// End the active session, if any
    ///
    /// Safe to call when no session is active. The session confirms teardown
    /// asynchronously by emitting `RecognitionEvent::Ended`.
    fn stop_session(&self);
}

/// A speech synthesis capability
pub trait SynthesisEngine: Send + Sync {
    /// Names of the voices the engine offers, possibly empty
    fn voices(&self) -> Vec<String>;

    /// Speak `text`, delivering start/finish events on `events`
    ///
    /// `voice` of `None` means the engine default. Implementations must not
    /// queue: any utterance still playing is cancelled first.
    fn speak(
        &self,
        text: &str,
        voice: Option<&str>,
        events: mpsc::Sender<PlaybackEvent>,
    ) -> anyhow::Result<()>;

    /// Cancel the in-flight utterance, if any
    fn cancel(&self);
}
