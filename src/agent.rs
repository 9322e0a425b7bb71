use anyhow::Result;
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

use crate::backend::{BackendClient, CONNECTION_ISSUE_MSG};
use crate::capabilities::{Capabilities, CAPABILITY_HINT};
use crate::config::AppConfig;
use crate::format::format_reply;
use crate::router::{self, QuickAction, Route};
use crate::speech::{SpeechCapture, SpeechPlayback};
use crate::stats::{RequestStats, StatsReporter};

/// Initial reply shown before the first ask
pub const GREETING: &str = "Ready when you are.";

/// Main voice interaction coordinator that integrates all components
///
/// Owns the speech adapters, the backend client, and the UI-visible state.
/// Listening and asking are independent: `loading` only guards against
/// re-submitting an ask while one is in flight, never against the mic.
pub struct VoiceAgent {
    // Speech adapters
    capture: SpeechCapture,
    playback: SpeechPlayback,

    // Backend
    backend: BackendClient,

    // State control
    running: Arc<AtomicBool>,
    loading: Arc<AtomicBool>,

    // Reply display and notification
    reply: Arc<RwLock<String>>,
    reply_tx: broadcast::Sender<String>,

    // Statistics
    request_stats: Arc<Mutex<RequestStats>>,
    stats_reporter: Option<StatsReporter>,

    speak_replies: bool,
    log_stats_enabled: bool,
    actions: Vec<QuickAction>,
}

impl VoiceAgent {
    /// Creates a new VoiceAgent from the probed capabilities and configuration
    pub fn new(capabilities: Capabilities, app_config: &AppConfig) -> Result<Self> {
        let capture = SpeechCapture::new(capabilities.recognition);
        let playback = SpeechPlayback::new(capabilities.synthesis);
        let backend = BackendClient::new(&app_config.backend)?;

        let (reply_tx, _) = broadcast::channel(16);

        Ok(Self {
            capture,
            playback,
            backend,
            running: Arc::new(AtomicBool::new(false)),
            loading: Arc::new(AtomicBool::new(false)),
            reply: Arc::new(RwLock::new(GREETING.to_string())),
            reply_tx,
            request_stats: Arc::new(Mutex::new(RequestStats::new())),
            stats_reporter: None,
            speak_replies: app_config.speak_replies,
            log_stats_enabled: app_config.log_stats_enabled,
            actions: router::quick_actions(),
        })
    }

    /// Marks the agent running and spawns the stats reporter if enabled
    pub fn start(&mut self) {
        self.running.store(true, Ordering::Relaxed);

        if self.log_stats_enabled {
            let stats_reporter =
                StatsReporter::new(self.request_stats.clone(), self.running.clone());
            stats_reporter.start_periodic_reporting();
            self.stats_reporter = Some(stats_reporter);
        }
    }

    /// Toggles the listening state between active and inactive
    pub fn toggle_listening(&self) {
        if self.capture.is_listening() {
            self.capture.stop();
        } else {
            self.capture.start();
        }
    }

    /// Routes, sends, formats and narrates one ask
    ///
    /// `explicit` comes from a quick action and bypasses keyword routing.
    /// Every outcome terminates in a displayed string; nothing propagates.
    pub async fn ask(&self, explicit: Option<Route>) {
        // Ignore re-submission while a request is in flight
        if self.loading.swap(true, Ordering::SeqCst) {
            return;
        }

        let transcript = self.capture.transcript();
        let route = router::resolve(explicit, &transcript);
        log::debug!("Asking {} for transcript {:?}", route.endpoint, transcript);

        let started = Instant::now();
        let text = match self.backend.ask(&route).await {
            Ok(data) => {
                self.request_stats
                    .lock()
                    .record(&route.endpoint, started.elapsed(), false);
                format_reply(&route.endpoint, &data)
            }
            Err(e) => {
                log::warn!("Ask failed: {:#}", e);
                self.request_stats
                    .lock()
                    .record(&route.endpoint, started.elapsed(), true);
                CONNECTION_ISSUE_MSG.to_string()
            }
        };

        self.set_reply(text);
        self.loading.store(false, Ordering::SeqCst);
    }

    fn set_reply(&self, text: String) {
        *self.reply.write() = text.clone();
        // No receivers is fine, the UI may not be subscribed yet
        let _ = self.reply_tx.send(text.clone());
        if self.speak_replies {
            self.playback.speak(&text);
        }
    }

    /// Returns the current reply text
    pub fn reply(&self) -> String {
        self.reply.read().clone()
    }

    /// Returns the transcript of the current listening session
    pub fn transcript(&self) -> String {
        self.capture.transcript()
    }

    pub fn is_listening(&self) -> bool {
        self.capture.is_listening()
    }

    pub fn is_speaking(&self) -> bool {
        self.playback.is_speaking()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::Relaxed)
    }

    pub fn stt_ready(&self) -> bool {
        self.capture.is_ready()
    }

    pub fn tts_ready(&self) -> bool {
        self.playback.is_ready()
    }

    /// UI hint line, present when either speech capability is missing
    pub fn capability_hint(&self) -> Option<&'static str> {
        if self.stt_ready() && self.tts_ready() {
            None
        } else {
            Some(CAPABILITY_HINT)
        }
    }

    /// The fixed quick-action catalog
    pub fn actions(&self) -> &[QuickAction] {
        &self.actions
    }

    /// Get the running state reference
    pub fn get_running(&self) -> Arc<AtomicBool> {
        self.running.clone()
    }

    /// Get a receiver for completed replies
    pub fn get_reply_rx(&self) -> broadcast::Receiver<String> {
        self.reply_tx.subscribe()
    }

    /// Logs the current request statistics on demand
    pub fn print_stats(&self) {
        if self.stats_reporter.is_some() {
            log::info!("{}", self.request_stats.lock().report());
        }
    }

    /// Stops listening and marks the agent as shut down
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::Relaxed);
        self.capture.stop();
        if self.log_stats_enabled {
            self.request_stats.lock().log_to_file();
        }
    }
}

impl Drop for VoiceAgent {
    fn drop(&mut self) {
        self.running.store(false, Ordering::Relaxed);
        self.capture.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{BackendConfig, RetryConfig};
    use std::net::TcpListener;

    fn agent_config(base_url: String) -> AppConfig {
        let mut config = AppConfig::default();
        config.backend = BackendConfig {
            base_url,
            request_timeout_secs: 2,
            retry: RetryConfig {
                max_attempts: 1,
                initial_delay_ms: 10,
                max_delay_ms: 20,
            },
        };
        config.speak_replies = false;
        config
    }

    fn offline_agent() -> VoiceAgent {
        // Bind then drop so the port is very likely closed
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let caps = Capabilities {
            recognition: None,
            synthesis: None,
        };
        VoiceAgent::new(caps, &agent_config(base_url)).unwrap()
    }

    #[tokio::test]
    async fn failed_ask_shows_the_fixed_connection_message() {
        let agent = offline_agent();
        agent.ask(None).await;
        assert_eq!(agent.reply(), CONNECTION_ISSUE_MSG);
        assert!(!agent.is_loading());
    }

    #[tokio::test]
    async fn in_flight_ask_blocks_resubmission_only() {
        let agent = offline_agent();
        agent.loading.store(true, Ordering::SeqCst);

        agent.ask(None).await;
        // The duplicate ask returned without touching the reply
        assert_eq!(agent.reply(), GREETING);

        // The mic stays an independent control
        agent.toggle_listening();
        assert!(!agent.is_listening()); // no engine, still a safe no-op
    }

    #[tokio::test]
    async fn missing_capabilities_surface_a_hint() {
        let agent = offline_agent();
        assert!(!agent.stt_ready());
        assert!(!agent.tts_ready());
        assert!(agent.capability_hint().is_some());
    }

    #[tokio::test]
    async fn replies_are_broadcast() {
        let agent = offline_agent();
        let mut rx = agent.get_reply_rx();
        agent.ask(None).await;
        assert_eq!(rx.recv().await.unwrap(), CONNECTION_ISSUE_MSG);
    }
}
