use serde::{Deserialize, Serialize};

/// Environment variable that overrides the configured backend base URL
pub const BACKEND_URL_ENV: &str = "ATELIER_BACKEND_URL";

/// Default backend address used when nothing else is configured
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:8000";

/// Backend HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the design agent backend
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Retry behavior for failed requests
    pub retry: RetryConfig,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BACKEND_URL.to_string(),
            request_timeout_secs: 10,
            retry: RetryConfig::default(),
        }
    }
}

/// Configuration for bounded request retries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total number of attempts before giving up (1 = no retry)
    pub max_attempts: u32,
    /// Delay before the first retry in milliseconds
    pub initial_delay_ms: u64,
    /// Cap on the backoff delay in milliseconds
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 500,
            max_delay_ms: 4000,
        }
    }
}

/// Configuration for the external speech recognition command
///
/// The command is spawned once per listening session and is expected to print
/// its current transcript hypothesis to stdout, one line per update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Executable to spawn for a listening session
    pub command: String,
    /// Arguments passed to the recognizer command
    pub args: Vec<String>,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            command: "atelier-listen".to_string(),
            args: vec!["--language".to_string(), "en".to_string()],
        }
    }
}

/// Configuration for the external speech synthesis command (espeak-ng style)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizerConfig {
    /// Executable to spawn per utterance
    pub command: String,
    /// Flag used to select a voice, e.g. "-v"
    pub voice_flag: String,
    /// Arguments that make the command print its voice catalog
    pub list_voices_args: Vec<String>,
    /// Extra arguments appended to every utterance (rate, pitch, ...)
    pub extra_args: Vec<String>,
}

impl Default for SynthesizerConfig {
    fn default() -> Self {
        Self {
            command: "espeak-ng".to_string(),
            voice_flag: "-v".to_string(),
            list_voices_args: vec!["--voices=en".to_string()],
            extra_args: vec!["-s".to_string(), "175".to_string()],
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Backend HTTP client settings
    pub backend: BackendConfig,
    /// Speech recognition command settings
    pub recognizer: RecognizerConfig,
    /// Speech synthesis command settings
    pub synthesizer: SynthesizerConfig,
    /// Whether replies are narrated when synthesis is available
    pub speak_replies: bool,
    /// Whether to log request statistics
    pub log_stats_enabled: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            recognizer: RecognizerConfig::default(),
            synthesizer: SynthesizerConfig::default(),
            speak_replies: true,
            log_stats_enabled: false,
        }
    }
}

/// Helper function to read the application configuration
///
/// Falls back to the built-in defaults when `config.json` is missing or
/// malformed. The backend base URL is resolved once here: the
/// `ATELIER_BACKEND_URL` environment variable wins over the file value.
pub fn read_app_config() -> AppConfig {
    let mut config = match std::fs::read_to_string("config.json") {
        Ok(config_str) => match serde_json::from_str(&config_str) {
            Ok(config) => config,
            Err(e) => {
                log::warn!(
                    "Failed to parse config.json: {}. Using default configuration.",
                    e
                );
                AppConfig::default()
            }
        },
        Err(e) => {
            log::info!(
                "Failed to read config.json: {}. Using default configuration.",
                e
            );
            AppConfig::default()
        }
    };

    if let Ok(url) = std::env::var(BACKEND_URL_ENV) {
        if !url.trim().is_empty() {
            config.backend.base_url = url.trim().trim_end_matches('/').to_string();
        }
    }

    config
}
