pub mod agent;
pub mod backend;
pub mod capabilities;
pub mod config;
pub mod format;
pub mod router;
pub mod speech;
pub mod stats;
pub mod ui;

// Re-export key components for easier access
pub use agent::VoiceAgent;
pub use backend::BackendClient;
pub use capabilities::Capabilities;
pub use config::read_app_config;
pub use router::Route;
pub use stats::{RequestStats, StatsReporter};
