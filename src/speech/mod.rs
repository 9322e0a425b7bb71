pub mod capture;
pub mod engine;
pub mod playback;
pub mod recognizer;
pub mod synthesizer;

pub use capture::SpeechCapture;
pub use engine::{PlaybackEvent, RecognitionEngine, RecognitionEvent, SynthesisEngine};
pub use playback::SpeechPlayback;
pub use recognizer::CommandRecognizer;
pub use synthesizer::CommandSynthesizer;
