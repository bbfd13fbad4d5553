pub mod asr;
pub mod main;
pub mod system;
pub mod utils;

pub use asr::{ASRConfig, GoogleSpeechConfig, OpenAIWhisperConfig};
pub use main::Config;
