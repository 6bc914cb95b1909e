//! Speech recognition session adapter.
//!
//! Configures recognition sessions on a pluggable [`stt::SpeechEngine`],
//! forwards engine callbacks, turns error codes into user notifications and
//! relays final transcriptions to a host-supplied consumer.

pub mod error;
pub mod notify;
pub mod stt;

pub use error::SttError;
pub use notify::{LogNotifier, Notifier};
pub use stt::{LanguageModel, RecognitionSessionAdapter, ResultConsumer, SessionConfig};
