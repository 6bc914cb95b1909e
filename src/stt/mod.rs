//! Speech-to-text session handling.
//!
//! Provides the recognition session adapter, the engine seam it drives and a
//! scripted engine that replays recorded event sequences.

mod adapter;
mod engine;
mod event;
mod scripted;
mod session;
#[cfg(test)]
mod test_support;

pub use adapter::{RecognitionSessionAdapter, ResultConsumer};
pub use engine::{RecognitionListener, SpeechEngine};
pub use event::{ErrorCode, RecognitionEvent};
pub use scripted::{ScriptedEngine, SessionScript, load_sessions};
pub use session::{LanguageModel, SessionConfig};
