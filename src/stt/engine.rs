//! Seams between the adapter and a speech recognition engine.

use std::sync::Arc;

use super::event::RecognitionEvent;
use super::session::SessionConfig;

/// Receives events from a speech engine.
///
/// Called on the engine's own delivery context. Implementations must return
/// quickly and must not block.
pub trait RecognitionListener: Send + Sync {
    fn on_event(&self, event: RecognitionEvent);
}

/// An externally implemented speech recognizer.
///
/// Each `start_listening` call is expected to produce zero or more
/// informational events followed by exactly one terminal event
/// (`Results` or `Error`), unless the session is cancelled first.
pub trait SpeechEngine: Send + Sync {
    /// Register the listener that receives all subsequent events.
    fn set_listener(&self, listener: Arc<dyn RecognitionListener>);

    /// Begin a recognition session.
    fn start_listening(&self, config: &SessionConfig);

    /// Cancel the current session, if any.
    fn cancel(&self);
}
