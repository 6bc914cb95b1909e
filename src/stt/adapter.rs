//! Recognition session adapter.
//!
//! Wraps a [`SpeechEngine`] with a fixed [`SessionConfig`], turns engine
//! error codes into user notifications and hands final transcriptions to a
//! [`ResultConsumer`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tracing::{debug, info};

use super::engine::{RecognitionListener, SpeechEngine};
use super::event::RecognitionEvent;
use super::session::{LanguageModel, SessionConfig};
use crate::error::Result;
use crate::notify::Notifier;

/// Receives the final transcription of each completed session.
pub trait ResultConsumer: Send + Sync {
    fn on_recognition_result(&self, text: &str);
}

impl<F> ResultConsumer for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_recognition_result(&self, text: &str) {
        self(text)
    }
}

/// Listener registered with the engine.
/// Holds only what event handling needs; the engine is referenced weakly
/// because the engine itself keeps this listener alive.
struct SessionListener {
    engine: Weak<dyn SpeechEngine>,             // Engine to cancel on error
    consumer: Option<Arc<dyn ResultConsumer>>,  // Optional result consumer
    notifier: Arc<dyn Notifier>,                // User-facing notification sink
    logging: Arc<AtomicBool>,                   // Verbose per-event tracing
    active: Arc<AtomicBool>,                    // Session in flight
}

impl SessionListener {
    fn trace(&self, name: &str) {
        if self.logging.load(Ordering::Relaxed) {
            debug!("{}", name);
        }
    }
}

impl RecognitionListener for SessionListener {
    fn on_event(&self, event: RecognitionEvent) {
        match event {
            RecognitionEvent::ReadyForSpeech
            | RecognitionEvent::BeginningOfSpeech
            | RecognitionEvent::EndOfSpeech
            | RecognitionEvent::BufferReceived { .. } => self.trace(event.name()),
            RecognitionEvent::Event { event_type, .. } => {
                if self.logging.load(Ordering::Relaxed) {
                    debug!("{}: {}", event.name(), event_type);
                }
            }
            RecognitionEvent::RmsChanged { .. } | RecognitionEvent::PartialResults { .. } => {}
            RecognitionEvent::Error { code } => {
                if self.logging.load(Ordering::Relaxed) {
                    debug!("{}: {}", event.name(), code);
                }

                self.notifier.notify(code.message());
                self.active.store(false, Ordering::SeqCst);

                // Always reset the engine so a fresh start() can follow
                if let Some(engine) = self.engine.upgrade() {
                    engine.cancel();
                }
            }
            RecognitionEvent::Results { candidates } => {
                self.trace("onResults");
                self.active.store(false, Ordering::SeqCst);

                let text = candidates.into_iter().next().unwrap_or_default();
                if let Some(consumer) = &self.consumer {
                    consumer.on_recognition_result(&text);
                }
            }
        }
    }
}

/// Adapter owning one speech engine and one immutable session configuration.
///
/// Dropping the adapter cancels a session still in flight and releases the
/// engine handle.
pub struct RecognitionSessionAdapter {
    engine: Arc<dyn SpeechEngine>,
    config: SessionConfig,
    logging: Arc<AtomicBool>,
    active: Arc<AtomicBool>,
}

impl RecognitionSessionAdapter {
    /// Create an adapter for the given language model token.
    ///
    /// # Arguments
    /// * `language_model` - `"web_search"` or `"free_form"`
    /// * `calling_identity` - Identity of the requesting application
    /// * `create_engine` - Creates the engine; only called once the token is valid
    /// * `consumer` - Receives final transcriptions, if any
    /// * `notifier` - Receives user-facing error messages
    ///
    /// # Errors
    /// Returns `SttError::InvalidLanguageModel` for an unknown token.
    pub fn new<E, F>(
        language_model: &str,
        calling_identity: &str,
        create_engine: F,
        consumer: Option<Arc<dyn ResultConsumer>>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self>
    where
        E: SpeechEngine + 'static,
        F: FnOnce() -> Arc<E>,
    {
        let language_model: LanguageModel = language_model.parse()?;
        let config = SessionConfig::new(language_model, calling_identity);

        let engine: Arc<dyn SpeechEngine> = create_engine();
        let logging = Arc::new(AtomicBool::new(false));
        let active = Arc::new(AtomicBool::new(false));

        let listener = SessionListener {
            engine: Arc::downgrade(&engine),
            consumer,
            notifier,
            logging: logging.clone(),
            active: active.clone(),
        };
        engine.set_listener(Arc::new(listener));

        info!("Speech session adapter ready (language model: {}, caller: {})", config.language_model(), config.calling_identity());

        Ok(Self { engine, config, logging, active })
    }

    /// Start a recognition session. Completion is reported through callbacks.
    ///
    /// Callers must not start a new session while one is still in flight;
    /// what happens then is up to the engine.
    pub fn start(&self) {
        if self.logging.load(Ordering::Relaxed) {
            debug!("startListening ({})", self.config.language_model());
        }
        self.active.store(true, Ordering::SeqCst);
        self.engine.start_listening(&self.config);
    }

    /// Enable or disable per-event diagnostic traces (disabled by default).
    pub fn set_logging_enabled(&self, enabled: bool) {
        self.logging.store(enabled, Ordering::Relaxed);
    }

    pub fn logging_enabled(&self) -> bool {
        self.logging.load(Ordering::Relaxed)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Whether a started session has not yet reached a terminal event.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for RecognitionSessionAdapter {
    fn drop(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if self.logging.load(Ordering::Relaxed) {
                debug!("Cancelling in-flight recognition session");
            }
            self.engine.cancel();
        }
    }
}
