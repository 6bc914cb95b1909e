//! Speech engine that replays scripted sessions.
//!
//! Each `start_listening` call consumes the next queued script and replays
//! its events on a dedicated worker thread, the way a platform recognizer
//! delivers callbacks on its own thread. Used by the CLI and by tests in place
//! of a real recognizer.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, warn};

use super::engine::{RecognitionListener, SpeechEngine};
use super::event::{ErrorCode, RecognitionEvent};
use super::session::SessionConfig;
use crate::error::{Result, SttError};

/// One scripted session: the events delivered for a single `start_listening`.
pub type SessionScript = Vec<RecognitionEvent>;

/// Load scripted sessions from a JSON file.
///
/// The file holds an array of sessions, each an array of events:
/// `[[{"type": "ready_for_speech"}, {"type": "results", "candidates": ["hi"]}]]`
pub fn load_sessions(path: &Path) -> Result<Vec<SessionScript>> {
    let data = std::fs::read_to_string(path).map_err(|source| SttError::ScriptIo { path: path.to_path_buf(), source })?;
    serde_json::from_str(&data).map_err(|source| SttError::ScriptFormat { path: path.to_path_buf(), source })
}

/// State shared between the engine handle and its worker threads.
struct Shared {
    listener: Mutex<Option<Arc<dyn RecognitionListener>>>, // Registered event listener
    sessions: Mutex<VecDeque<SessionScript>>,              // Queued scripts, one per start
    current: Mutex<Option<Arc<AtomicBool>>>,               // Cancel flag, set while a replay is running
    last_config: Mutex<Option<SessionConfig>>,             // Config passed to the last start
    starts: AtomicUsize,
    cancels: AtomicUsize,
}

impl Shared {
    /// Mark `replay` as no longer running, unless a newer replay replaced it.
    fn finish(&self, replay: &Arc<AtomicBool>) {
        let mut current = self.current.lock();
        if current.as_ref().is_some_and(|running| Arc::ptr_eq(running, replay)) {
            *current = None;
        }
    }

    fn stop_current(&self) {
        if let Some(flag) = self.current.lock().take() {
            flag.store(true, Ordering::SeqCst);
        }
    }
}

/// Clears the running replay when the worker exits, including on panic.
struct ReplayGuard {
    shared: Arc<Shared>,
    replay: Arc<AtomicBool>,
}

impl Drop for ReplayGuard {
    fn drop(&mut self) {
        self.shared.finish(&self.replay);
    }
}

/// Join a worker thread, logging a panic instead of propagating it.
fn reap(handle: JoinHandle<()>) {
    if handle.join().is_err() {
        warn!("Scripted session worker panicked");
    }
}

/// Speech engine replaying queued event scripts.
pub struct ScriptedEngine {
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>, // Replay thread of the current session
    event_delay: Duration,                 // Pause before each delivered event
}

impl ScriptedEngine {
    /// Create an engine with no queued sessions and no delivery delay.
    pub fn new() -> Self {
        Self::with_event_delay(Duration::ZERO)
    }

    /// Create an engine that pauses for `event_delay` before each event.
    pub fn with_event_delay(event_delay: Duration) -> Self {
        Self {
            shared: Arc::new(Shared {
                listener: Mutex::new(None),
                sessions: Mutex::new(VecDeque::new()),
                current: Mutex::new(None),
                last_config: Mutex::new(None),
                starts: AtomicUsize::new(0),
                cancels: AtomicUsize::new(0),
            }),
            worker: Mutex::new(None),
            event_delay,
        }
    }

    /// Queue a session script for a future `start_listening` call.
    pub fn push_session(&self, events: SessionScript) {
        self.shared.sessions.lock().push_back(events);
    }

    /// Queue several session scripts in order.
    pub fn extend_sessions(&self, sessions: impl IntoIterator<Item = SessionScript>) {
        self.shared.sessions.lock().extend(sessions);
    }

    /// Number of scripts not yet consumed.
    pub fn pending_sessions(&self) -> usize {
        self.shared.sessions.lock().len()
    }

    pub fn start_count(&self) -> usize {
        self.shared.starts.load(Ordering::SeqCst)
    }

    pub fn cancel_count(&self) -> usize {
        self.shared.cancels.load(Ordering::SeqCst)
    }

    /// Config passed to the most recent `start_listening` call.
    pub fn last_config(&self) -> Option<SessionConfig> {
        self.shared.last_config.lock().clone()
    }

    /// Block until the current replay has finished.
    ///
    /// Must not be called from a listener callback.
    pub fn wait(&self) {
        let handle = self.worker.lock().take();
        if let Some(handle) = handle {
            reap(handle);
        }
    }
}

impl Default for ScriptedEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SpeechEngine for ScriptedEngine {
    fn set_listener(&self, listener: Arc<dyn RecognitionListener>) {
        *self.shared.listener.lock() = Some(listener);
    }

    fn start_listening(&self, config: &SessionConfig) {
        self.shared.starts.fetch_add(1, Ordering::SeqCst);
        *self.shared.last_config.lock() = Some(config.clone());

        let Some(listener) = self.shared.listener.lock().clone() else {
            warn!("start_listening called with no listener registered");
            return;
        };

        let cancelled = {
            let mut current = self.shared.current.lock();
            if current.is_some() {
                drop(current); // Never hold the lock while the listener runs
                debug!("Scripted session already running, reporting busy");
                listener.on_event(RecognitionEvent::Error { code: ErrorCode::RecognizerBusy });
                return;
            }
            let cancelled = Arc::new(AtomicBool::new(false));
            *current = Some(cancelled.clone());
            cancelled
        };

        // The previous worker may be the calling thread when a listener
        // restarts from its terminal callback, so only join finished threads.
        let mut worker = self.worker.lock();
        if let Some(previous) = worker.take()
            && previous.is_finished()
        {
            reap(previous);
        }

        let events = self.shared.sessions.lock().pop_front().unwrap_or_else(|| {
            debug!("No scripted session queued, reporting client error");
            vec![RecognitionEvent::Error { code: ErrorCode::Client }]
        });

        let guard = ReplayGuard { shared: self.shared.clone(), replay: cancelled.clone() };
        let event_delay = self.event_delay;
        debug!("Replaying scripted session with {} events", events.len());

        *worker = Some(std::thread::spawn(move || {
            let guard = guard;
            for event in events {
                if !event_delay.is_zero() {
                    std::thread::sleep(event_delay);
                }
                if cancelled.load(Ordering::SeqCst) {
                    debug!("Scripted session cancelled");
                    return;
                }
                let terminal = event.is_terminal();
                if terminal {
                    // Not busy any more: the listener may start the next session
                    guard.shared.finish(&guard.replay);
                }
                listener.on_event(event);
                if terminal {
                    return;
                }
            }
        }));
    }

    fn cancel(&self) {
        self.shared.cancels.fetch_add(1, Ordering::SeqCst);
        self.shared.stop_current();
    }
}

impl Drop for ScriptedEngine {
    fn drop(&mut self) {
        // The last reference may be released on the worker thread itself,
        // so stop the replay without joining it.
        self.shared.stop_current();
    }
}
