//! Speech Session - run recognition sessions through the session adapter.
//!
//! Drives a `RecognitionSessionAdapter` over a scripted speech engine, prints
//! each transcription to stdout and reports recognition errors through the
//! log notifier.

mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::LocalTime;

use config::AppConfig;
use speech_session::stt::ScriptedEngine;
use speech_session::{LogNotifier, RecognitionSessionAdapter};

/// Print every transcription received so far.
fn drain_transcripts(rx: &mut mpsc::UnboundedReceiver<String>) {
    while let Ok(text) = rx.try_recv() {
        info!("🗣️ Recognized: \"{}\"", text);
        println!("{}", text);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let config = AppConfig::from_args();

    // Respect RUST_LOG env var, fallback to verbose flag, default to info
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| if config.verbose { EnvFilter::try_new("debug") } else { EnvFilter::try_new("info") })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_timer(LocalTime::new(time::macros::format_description!("[hour]:[minute]:[second]")))
        .init();

    info!("🎤 Speech Session v{}", env!("CARGO_PKG_VERSION"));

    // Validate configuration
    if let Err(e) = config.validate() {
        error!("❌ Configuration error: {:#}", e);
        std::process::exit(1);
    }

    config.log_config();

    let sessions = config.session_scripts()?;
    let session_count = sessions.len();

    let engine = Arc::new(ScriptedEngine::with_event_delay(Duration::from_millis(config.event_delay_ms)));
    engine.extend_sessions(sessions);

    // Transcriptions arrive on the engine thread; hand them over to this task
    let (transcript_tx, mut transcript_rx) = mpsc::unbounded_channel::<String>();
    let consumer = move |text: &str| {
        if transcript_tx.send(text.to_string()).is_err() {
            debug!("Transcript channel closed");
        }
    };

    let adapter = RecognitionSessionAdapter::new(
        &config.language_model,
        &config.calling_identity,
        || engine.clone(),
        Some(Arc::new(consumer)),
        Arc::new(LogNotifier),
    )?;
    adapter.set_logging_enabled(config.trace_events);

    let mut interrupted = false;

    for session in 1..=session_count {
        info!("▶️  Starting session {}/{}", session, session_count);
        adapter.start();

        let waiter = engine.clone();
        let mut finished = tokio::task::spawn_blocking(move || waiter.wait());

        tokio::select! {
            result = &mut finished => {
                if let Err(e) = result {
                    warn!("Session wait task failed: {}", e);
                }
            }
            _ = signal::ctrl_c() => {
                info!("🛑 Received Ctrl+C, shutting down...");
                interrupted = true;
                // Dropping the adapter cancels the in-flight session
                drop(adapter);
                if let Err(e) = finished.await {
                    warn!("Session wait task failed: {}", e);
                }
                drain_transcripts(&mut transcript_rx);
                break;
            }
        }

        drain_transcripts(&mut transcript_rx);
    }

    if interrupted {
        info!("⏹️  Session interrupted");
    } else {
        info!("✅ All sessions finished");
    }
    Ok(())
}
