//! Application configuration and CLI argument parsing.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::info;

use speech_session::LanguageModel;
use speech_session::stt::{ErrorCode, RecognitionEvent, SessionScript, load_sessions};

/// Speech session CLI configuration.
#[derive(Parser, Debug, Clone, Serialize, Deserialize)]
#[command(name = "speech-session")]
#[command(author, version, about = "Run a speech recognition session against a scripted engine", long_about = None)]
pub struct AppConfig {
    /// Recognition language model: 'web_search' or 'free_form'
    #[arg(long, short = 'l', env = "SPEECH_LANGUAGE_MODEL", default_value = "free_form")]
    pub language_model: String,

    /// Identity of the calling application passed to the engine
    #[arg(long, env = "SPEECH_CALLING_IDENTITY", default_value = env!("CARGO_PKG_NAME"))]
    pub calling_identity: String,

    /// JSON file with scripted sessions (array of event arrays), run one after another
    #[arg(long, short = 's')]
    pub script: Option<PathBuf>,

    /// Transcription returned by the synthesized session
    #[arg(long, short = 't', default_value = "hello world", conflicts_with = "script")]
    pub transcript: String,

    /// Fail the synthesized session with this engine error code instead of returning a transcript
    #[arg(long, short = 'e', conflicts_with = "script")]
    pub error_code: Option<i32>,

    /// Delay in milliseconds before each scripted event is delivered
    #[arg(long, default_value = "150")]
    pub event_delay_ms: u64,

    /// Trace every recognition callback
    #[arg(long)]
    pub trace_events: bool,

    /// Enable verbose logging
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse configuration from command line arguments.
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        self.language_model.parse::<LanguageModel>().context("Unsupported --language-model")?;

        if let Some(ref script) = self.script
            && !script.exists()
        {
            anyhow::bail!("Session script not found: {}", script.display());
        }

        if self.calling_identity.trim().is_empty() {
            anyhow::bail!("Calling identity must not be empty");
        }

        Ok(())
    }

    /// Build the session scripts the engine will replay.
    ///
    /// Without `--script`, a single session is synthesized from `--transcript`
    /// or `--error-code`.
    pub fn session_scripts(&self) -> Result<Vec<SessionScript>> {
        if let Some(ref script) = self.script {
            let sessions = load_sessions(script).context("Failed to load session script")?;
            if sessions.is_empty() {
                anyhow::bail!("Session script contains no sessions: {}", script.display());
            }
            return Ok(sessions);
        }

        let terminal = match self.error_code {
            Some(code) => RecognitionEvent::Error { code: ErrorCode::from_code(code) },
            None => RecognitionEvent::Results { candidates: vec![self.transcript.clone()] },
        };

        Ok(vec![vec![
            RecognitionEvent::ReadyForSpeech,
            RecognitionEvent::BeginningOfSpeech,
            RecognitionEvent::RmsChanged { level: 4.0 },
            RecognitionEvent::EndOfSpeech,
            terminal,
        ]])
    }

    /// Log the current configuration.
    pub fn log_config(&self) {
        info!("Configuration:");
        info!("  Language model: {}", self.language_model);
        info!("  Calling identity: {}", self.calling_identity);
        match self.script {
            Some(ref script) => info!("  Session script: {}", script.display()),
            None => match self.error_code {
                Some(code) => info!("  Synthesized session: error {}", code),
                None => info!("  Synthesized session: \"{}\"", self.transcript),
            },
        }
        info!("  Event delay: {}ms", self.event_delay_ms);
        info!("  Trace events: {}", self.trace_events);
    }
}
