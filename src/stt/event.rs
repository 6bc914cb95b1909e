//! Recognition events and platform error codes.

use std::fmt;

use serde::Deserialize;

/// Error code reported by a speech engine.
///
/// Numeric values follow the platform recognizer's constants, so engines can
/// pass raw codes through [`ErrorCode::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "i32")]
pub enum ErrorCode {
    NetworkTimeout,
    Network,
    Audio,
    Server,
    Client,
    SpeechTimeout,
    NoMatch,
    RecognizerBusy,
    InsufficientPermissions,
    /// Any code the adapter does not know about.
    Unknown(i32),
}

impl ErrorCode {
    /// Map a raw engine code to an `ErrorCode`.
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => ErrorCode::NetworkTimeout,
            2 => ErrorCode::Network,
            3 => ErrorCode::Audio,
            4 => ErrorCode::Server,
            5 => ErrorCode::Client,
            6 => ErrorCode::SpeechTimeout,
            7 => ErrorCode::NoMatch,
            8 => ErrorCode::RecognizerBusy,
            9 => ErrorCode::InsufficientPermissions,
            other => ErrorCode::Unknown(other),
        }
    }

    /// Raw numeric code.
    pub fn code(&self) -> i32 {
        match self {
            ErrorCode::NetworkTimeout => 1,
            ErrorCode::Network => 2,
            ErrorCode::Audio => 3,
            ErrorCode::Server => 4,
            ErrorCode::Client => 5,
            ErrorCode::SpeechTimeout => 6,
            ErrorCode::NoMatch => 7,
            ErrorCode::RecognizerBusy => 8,
            ErrorCode::InsufficientPermissions => 9,
            ErrorCode::Unknown(code) => *code,
        }
    }

    /// Short user-facing message shown when a session fails with this code.
    pub fn message(&self) -> &'static str {
        match self {
            ErrorCode::NetworkTimeout => "Network timeout error",
            ErrorCode::Network => "Network error",
            ErrorCode::Audio => "Audio error",
            ErrorCode::Server => "Server error",
            ErrorCode::Client => "Client error",
            ErrorCode::SpeechTimeout => "No speech input",
            ErrorCode::NoMatch => "No match found",
            ErrorCode::RecognizerBusy => "Recognizer busy error",
            ErrorCode::InsufficientPermissions => "Insufficient permissions error",
            ErrorCode::Unknown(_) => "Error",
        }
    }
}

impl From<i32> for ErrorCode {
    fn from(code: i32) -> Self {
        ErrorCode::from_code(code)
    }
}

impl From<ErrorCode> for i32 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Event delivered by a speech engine to its registered listener.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RecognitionEvent {
    ReadyForSpeech,
    BeginningOfSpeech,
    /// Input level changed (dB).
    RmsChanged { level: f32 },
    /// Raw audio chunk, opaque to the adapter.
    BufferReceived {
        #[serde(default)]
        bytes: Vec<u8>,
    },
    EndOfSpeech,
    /// Session failed. Terminal.
    Error { code: ErrorCode },
    /// Final ranked candidates. Terminal.
    Results {
        #[serde(default)]
        candidates: Vec<String>,
    },
    PartialResults {
        #[serde(default)]
        candidates: Vec<String>,
    },
    /// Engine-specific event with an opaque payload.
    Event {
        event_type: i32,
        #[serde(default)]
        payload: serde_json::Value,
    },
}

impl RecognitionEvent {
    /// Whether this event ends a session.
    pub fn is_terminal(&self) -> bool {
        matches!(self, RecognitionEvent::Error { .. } | RecognitionEvent::Results { .. })
    }

    /// Callback name used in diagnostic traces.
    pub fn name(&self) -> &'static str {
        match self {
            RecognitionEvent::ReadyForSpeech => "onReadyForSpeech",
            RecognitionEvent::BeginningOfSpeech => "onBeginningOfSpeech",
            RecognitionEvent::RmsChanged { .. } => "onRmsChanged",
            RecognitionEvent::BufferReceived { .. } => "onBufferReceived",
            RecognitionEvent::EndOfSpeech => "onEndOfSpeech",
            RecognitionEvent::Error { .. } => "onError",
            RecognitionEvent::Results { .. } => "onResults",
            RecognitionEvent::PartialResults { .. } => "onPartialResults",
            RecognitionEvent::Event { .. } => "onEvent",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_map_to_messages() {
        let expected = [
            (1, "Network timeout error"),
            (2, "Network error"),
            (3, "Audio error"),
            (4, "Server error"),
            (5, "Client error"),
            (6, "No speech input"),
            (7, "No match found"),
            (8, "Recognizer busy error"),
            (9, "Insufficient permissions error"),
        ];
        for (code, message) in expected {
            let error = ErrorCode::from_code(code);
            assert!(!matches!(error, ErrorCode::Unknown(_)), "code {} should be known", code);
            assert_eq!(error.message(), message);
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn test_unknown_codes_map_to_generic_message() {
        for code in [0, -1, 10, 13, i32::MAX] {
            let error = ErrorCode::from_code(code);
            assert_eq!(error, ErrorCode::Unknown(code));
            assert_eq!(error.message(), "Error");
            assert_eq!(error.code(), code);
        }
    }

    #[test]
    fn test_event_json_format() {
        let json = r#"[
            {"type": "ready_for_speech"},
            {"type": "rms_changed", "level": 3.5},
            {"type": "error", "code": 7},
            {"type": "results", "candidates": ["cat", "hat"]},
            {"type": "event", "event_type": 4}
        ]"#;
        let events: Vec<RecognitionEvent> = serde_json::from_str(json).unwrap();
        assert_eq!(events[0], RecognitionEvent::ReadyForSpeech);
        assert_eq!(events[1], RecognitionEvent::RmsChanged { level: 3.5 });
        assert_eq!(events[2], RecognitionEvent::Error { code: ErrorCode::NoMatch });
        assert_eq!(events[3], RecognitionEvent::Results { candidates: vec!["cat".into(), "hat".into()] });
        assert_eq!(events[4], RecognitionEvent::Event { event_type: 4, payload: serde_json::Value::Null });
    }

    #[test]
    fn test_terminal_events() {
        assert!(RecognitionEvent::Results { candidates: vec![] }.is_terminal());
        assert!(RecognitionEvent::Error { code: ErrorCode::Audio }.is_terminal());
        assert!(!RecognitionEvent::PartialResults { candidates: vec![] }.is_terminal());
        assert!(!RecognitionEvent::EndOfSpeech.is_terminal());
    }
}
